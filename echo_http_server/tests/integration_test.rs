//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta el servidor real en un puerto efímero de 127.0.0.1 y le
//! habla por TCP.

use echo_http_server::config::Config;
use echo_http_server::server::Server;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Helper: levanta un servidor en background y retorna su dirección
fn start_server() -> SocketAddr {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Config::default()
    };

    let server = Server::bind(config).expect("Failed to bind server");
    let addr = server.local_addr().expect("Failed to read local addr");

    thread::spawn(move || server.run());

    addr
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    // El servidor cierra la conexión tras responder
    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    Ok(response)
}

/// Helper: envía un GET con headers opcionales
fn send_request(addr: SocketAddr, path: &str, headers: &[(&str, &str)]) -> String {
    let mut request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n", path);
    for (name, value) in headers {
        request.push_str(&format!("{}: {}\r\n", name, value));
    }
    request.push_str("\r\n");

    let response = send_raw(addr, request.as_bytes()).expect("Failed to send request");
    String::from_utf8(response).expect("Response is not UTF-8")
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    if let Some(pos) = response.find("\r\n\r\n") {
        &response[pos + 4..]
    } else {
        ""
    }
}

#[test]
fn test_root_endpoint() {
    let addr = start_server();
    let response = send_request(addr, "/", &[]);

    assert_eq!(response, "HTTP/1.1 200 OK\r\n\r\n");
}

#[test]
fn test_echo_example_exact_bytes() {
    let addr = start_server();
    let response = send_raw(addr, b"GET /echo/abc HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
    );
}

#[test]
fn test_echo_non_utf8_bytes_exact() {
    let addr = start_server();
    let response = send_raw(addr, b"GET /echo/\xff\xfe HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\n\xff\xfe"
    );
}

#[test]
fn test_user_agent_non_utf8_bytes_exact() {
    let addr = start_server();
    let response = send_raw(addr, b"GET /user-agent HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\n").unwrap();

    assert!(response.ends_with(b"Content-Length: 4\r\n\r\ncaf\xe9"));
}

#[test]
fn test_body_after_head_does_not_lose_response() {
    let addr = start_server();

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(b"POST /echo/ok HTTP/1.1\r\nContent-Length: 2048\r\n\r\n").unwrap();
    thread::sleep(Duration::from_millis(50));
    stream.write_all(&[b'b'; 2048]).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert_eq!(extract_body(&response), "ok");
}

#[test]
fn test_echo_nested_path() {
    let addr = start_server();
    let response = send_request(addr, "/echo/hello/world", &[]);

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Length: 11\r\n"));
    assert_eq!(extract_body(&response), "hello/world");
}

#[test]
fn test_bare_echo_returns_path() {
    let addr = start_server();
    let response = send_request(addr, "/echo", &[]);

    assert_eq!(extract_body(&response), "/echo");
}

#[test]
fn test_user_agent_endpoint() {
    let addr = start_server();
    let response = send_request(addr, "/user-agent", &[("User-Agent", "foo/1.0")]);

    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 7\r\n\r\nfoo/1.0"
    );
}

#[test]
fn test_user_agent_missing_header() {
    let addr = start_server();
    let response = send_request(addr, "/user-agent", &[]);

    assert!(response.contains("Content-Length: 0\r\n"));
    assert_eq!(extract_body(&response), "");
}

#[test]
fn test_user_agent_header_is_case_sensitive() {
    let addr = start_server();
    let response = send_request(addr, "/user-agent", &[("user-agent", "lower/1.0")]);

    assert_eq!(extract_body(&response), "");
}

#[test]
fn test_not_found() {
    let addr = start_server();

    for path in ["/nonexistent", "/user-agent/x", "/index.html"] {
        let response = send_request(addr, path, &[]);
        assert_eq!(response, "HTTP/1.1 404 Not Found\r\n\r\n", "path {}", path);
    }
}

#[test]
fn test_method_is_ignored() {
    let addr = start_server();
    let response = send_raw(addr, b"DELETE /echo/x HTTP/1.1\r\n\r\n").unwrap();

    assert!(response.ends_with(b"\r\n\r\nx"));
}

#[test]
fn test_garbage_request_gets_not_found() {
    let addr = start_server();
    let response = send_raw(addr, b"\x00\x01\x02\x03garbage\r\n\r\n").unwrap();

    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[test]
fn test_request_split_across_writes() {
    let addr = start_server();

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(b"GET /echo/pie").unwrap();
    thread::sleep(Duration::from_millis(50));
    stream.write_all(b"ces HTTP/1.1\r\nHost: x\r").unwrap();
    thread::sleep(Duration::from_millis(50));
    stream.write_all(b"\n\r\n").unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert_eq!(extract_body(&response), "pieces");
}

#[test]
fn test_headers_larger_than_one_read() {
    let addr = start_server();
    let filler = "f".repeat(2000);
    let agent = "a".repeat(3000);
    let response = send_request(
        addr,
        "/user-agent",
        &[("X-Filler", filler.as_str()), ("User-Agent", agent.as_str())],
    );

    assert!(response.contains("Content-Length: 3000\r\n"));
    assert_eq!(extract_body(&response), agent);
}

#[test]
fn test_multiple_requests_sequentially() {
    let addr = start_server();

    for i in 0..5 {
        let response = send_request(addr, &format!("/echo/{}", i), &[]);
        assert_eq!(extract_body(&response), i.to_string(), "Request {} failed", i);
    }
}

#[test]
fn test_concurrent_connections_no_cross_talk() {
    let addr = start_server();
    let clients = 32;
    let barrier = Arc::new(Barrier::new(clients));

    let handles: Vec<_> = (0..clients)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                // Todas las conexiones abiertas antes de enviar
                let mut stream = TcpStream::connect(addr).unwrap();
                stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
                barrier.wait();

                let request = format!("GET /echo/client-{} HTTP/1.1\r\nHost: x\r\n\r\n", i);
                stream.write_all(request.as_bytes()).unwrap();

                let mut response = String::new();
                stream.read_to_string(&mut response).unwrap();
                (i, response)
            })
        })
        .collect();

    for handle in handles {
        let (i, response) = handle.join().unwrap();
        assert_eq!(extract_body(&response), format!("client-{}", i));
    }
}

#[test]
fn test_server_survives_abandoned_connections() {
    let addr = start_server();

    // Conexiones que cierran sin enviar nada
    for _ in 0..5 {
        drop(TcpStream::connect(addr).unwrap());
    }

    let response = send_request(addr, "/", &[]);
    assert_eq!(response, "HTTP/1.1 200 OK\r\n\r\n");
}
