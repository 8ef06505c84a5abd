//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Cada conexión sigue siempre la misma secuencia, una sola vez:
//!
//! ```text
//! recibir head → parsear → rutear → enviar → cerrar
//! ```
//!
//! La lectura es un loop acotado: se leen bloques de `READ_CHUNK_SIZE` bytes
//! hasta ver la línea vacía que cierra los headers, hasta que el peer cierra,
//! o hasta acumular `max_request_bytes`. En los dos últimos casos se parsea lo
//! que haya llegado (best effort).
//!
//! Un error de lectura abandona la conexión sin responder: el buffer parcial
//! nunca se parsea. Un error de escritura se reporta y la conexión igual se
//! cierra. El stream se cierra al salir de `handle_connection` por cualquier
//! camino, porque es dueño exclusivo del `TcpStream`.
//!
//! Tras enviar la respuesta el cierre es ordenado: primero se cierra la mitad
//! de escritura (FIN) y luego se descarta lo que el peer siga mandando, con
//! tope de tiempo y de bytes. Cerrar con bytes sin leer haría que el kernel
//! enviara RST y el cliente podría perder la respuesta ya escrita.

use crate::config::Config;
use crate::error::ConnectionError;
use crate::http::{Request, StatusCode};
use crate::router::Router;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

/// Tamaño de cada lectura del socket
pub const READ_CHUNK_SIZE: usize = 1024;

/// Fin del bloque de headers
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Tiempo máximo de espera al peer durante el cierre ordenado
const LINGER_TIMEOUT: Duration = Duration::from_millis(200);

/// Bytes pendientes que se descartan como máximo durante el cierre ordenado
const LINGER_MAX_BYTES: usize = 64 * 1024;

/// Límites aplicados a cada conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub max_request_bytes: usize,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl ConnectionLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_request_bytes: config.max_request_bytes,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        }
    }
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Motivo por el que terminó la lectura del head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadEnd {
    /// Se encontró `\r\n\r\n`
    Terminated,
    /// El peer cerró antes de enviar la línea vacía
    PeerClosed,
    /// Se alcanzó `max_request_bytes`; el head quedó truncado
    LimitReached,
}

/// Bytes del head tal como llegaron del socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHead {
    pub bytes: Vec<u8>,
    pub end: HeadEnd,
}

/// Lee el head de un request (request line + headers)
///
/// Con `HeadEnd::Terminated` los bytes terminan exactamente en `\r\n\r\n`;
/// lo que venga después (un body, por ejemplo) se descarta.
pub fn read_request_head<R: Read>(
    reader: &mut R,
    max_request_bytes: usize,
) -> Result<RawHead, ConnectionError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK_SIZE.min(max_request_bytes));
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ConnectionError::Receive(e)),
        };

        if bytes_read == 0 {
            if buffer.is_empty() {
                return Err(ConnectionError::Closed);
            }
            return Ok(RawHead { bytes: buffer, end: HeadEnd::PeerClosed });
        }

        // El terminador puede haber quedado partido entre dos lecturas
        let search_from = buffer.len().saturating_sub(HEAD_TERMINATOR.len() - 1);
        buffer.extend_from_slice(&chunk[..bytes_read]);

        if let Some(head_len) = find_head_end(&buffer, search_from) {
            if head_len <= max_request_bytes {
                buffer.truncate(head_len);
                return Ok(RawHead { bytes: buffer, end: HeadEnd::Terminated });
            }
        }

        if buffer.len() >= max_request_bytes {
            buffer.truncate(max_request_bytes);
            return Ok(RawHead { bytes: buffer, end: HeadEnd::LimitReached });
        }
    }
}

/// Largo del head (terminador incluido) si `buffer` ya contiene `\r\n\r\n`
fn find_head_end(buffer: &[u8], search_from: usize) -> Option<usize> {
    buffer[search_from..]
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
        .map(|pos| search_from + pos + HEAD_TERMINATOR.len())
}

/// Atiende un request completo sobre cualquier stream bidireccional
///
/// Retorna el código de estado enviado.
pub fn serve<S: Read + Write>(
    stream: &mut S,
    router: &Router,
    max_request_bytes: usize,
) -> Result<StatusCode, ConnectionError> {
    let head = read_request_head(stream, max_request_bytes)?;

    match head.end {
        HeadEnd::Terminated => {}
        HeadEnd::PeerClosed => {
            tracing::debug!(bytes = head.bytes.len(), "Head sin línea vacía final, parseando lo recibido");
        }
        HeadEnd::LimitReached => {
            tracing::warn!(
                limit = max_request_bytes,
                "Head excede el máximo permitido, se parsea truncado"
            );
        }
    }

    let request = Request::parse(&head.bytes);
    if request.is_empty() {
        tracing::debug!(bytes = head.bytes.len(), "Head sin campos reconocibles");
    } else {
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            fields = request.len(),
            "Request parseado"
        );
    }

    let response = router.route(&request);
    let response_bytes = response.to_bytes();

    stream
        .write_all(&response_bytes)
        .and_then(|_| stream.flush())
        .map_err(ConnectionError::Send)?;

    tracing::info!(
        status = %response.status(),
        path = %request.path(),
        bytes = response_bytes.len(),
        "Respuesta enviada"
    );

    Ok(response.status())
}

/// Lleva una conexión aceptada hasta su estado final y la cierra
///
/// Consume el stream: al retornar, el socket ya está cerrado.
pub fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    limits: &ConnectionLimits,
) -> Result<StatusCode, ConnectionError> {
    if let Err(e) = stream.set_read_timeout(limits.read_timeout) {
        tracing::warn!(error = %e, "No se pudo configurar el timeout de lectura");
    }
    if let Err(e) = stream.set_write_timeout(limits.write_timeout) {
        tracing::warn!(error = %e, "No se pudo configurar el timeout de escritura");
    }

    let result = serve(&mut stream, router, limits.max_request_bytes);

    if result.is_ok() {
        close_gracefully(&mut stream);
    }

    drop(stream);
    tracing::trace!("Conexión cerrada");

    result
}

/// Cierra la mitad de escritura y descarta lo que quede por leer
///
/// Termina al ver EOF, ante cualquier error, al pasar `LINGER_TIMEOUT` o al
/// descartar `LINGER_MAX_BYTES`.
fn close_gracefully(stream: &mut TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        tracing::debug!(error = %e, "No se pudo cerrar la mitad de escritura");
        return;
    }

    let deadline = Instant::now() + LINGER_TIMEOUT;
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut discarded = 0;

    while discarded < LINGER_MAX_BYTES {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || stream.set_read_timeout(Some(remaining)).is_err() {
            break;
        }

        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => discarded += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    if discarded > 0 {
        tracing::trace!(bytes = discarded, "Bytes descartados tras la respuesta");
    }
}
