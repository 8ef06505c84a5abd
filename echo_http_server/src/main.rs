//! # Echo HTTP Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa el logging, bindea el puerto y entra
//! al loop de aceptación. Solo un fallo de arranque termina el proceso.

use echo_http_server::config::Config;
use echo_http_server::logging;
use echo_http_server::server::Server;

fn main() {
    let config = Config::new();

    logging::init();

    tracing::info!("echo_http_server v{} iniciando", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Error fatal");
            std::process::exit(1);
        }
    };

    server.run();
}
