//! # Echo HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero sobre `std::net`:
//! acepta conexiones TCP, parsea request line y headers, y responde con
//! un conjunto fijo de rutas.
//!
//! ## Arquitectura
//!
//! ```text
//! server::tcp (accept loop)
//!     └─ un thread por conexión → server::connection
//!            recibir → http::Request::parse → router::Router::route
//!            → http::Response::to_bytes → enviar → cerrar
//! ```
//!
//! - `http`: parsing de requests y serialización de responses
//! - `router` / `handlers`: rutas `/`, `/echo/<resto>` y `/user-agent`
//! - `server`: loop de aceptación y manejo de cada conexión
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: errores de arranque y de conexión
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use echo_http_server::config::Config;
//! use echo_http_server::server::Server;
//!
//! let server = Server::bind(Config::default()).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;

pub use error::{ConnectionError, ServerError};
