//! # Handlers de Rutas
//! src/handlers.rs
//!
//! - `/`: 200 sin headers ni body
//! - `/echo/<resto>`: refleja `<resto>` como text/plain
//! - `/user-agent`: refleja el header `User-Agent` como text/plain

use crate::http::{Request, Response, StatusCode};
use crate::router::strip_first_two_segments;

/// Handler para `/`
pub fn root_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `/echo/<resto>`
///
/// El body es el path sin sus dos primeros segmentos, byte a byte.
pub fn echo_handler(req: &Request) -> Response {
    Response::text(strip_first_two_segments(req.path_bytes()))
}

/// Handler para `/user-agent`
///
/// Sin header `User-Agent` el body es vacío (`Content-Length: 0`).
pub fn user_agent_handler(req: &Request) -> Response {
    Response::text(req.get_bytes("User-Agent"))
}
