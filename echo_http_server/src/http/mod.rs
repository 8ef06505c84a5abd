//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.1 implementado a mano:
//!
//! - Parsing tolerante de request line y headers
//! - Construcción de responses con orden de headers estable
//! - Códigos de estado soportados (200, 404)
//!
//! No hay keep-alive, chunked encoding ni bodies de request: cada conexión
//! lleva un único request y una única respuesta.

pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
