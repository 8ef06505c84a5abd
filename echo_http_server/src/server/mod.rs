//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y acepta conexiones entrantes
//! 2. `connection`: lee el request, lo rutea, envía la respuesta y cierra

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::Server;
