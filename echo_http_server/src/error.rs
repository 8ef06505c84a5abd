//! # Errores del Servidor
//! src/error.rs
//!
//! Dos niveles:
//!
//! - `ServerError`: errores de arranque. Son fatales, `main` termina con código 1.
//! - `ConnectionError`: errores de una sola conexión. Se registran en el log y
//!   la conexión se cierra; nunca afectan al resto del servidor.
//!
//! Un request malformado no es un error: el parser degrada a campos vacíos y
//! el router responde 404.

use std::io;

/// Errores a nivel de proceso
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No se pudo crear/bindear el socket de escucha
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errores a nivel de conexión
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// El peer cerró sin enviar ningún byte
    #[error("peer closed the connection before sending a request")]
    Closed,

    /// Falló la lectura; el buffer parcial se descarta
    #[error("failed to receive request: {0}")]
    Receive(#[source] io::Error),

    /// Falló el envío de la respuesta
    #[error("failed to send response: {0}")]
    Send(#[source] io::Error),
}
