//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno. Sin argumentos
//! el servidor escucha en `0.0.0.0:4221`, sin timeouts.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./echo_http_server --port 8080 --max-request-bytes 16384 --read-timeout-ms 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=127.0.0.1 ./echo_http_server
//! ```

use crate::error::ServerError;
use clap::Parser;
use std::time::Duration;

/// Tamaño máximo permitido para `max_request_bytes` (1 MiB)
pub const MAX_REQUEST_BYTES_LIMIT: usize = 1024 * 1024;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "echo_http_server")]
#[command(about = "Servidor HTTP/1.1 concurrente mínimo con rutas /, /echo y /user-agent")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Máximo de bytes que se acumulan buscando el fin de los headers
    #[arg(long = "max-request-bytes", default_value = "8192", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Timeout de lectura por conexión en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura por conexión en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "0", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use echo_http_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de lectura, `None` si está deshabilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        Self::millis(self.read_timeout_ms)
    }

    /// Timeout de escritura, `None` si está deshabilitado
    pub fn write_timeout(&self) -> Option<Duration> {
        Self::millis(self.write_timeout_ms)
    }

    fn millis(ms: u64) -> Option<Duration> {
        (ms > 0).then(|| Duration::from_millis(ms))
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.host.trim().is_empty() {
            return Err(ServerError::InvalidConfig("host must not be empty".to_string()));
        }

        if self.max_request_bytes == 0 {
            return Err(ServerError::InvalidConfig(
                "max request bytes must be >= 1".to_string(),
            ));
        }
        if self.max_request_bytes > MAX_REQUEST_BYTES_LIMIT {
            return Err(ServerError::InvalidConfig(format!(
                "max request bytes must be <= {}",
                MAX_REQUEST_BYTES_LIMIT
            )));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            max_request_bytes = self.max_request_bytes,
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            "Configuración cargada"
        );

        if self.read_timeout().is_none() && self.write_timeout().is_none() {
            tracing::debug!("Sin timeouts por conexión: una conexión detenida retiene su thread");
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "0.0.0.0".to_string(),
            max_request_bytes: 8192,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}
