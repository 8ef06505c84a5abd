//! # Logging estructurado
//! src/logging.rs
//!
//! Inicializa `tracing` con un layer `fmt` y un `EnvFilter`. El nivel se
//! controla con `RUST_LOG`; por defecto `echo_http_server=info`.
//!
//! ```bash
//! RUST_LOG=echo_http_server=debug ./echo_http_server
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directiva usada cuando `RUST_LOG` no está definida o es inválida
pub const DEFAULT_FILTER: &str = "echo_http_server=info";

/// Instala el subscriber global
///
/// Si ya había uno instalado (p. ej. en tests) no hace nada.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
