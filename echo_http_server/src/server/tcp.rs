//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones en un loop infinito y despacha cada una a su propio
//! thread. El loop nunca espera a un handler ni se detiene por un `accept`
//! fallido: solo lo registra, espera un backoff exponencial corto y sigue
//! escuchando. Así un error persistente (por ejemplo `EMFILE`) no deja al
//! loop girando en vacío.
//!
//! No hay límite de conexiones ni backpressure. Sin timeouts configurados, un
//! peer que no termina de enviar retiene su thread indefinidamente.

use crate::config::Config;
use crate::error::{ConnectionError, ServerError};
use crate::router::Router;
use crate::server::connection::{handle_connection, ConnectionLimits};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Espera tras el primer `accept` fallido, en milisegundos
const ACCEPT_BACKOFF_BASE_MS: u64 = 5;

/// Espera máxima entre reintentos de `accept`, en milisegundos
const ACCEPT_BACKOFF_MAX_MS: u64 = 1000;

/// Espera antes de volver a aceptar tras `failures` errores consecutivos
fn accept_backoff(failures: u32) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    let exponential = 2u64.saturating_pow(failures - 1);
    let delay_ms = ACCEPT_BACKOFF_BASE_MS.saturating_mul(exponential);

    Duration::from_millis(delay_ms.min(ACCEPT_BACKOFF_MAX_MS))
}

/// Servidor HTTP/1.1 concurrente, un thread por conexión
pub struct Server {
    config: Config,
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Valida la configuración y bindea el socket de escucha
    ///
    /// Cualquier fallo aquí es fatal para el proceso.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        tracing::info!(address = %address, "Servidor escuchando (un thread por conexión)");

        Ok(Self {
            config,
            router: Arc::new(Router::new()),
            listener,
        })
    }

    /// Dirección local real (útil con puerto 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Loop de aceptación; no retorna mientras el listener exista
    pub fn run(&self) {
        let limits = ConnectionLimits::from_config(&self.config);
        let mut next_id: u64 = 0;
        let mut failures: u32 = 0;

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    failures = 0;
                    next_id += 1;
                    self.dispatch(stream, next_id, limits);
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let delay = accept_backoff(failures);
                    tracing::warn!(error = %e, failures, delay = ?delay, "Error al aceptar conexión");
                    thread::sleep(delay);
                }
            }
        }
    }

    /// Lanza el thread dueño de la conexión, sin esperar su resultado
    fn dispatch(&self, stream: TcpStream, id: u64, limits: ConnectionLimits) {
        let router = Arc::clone(&self.router);

        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        tracing::debug!(id, peer = %peer, "Nueva conexión");

        let span = tracing::info_span!("connection", id, peer = %peer);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                let _entered = span.enter();

                match handle_connection(stream, &router, &limits) {
                    Ok(_) => {}
                    Err(ConnectionError::Closed) => {
                        tracing::debug!("Conexión cerrada por el peer sin request");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Conexión abandonada");
                    }
                }
            });

        // Si el thread no se creó, el closure (y el stream) ya se liberaron
        if let Err(e) = spawned {
            tracing::error!(id, error = %e, "No se pudo crear el thread de la conexión");
        }
    }
}
