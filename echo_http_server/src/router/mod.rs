//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea el path del request a un handler. El método no se inspecciona.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas se evalúan en orden y gana la primera que coincide:
//!
//! | Orden | Coincidencia        | Handler              |
//! |-------|---------------------|----------------------|
//! | 1     | exacta `/`          | `root_handler`       |
//! | 2     | prefijo `/echo`     | `echo_handler`       |
//! | 3     | exacta `/user-agent`| `user_agent_handler` |
//!
//! Si ninguna coincide se responde `404 Not Found` sin body.

use crate::handlers;
use crate::http::{Request, Response, StatusCode};

/// Tipo de función handler
///
/// Un handler recibe un Request y retorna una Response
pub type Handler = fn(&Request) -> Response;

/// Forma en que una ruta compara el path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathMatch {
    Exact(&'static str),
    Prefix(&'static str),
}

impl PathMatch {
    fn matches(&self, path: &[u8]) -> bool {
        match self {
            PathMatch::Exact(expected) => path == expected.as_bytes(),
            PathMatch::Prefix(prefix) => path.starts_with(prefix.as_bytes()),
        }
    }
}

/// Router con la tabla fija de rutas del servidor
///
/// No guarda estado mutable: se comparte entre threads sin locks.
pub struct Router {
    routes: Vec<(PathMatch, Handler)>,
}

impl Router {
    /// Crea el router con las tres rutas del servidor
    pub fn new() -> Self {
        let mut router = Self { routes: Vec::new() };

        router.exact("/", handlers::root_handler);
        router.prefix("/echo", handlers::echo_handler);
        router.exact("/user-agent", handlers::user_agent_handler);

        router
    }

    fn exact(&mut self, path: &'static str, handler: Handler) {
        self.routes.push((PathMatch::Exact(path), handler));
    }

    fn prefix(&mut self, prefix: &'static str, handler: Handler) {
        self.routes.push((PathMatch::Prefix(prefix), handler));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// # Ejemplo
    /// ```
    /// use echo_http_server::router::Router;
    /// use echo_http_server::http::{Request, StatusCode};
    ///
    /// let router = Router::new();
    ///
    /// let request = Request::parse(b"GET /echo/hola HTTP/1.1\r\n\r\n");
    /// let response = router.route(&request);
    /// assert_eq!(response.body(), b"hola");
    ///
    /// let request = Request::parse(b"GET /nada HTTP/1.1\r\n\r\n");
    /// assert_eq!(router.route(&request).status(), StatusCode::NotFound);
    /// ```
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path_bytes();

        self.routes
            .iter()
            .find(|(path_match, _)| path_match.matches(path))
            .map(|(_, handler)| handler(request))
            .unwrap_or_else(|| Response::new(StatusCode::NotFound))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Elimina los dos primeros segmentos de un path
///
/// Retorna todo lo que sigue a la segunda `/`. Si no hay `/`, si la primera
/// es el último byte o si no hay una segunda, retorna el path intacto.
/// Trabaja sobre bytes crudos, así el resto se devuelve sin reinterpretar.
///
/// `"/echo"` no tiene segunda barra y por eso vuelve como `"/echo"`, mientras
/// que `"/echo/"` vuelve como `""`.
///
/// # Ejemplo
/// ```
/// use echo_http_server::router::strip_first_two_segments;
///
/// assert_eq!(strip_first_two_segments(b"/echo/hello/world"), b"hello/world");
/// assert_eq!(strip_first_two_segments(b"/echo"), b"/echo");
/// ```
pub fn strip_first_two_segments(path: &[u8]) -> &[u8] {
    let first = match path.iter().position(|&b| b == b'/') {
        Some(index) if index + 1 < path.len() => index,
        _ => return path,
    };

    match path[first + 1..].iter().position(|&b| b == b'/') {
        Some(offset) => &path[first + 1 + offset + 1..],
        None => path,
    }
}
