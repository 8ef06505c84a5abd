//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser tolerante: nunca falla. Un request malformado o truncado produce
//! campos vacíos, que el router termina tratando como 404.
//!
//! ## Formato esperado
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! User-Agent: curl/8.0\r\n
//! \r\n
//! ```
//!
//! ## Reglas
//!
//! 1. Se separa por `\r\n`; un fragmento final sin terminador se descarta.
//! 2. La primera línea es la request line: `Method` hasta el primer espacio,
//!    `Path` es el siguiente token (la versión se ignora).
//! 3. El resto de líneas son headers `Nombre: Valor`. El nombre se guarda tal
//!    cual (sensible a mayúsculas), al valor se le quitan los espacios iniciales.
//!    Líneas sin `:` se ignoran; un nombre repetido sobrescribe al anterior.
//! 4. Todo se trabaja sobre bytes: path y valores se conservan tal cual, sean
//!    o no UTF-8 válido.

use std::borrow::Cow;
use std::collections::HashMap;

/// Clave sintética donde se guarda el método de la request line
pub const METHOD_KEY: &str = "Method";

/// Clave sintética donde se guarda el path de la request line
pub const PATH_KEY: &str = "Path";

const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Request HTTP parseado
///
/// Es un único mapa `nombre → valor` que contiene los headers recibidos más
/// las entradas sintéticas `Method` y `Path`. Los valores se guardan como los
/// bytes exactos recibidos; solo los nombres se decodifican a texto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    fields: HashMap<String, Vec<u8>>,
}

impl Request {
    /// Parsea un request desde los bytes recibidos del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use echo_http_server::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: foo/1.0\r\n\r\n";
    /// let request = Request::parse(raw);
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.get("User-Agent"), "foo/1.0");
    /// assert_eq!(request.get("Accept"), "");
    /// ```
    pub fn parse(buffer: &[u8]) -> Self {
        let lines = Self::split_lines(buffer);

        let mut fields = HashMap::new();

        for line in lines.iter().skip(1) {
            if let Some((name, value)) = Self::parse_header(line) {
                fields.insert(String::from_utf8_lossy(name).into_owned(), value.to_vec());
            }
        }

        // La request line se aplica al final: gana sobre headers homónimos
        if let Some((method, path)) = lines.first().and_then(|line| Self::parse_request_line(line)) {
            fields.insert(METHOD_KEY.to_string(), method.to_vec());
            fields.insert(PATH_KEY.to_string(), path.to_vec());
        }

        Request { fields }
    }

    /// Separa el buffer en líneas terminadas en `\r\n`
    ///
    /// Lo que queda después del último terminador no es una línea.
    fn split_lines(buffer: &[u8]) -> Vec<&[u8]> {
        let mut lines = Vec::new();
        let mut rest = buffer;

        while let Some(end) = rest
            .windows(LINE_TERMINATOR.len())
            .position(|window| window == LINE_TERMINATOR)
        {
            lines.push(&rest[..end]);
            rest = &rest[end + LINE_TERMINATOR.len()..];
        }

        lines
    }

    /// Parsea la request line: `GET /path HTTP/1.1`
    ///
    /// Retorna `None` si la línea no contiene ningún espacio.
    fn parse_request_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
        let space = line.iter().position(|&b| b == b' ')?;
        let (method, remainder) = (&line[..space], &line[space + 1..]);

        // Primer token no vacío, igual que un tokenizer por espacios
        let path = remainder
            .split(|&b| b == b' ')
            .find(|token| !token.is_empty())
            .unwrap_or(&[]);

        Some((method, path))
    }

    /// Parsea un header: `Nombre: Valor`
    fn parse_header(line: &[u8]) -> Option<(&[u8], &[u8])> {
        let colon = line.iter().position(|&b| b == b':')?;
        let value = &line[colon + 1..];
        let start = value
            .iter()
            .position(|&b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .unwrap_or(value.len());

        Some((&line[..colon], &value[start..]))
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene los bytes crudos de un campo por nombre exacto
    ///
    /// Si el campo no existe retorna un slice vacío.
    pub fn get_bytes(&self, name: &str) -> &[u8] {
        self.fields.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Obtiene un campo por nombre exacto, como texto
    ///
    /// Si el campo no existe retorna `""`. Bytes que no son UTF-8 válido se
    /// reemplazan por U+FFFD; para reenviar el valor usar `get_bytes`.
    pub fn get(&self, name: &str) -> Cow<'_, str> {
        String::from_utf8_lossy(self.get_bytes(name))
    }

    /// Obtiene el método del request (`""` si la request line era inválida)
    pub fn method(&self) -> Cow<'_, str> {
        self.get(METHOD_KEY)
    }

    /// Obtiene el path del request (`""` si la request line era inválida)
    pub fn path(&self) -> Cow<'_, str> {
        self.get(PATH_KEY)
    }

    /// Path crudo, byte a byte como llegó en la request line
    pub fn path_bytes(&self) -> &[u8] {
        self.get_bytes(PATH_KEY)
    }

    /// Obtiene un header específico, distinguiendo ausencia de valor vacío
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(|v| v.as_slice())
    }

    /// Número de entradas del mapa (headers + sintéticas)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` si no se pudo extraer nada del buffer
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
