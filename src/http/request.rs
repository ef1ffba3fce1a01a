/// The only method the server answers with content.
pub const GET: &str = "GET";

/// A parsed request line.
///
/// Only the request line is interpreted; headers are read off the wire to
/// find the end of the request head and then ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Always `GET` for requests produced by the parser.
    pub method: String,
    /// The raw request-target, e.g. `/images/logo.png`. A query string is
    /// kept as part of the target and never interpreted.
    pub target: String,
    /// Protocol version token, kept verbatim (typically "HTTP/1.1")
    pub version: String,
}
