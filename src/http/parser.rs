use std::fmt;

use crate::http::request::{GET, Request};

/// Terminator that ends a request head.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The request line is not `METHOD SP TARGET SP VERSION`.
    Malformed(&'static str),
    /// Well-formed request line with a method other than GET.
    UnsupportedMethod(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed(reason) => write!(f, "malformed request: {}", reason),
            ParseError::UnsupportedMethod(method) => write!(f, "unsupported method: {}", method),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line out of a complete request head.
///
/// The line must split on single spaces into exactly three tokens. The
/// version token is kept but not validated.
pub fn parse_request(text: &str) -> Result<Request, ParseError> {
    let request_line = text
        .trim()
        .lines()
        .next()
        .ok_or(ParseError::Malformed("empty request"))?;

    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method_str, target, version] = parts[..] else {
        return Err(ParseError::Malformed("request line must have three parts"));
    };

    if method_str.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::Malformed("empty token in request line"));
    }

    // Method first: any non-GET request gets 405 whatever its target
    if method_str != GET {
        return Err(ParseError::UnsupportedMethod(method_str.to_string()));
    }

    if !target.starts_with('/') {
        return Err(ParseError::Malformed("target must start with '/'"));
    }

    Ok(Request {
        method: method_str.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Position of the blank line that ends the request head, if present.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.target, "/");
        assert_eq!(req.version, "HTTP/1.1");
    }

    #[test]
    fn head_end_points_at_terminator() {
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r\n"), Some(14));
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n"), None);
    }
}
