use thiserror::Error;

use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;

/// Largest path accepted from a request line.
pub const PATH_CAPACITY: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported method {0:?}")]
    UnsupportedMethod(Method),
    #[error("request too short")]
    TooShort,
    #[error("missing path")]
    MissingPath,
    #[error("path longer than {PATH_CAPACITY} bytes")]
    PathTooLong,
}

impl ParseError {
    /// Status code sent back for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            ParseError::TooShort | ParseError::MissingPath | ParseError::PathTooLong => {
                StatusCode::BadRequest
            }
        }
    }
}

/// Parses the bytes of one receive call.
///
/// The first three bytes must be `GET` or `get`. Leading whitespace after the
/// method is skipped and the following non-whitespace run is the path. No
/// version token, header or query handling takes place.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    if !(buf.starts_with(b"GET") || buf.starts_with(b"get")) {
        return Err(ParseError::UnsupportedMethod(method_token(buf)));
    }

    if buf.len() < 4 {
        return Err(ParseError::TooShort);
    }

    let rest = &buf[3..];
    let start = rest
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(rest.len());
    let rest = &rest[start..];
    let end = rest.iter().position(|&b| is_space(b)).unwrap_or(rest.len());
    let path = &rest[..end];

    if path.is_empty() {
        return Err(ParseError::MissingPath);
    }
    if path.len() > PATH_CAPACITY {
        return Err(ParseError::PathTooLong);
    }

    Ok(Request {
        method: Method::GET,
        path: path.to_vec(),
    })
}

/// Same set as C `isspace`: space, `\t`, `\n`, `\v`, `\f`, `\r`.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn method_token(buf: &[u8]) -> Method {
    let end = buf.iter().position(|&b| is_space(b)).unwrap_or(buf.len());
    Method::from_token(&String::from_utf8_lossy(&buf[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let parsed = parse_request(b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.path, b"/index.html");
    }

    #[test]
    fn vertical_tab_counts_as_whitespace() {
        let parsed = parse_request(b"GET\x0b/a\x0bb").unwrap();
        assert_eq!(parsed.path, b"/a");
    }

    #[test]
    fn method_token_stops_at_whitespace() {
        assert_eq!(method_token(b"POST /x"), Method::Other("POST".to_string()));
        assert_eq!(method_token(b""), Method::Other(String::new()));
    }
}
