/// Method named by the first token of a request.
///
/// Only `GET` is served; any other token is kept so a rejected request can
/// be logged by name before it is answered with 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    /// Anything else, kept verbatim
    Other(String),
}

/// A parsed GET request.
///
/// The path is the raw non-whitespace run that followed the method token,
/// byte for byte, without any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: Vec<u8>,
}

impl Method {
    /// Classifies a method token. `GET` is also accepted in lowercase.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchd::http::request::Method;
    /// assert_eq!(Method::from_token("get"), Method::GET);
    /// assert_eq!(Method::from_token("POST"), Method::Other("POST".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" | "get" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(token) => token,
        }
    }
}

impl Request {
    /// The path for log lines; invalid UTF-8 is shown as U+FFFD.
    pub fn display_path(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }
}
