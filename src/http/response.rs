use std::path::PathBuf;

use tokio::fs::File;

/// HTTP status codes the server can send.
///
/// - `Ok` (200): File or listing follows
/// - `BadRequest` (400): Malformed request or path traversal attempt
/// - `Forbidden` (403): Resource exists but cannot be read
/// - `NotFound` (404): Resource does not exist
/// - `MethodNotAllowed` (405): Anything other than GET
/// - `InternalServerError` (500): Server-side failure, connection closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Value of the `Connection` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionDirective {
    Close,
    KeepAlive,
}

impl ConnectionDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionDirective::Close => "close",
            ConnectionDirective::KeepAlive => "keep alive",
        }
    }
}

/// Status line plus the optional headers this server knows about.
///
/// A zero content length is treated as unknown and not announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub content_length: Option<u64>,
    pub content_type: Option<&'static str>,
    pub connection: Option<ConnectionDirective>,
}

impl ResponseHead {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_length: None,
            content_type: None,
            connection: None,
        }
    }

    pub fn content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn connection(mut self, directive: ConnectionDirective) -> Self {
        self.connection = Some(directive);
        self
    }

    /// Whether the session must end once this response is sent.
    pub fn closes_connection(&self) -> bool {
        self.connection == Some(ConnectionDirective::Close)
    }
}

/// Where the response body comes from.
#[derive(Debug)]
pub enum Body {
    Bytes(Vec<u8>),
    /// An open file streamed as-is.
    File(File),
    /// A spooled listing, deleted once it has been sent.
    Spooled(PathBuf),
}

#[derive(Debug)]
pub struct Response {
    pub head: ResponseHead,
    pub body: Body,
}

impl Response {
    /// A 200 response streaming an already opened file.
    pub fn file(file: File, size: u64, content_type: &'static str) -> Self {
        Self {
            head: ResponseHead::new(StatusCode::Ok)
                .content_length(size)
                .content_type(content_type)
                .connection(ConnectionDirective::KeepAlive),
            body: Body::File(file),
        }
    }

    /// A 200 HTML response whose body lives in a spool file of `size` bytes.
    pub fn spooled_html(path: PathBuf, size: u64) -> Self {
        Self {
            head: ResponseHead::new(StatusCode::Ok)
                .content_length(size)
                .content_type("text/html")
                .connection(ConnectionDirective::KeepAlive),
            body: Body::Spooled(path),
        }
    }

    /// A short HTML error page. 500 asks the client to close the connection.
    pub fn error(status: StatusCode) -> Self {
        let body = error_page(status);
        let directive = if status == StatusCode::InternalServerError {
            ConnectionDirective::Close
        } else {
            ConnectionDirective::KeepAlive
        };

        Self {
            head: ResponseHead::new(status)
                .content_length(body.len() as u64)
                .content_type("text/html")
                .connection(directive),
            body: Body::Bytes(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }
}

/// Body of an error response.
pub fn error_page(status: StatusCode) -> Vec<u8> {
    format!(
        "<html><body><h1>{} {}</h1></body></html>",
        status.as_u16(),
        status.reason_phrase()
    )
    .into_bytes()
}
