use switchd::http::parser::{PATH_CAPACITY, ParseError, parse_request};
use switchd::http::request::Method;
use switchd::http::response::StatusCode;

#[test]
fn test_parse_simple_get_request() {
    let parsed = parse_request(b"GET /a.txt HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, b"/a.txt");
}

#[test]
fn test_parse_lowercase_get() {
    let parsed = parse_request(b"get /docs/").unwrap();
    assert_eq!(parsed.path, b"/docs/");
}

#[test]
fn test_parse_without_version_token() {
    let parsed = parse_request(b"GET /plain").unwrap();
    assert_eq!(parsed.path, b"/plain");
}

#[test]
fn test_parse_skips_leading_whitespace() {
    let parsed = parse_request(b"GET \t  /spaced\r\n").unwrap();
    assert_eq!(parsed.path, b"/spaced");
}

#[test]
fn test_parse_relative_path() {
    let parsed = parse_request(b"GET sub/file.c\n").unwrap();
    assert_eq!(parsed.path, b"sub/file.c");
}

#[test]
fn test_parse_keeps_query_and_escapes_raw() {
    let parsed = parse_request(b"GET /a%20b?x=1 HTTP/1.0").unwrap();
    assert_eq!(parsed.path, b"/a%20b?x=1");
}

#[test]
fn test_parse_only_first_line_matters() {
    let parsed = parse_request(b"GET /first HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
    assert_eq!(parsed.path, b"/first");
}

#[test]
fn test_parse_too_short_get() {
    assert_eq!(parse_request(b"GET"), Err(ParseError::TooShort));
    assert_eq!(parse_request(b"get"), Err(ParseError::TooShort));
}

#[test]
fn test_parse_missing_path() {
    assert_eq!(parse_request(b"GET "), Err(ParseError::MissingPath));
    assert_eq!(parse_request(b"GET   \r\n"), Err(ParseError::MissingPath));
}

#[test]
fn test_parse_keeps_non_utf8_bytes() {
    let parsed = parse_request(b"GET /caf\xe9.txt\r\n").unwrap();
    assert_eq!(parsed.path, b"/caf\xe9.txt");
    assert_eq!(parsed.display_path(), "/caf\u{fffd}.txt");
}

#[test]
fn test_parse_path_too_long() {
    let mut req = b"GET /".to_vec();
    req.extend(std::iter::repeat_n(b'a', PATH_CAPACITY));
    assert_eq!(parse_request(&req), Err(ParseError::PathTooLong));

    let mut req = b"GET /".to_vec();
    req.extend(std::iter::repeat_n(b'a', PATH_CAPACITY - 1));
    assert_eq!(parse_request(&req).unwrap().path.len(), PATH_CAPACITY);
}

#[test]
fn test_parse_other_methods_are_unsupported() {
    let methods = vec![
        ("POST /a.txt", "POST"),
        ("PUT /a.txt", "PUT"),
        ("DELETE /a.txt", "DELETE"),
        ("HEAD /a.txt", "HEAD"),
        ("OPTIONS *", "OPTIONS"),
        ("Get /a.txt", "Get"),
    ];

    for (req, expected) in methods {
        let err = parse_request(req.as_bytes()).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedMethod(Method::Other(expected.to_string())));
        assert_eq!(err.status(), StatusCode::MethodNotAllowed);
    }
}

#[test]
fn test_parse_short_garbage_is_unsupported_method() {
    for req in [&b""[..], b"x", b"GE", b"\x00\x01\x02"] {
        let err = parse_request(req).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedMethod(_)));
    }
}

#[test]
fn test_parse_error_status_codes() {
    assert_eq!(ParseError::TooShort.status(), StatusCode::BadRequest);
    assert_eq!(ParseError::MissingPath.status(), StatusCode::BadRequest);
    assert_eq!(ParseError::PathTooLong.status(), StatusCode::BadRequest);
}
