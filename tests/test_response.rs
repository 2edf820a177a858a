use tcphttp::http::response::{HandlerError, StatusCode, default_headers};

#[test]
fn test_status_codes() {
    let table = [
        (StatusCode::Ok, 200, "OK"),
        (StatusCode::NoContent, 204, "No Content"),
        (StatusCode::BadRequest, 400, "Bad Request"),
        (StatusCode::NotFound, 404, "Not Found"),
        (StatusCode::InternalServerError, 500, "Internal Server Error"),
    ];

    for (status, code, reason) in table {
        assert_eq!(status.as_u16(), code);
        assert_eq!(status.reason_phrase(), reason);
        assert_eq!(status.status_line(), format!("HTTP/1.1 {} {}\r\n", code, reason));
    }
}

#[test]
fn test_status_line() {
    assert_eq!(StatusCode::Ok.status_line(), "HTTP/1.1 200 OK\r\n");
    assert_eq!(StatusCode::BadRequest.status_line(), "HTTP/1.1 400 Bad Request\r\n");
    assert_eq!(
        StatusCode::InternalServerError.status_line(),
        "HTTP/1.1 500 Internal Server Error\r\n"
    );
}

#[test]
fn test_default_headers() {
    let headers = default_headers(13);

    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("Content-Length"), Some("13"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
}

#[test]
fn test_default_headers_override() {
    let mut headers = default_headers(0);
    headers.insert("Content-Type", "text/html");
    headers.remove("Content-Length");
    headers.insert("Transfer-Encoding", "chunked");

    assert_eq!(
        headers.to_wire(),
        b"connection: close\r\ncontent-type: text/html\r\ntransfer-encoding: chunked\r\n\r\n".to_vec()
    );
}

#[test]
fn test_handler_error_new() {
    let err = HandlerError::new(StatusCode::BadRequest, "nope");

    assert_eq!(err.status, StatusCode::BadRequest);
    assert_eq!(err.message, "nope");
}
