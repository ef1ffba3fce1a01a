use bytes::Bytes;
use webroot::http::response::{Response, ResponseBuilder, StatusCode};
use webroot::http::writer::{ResponseWriter, serialize_response};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, Bytes::from_static(b"Hello, World!"));
    assert!(response.headers.is_empty());
}

#[test]
fn test_response_builder_preserves_header_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-First", "1")
        .header("Content-Type", "text/plain")
        .header("X-Last", "2")
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["X-First", "Content-Type", "X-Last"]);
}

#[test]
fn test_response_builder_replaces_duplicate_header_in_place() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Other", "value")
        .header("content-type", "text/html")
        .build();

    assert_eq!(response.headers.len(), 2);
    assert_eq!(response.headers[0], ("Content-Type".to_string(), "text/html".to_string()));
    assert_eq!(response.header("CONTENT-TYPE"), Some("text/html"));
}

#[test]
fn test_response_builder_adds_no_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"body".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), None);
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok(b"<html></html>".to_vec(), "text/html");

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.body, Bytes::from_static(b"<html></html>"));
}

#[test]
fn test_response_not_found_helper() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.headers.is_empty());
    assert!(response.body.is_empty());
}

#[test]
fn test_response_method_not_allowed_helper() {
    let response = Response::method_not_allowed();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.header("Content-Type"), None);
    assert_eq!(
        response.body,
        Bytes::from_static(b"Method not allowed on this server")
    );
}

#[test]
fn test_serialize_ok() {
    let bytes = serialize_response(&Response::ok(b"<html></html>".to_vec(), "text/html"));

    assert_eq!(
        &bytes[..],
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html></html>"
    );
}

#[test]
fn test_serialize_not_found() {
    let bytes = serialize_response(&Response::not_found());

    assert_eq!(&bytes[..], b"HTTP/1.1 404 Not Found\r\n\r\n");
}

#[test]
fn test_serialize_method_not_allowed() {
    let bytes = serialize_response(&Response::method_not_allowed());

    assert_eq!(
        &bytes[..],
        b"HTTP/1.1 405 Method Not Allowed\r\n\r\nMethod not allowed on this server"
    );
}

#[test]
fn test_serialize_keeps_binary_body_verbatim() {
    let body: Vec<u8> = (0..=255).collect();
    let bytes = serialize_response(&Response::ok(body.clone(), "image/png"));

    assert!(bytes.ends_with(&body));
}

#[tokio::test]
async fn test_response_writer_writes_everything() {
    let response = Response::ok(vec![b'x'; 10_000], "text/plain");
    let mut writer = ResponseWriter::new(&response);
    let mut out = Vec::new();

    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(&out[..], &serialize_response(&response)[..]);
}
