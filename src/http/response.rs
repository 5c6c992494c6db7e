//! HTTP response building module
//!
//! Provides builders for the text, JSON and error responses the endpoints
//! emit, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Method, Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Start a response with the headers every response carries
fn base_builder(status: StatusCode, content_type: &str, http: &HttpConfig) -> Builder {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder
}

/// Finish a response, dropping the body for HEAD requests
fn finish(builder: Builder, body: Bytes, is_head: bool, label: &str) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { body };

    builder
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(label, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 plain text response
pub fn build_text_response(
    content: String,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = base_builder(StatusCode::OK, &http.default_content_type, http);
    finish(builder, Bytes::from(content), is_head, "text")
}

/// Build 200 JSON response (compact serialization)
pub fn build_json_response<T: Serialize + ?Sized>(
    body: &T,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => {
            let builder = base_builder(StatusCode::OK, JSON_CONTENT_TYPE, http);
            finish(builder, Bytes::from(json), is_head, "JSON")
        }
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_500_response(http)
        }
    }
}

/// Build OPTIONS response listing the methods registered for a path
pub fn build_options_response(allowed: &[Method], http: &HttpConfig) -> Response<Full<Bytes>> {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut builder = base_builder(StatusCode::OK, PLAIN_CONTENT_TYPE, http).header("Allow", &allow);

    if http.enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", &allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Bytes::from(allow), false, "OPTIONS")
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &str, http: &HttpConfig) -> Response<Full<Bytes>> {
    let builder = base_builder(StatusCode::BAD_REQUEST, PLAIN_CONTENT_TYPE, http);
    finish(
        builder,
        Bytes::from(format!("400 Bad Request: {message}")),
        false,
        "400",
    )
}

/// Build 404 response naming the unmatched method and path
pub fn build_404_response(
    method: &Method,
    path: &str,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = base_builder(StatusCode::NOT_FOUND, PLAIN_CONTENT_TYPE, http);
    finish(
        builder,
        Bytes::from(format!("Cannot {method} {path}")),
        is_head,
        "404",
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let builder = base_builder(StatusCode::PAYLOAD_TOO_LARGE, PLAIN_CONTENT_TYPE, http);
    finish(builder, Bytes::from("413 Payload Too Large"), false, "413")
}

/// Build 500 Internal Server Error response
pub fn build_500_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let builder = base_builder(StatusCode::INTERNAL_SERVER_ERROR, PLAIN_CONTENT_TYPE, http);
    finish(
        builder,
        Bytes::from("500 Internal Server Error"),
        false,
        "500",
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::default_config;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_text_response() {
        let http = default_config().http;
        let resp = build_text_response("hello".to_string(), &http, false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(resp.headers()["content-length"], "5");
        assert_eq!(resp.headers()["server"], "movie-list-server");
        assert!(resp.headers().get("access-control-allow-origin").is_none());
        assert_eq!(body_string(resp).await, "hello");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let http = default_config().http;
        let resp = build_text_response("hello".to_string(), &http, true);
        assert_eq!(resp.headers()["content-length"], "5");
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_json_response_is_compact() {
        let http = default_config().http;
        let resp = build_json_response(&serde_json::json!({ "success": true }), &http, false);
        assert_eq!(resp.headers()["content-type"], JSON_CONTENT_TYPE);
        assert_eq!(body_string(resp).await, r#"{"success":true}"#);
    }

    #[tokio::test]
    async fn test_cors_header() {
        let mut http = default_config().http;
        http.enable_cors = true;
        let resp = build_json_response(&Vec::<String>::new(), &http, false);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_string(resp).await, "[]");
    }

    #[tokio::test]
    async fn test_options_response() {
        let http = default_config().http;
        let resp = build_options_response(&[Method::GET, Method::HEAD], &http);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["allow"], "GET,HEAD");
        assert_eq!(body_string(resp).await, "GET,HEAD");
    }

    #[tokio::test]
    async fn test_404_names_method_and_path() {
        let http = default_config().http;
        let resp = build_404_response(&Method::POST, "/all-movies", &http, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "Cannot POST /all-movies");
    }
}
