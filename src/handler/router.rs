//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body limits,
//! route resolution, input decoding, dispatch and access logging.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::payload::{self, Payload, PayloadError, QueryParams};
use super::{identity, movies, RequestContext};
use crate::config::{AppState, HttpConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry, LogFormat};
use crate::routing::{Endpoint, Resolution};

/// Main entry point for HTTP request handling
///
/// Generic over the body so the same path serves hyper connections and
/// in-memory requests.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let access_entry = state.access_log_enabled().then(|| {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.referer = header_value(&parts, "referer");
        entry.user_agent = header_value(&parts, "user-agent");
        entry
    });

    let response = process(&parts, body, &state).await;

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &LogFormat::parse(&state.config.logging.access_log_format));
    }

    Ok(response)
}

async fn process<B>(parts: &Parts, body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;
    let method = &parts.method;
    let path = parts.uri.path();
    let is_head = *method == hyper::Method::HEAD;

    logger::log_headers_count(parts.headers.len(), state.config.logging.show_headers);

    // 1. Reject oversized bodies before reading them
    if let Some(resp) = check_body_size(parts, http_config) {
        return resp;
    }

    // 2. Resolve route
    let (endpoint, params) = match state.router.resolve(method, path) {
        Resolution::Matched(route, params) => (route.endpoint, params),
        Resolution::Options(allowed) => return http::build_options_response(&allowed, http_config),
        Resolution::NotFound => {
            logger::log_debug(&format!("no route for {method} {path}"));
            return http::build_404_response(method, path, http_config, is_head);
        }
    };

    if let Some(raw) = params.undecodable() {
        let message = format!("Failed to decode param '{raw}'");
        logger::log_warning(&message);
        return http::build_400_response(&message, http_config);
    }

    if !params.is_empty() && logger::debug_enabled() {
        let bound: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        logger::log_debug(&format!("params {}", bound.join(", ")));
    }

    // 3. Decode inputs
    let payload = match read_payload(parts, body, http_config).await {
        Ok(payload) => payload,
        Err(e) => return payload_error_response(&e, http_config),
    };

    let ctx = RequestContext {
        is_head,
        query: QueryParams::parse(parts.uri.query()),
        params,
        payload,
    };

    // 4. Dispatch
    match endpoint {
        Endpoint::Home => identity::home(&ctx, state),
        Endpoint::SaveUserInfo => identity::save_user_info(&ctx, state).await,
        Endpoint::ShowUserInfo => identity::show_user_info(&ctx, state).await,
        Endpoint::NewMovie => movies::new_movie(&ctx, state).await,
        Endpoint::AllMovies => movies::all_movies(&ctx, state).await,
        Endpoint::UpdateMovie => movies::update_movie(&ctx, state).await,
        Endpoint::DeleteMovie => movies::delete_movie(&ctx, state).await,
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(parts: &Parts, http_config: &HttpConfig) -> Option<Response<Full<Bytes>>> {
    let content_length = parts.headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > http_config.max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {})",
                    http_config.max_body_size
                ));
                Some(http::build_413_response(http_config))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

async fn read_payload<B>(parts: &Parts, body: B, http_config: &HttpConfig) -> Result<Payload, PayloadError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let bytes = payload::read_body(body, http_config.max_body_size).await?;
    if bytes.is_empty() {
        return Ok(Payload::empty());
    }
    let content_type = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    Payload::decode(content_type, &bytes)
}

fn payload_error_response(err: &PayloadError, http_config: &HttpConfig) -> Response<Full<Bytes>> {
    match err {
        PayloadError::TooLarge { .. } => {
            logger::log_error(&err.to_string());
            http::build_413_response(http_config)
        }
        PayloadError::Read(_) | PayloadError::InvalidJson(_) | PayloadError::UnexpectedJson => {
            logger::log_warning(&err.to_string());
            http::build_400_response(&err.to_string(), http_config)
        }
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
