//! Movie list endpoints
//!
//! Create, read, update and delete over the shared movie registry. Each
//! handler takes the registry lock once and performs one operation under
//! it, so concurrent requests never observe a half-applied change.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use super::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::store::MovieRegistry;

/// Body of `PUT /update-movie/:titleToUpdate`
#[derive(Debug, Serialize)]
struct UpdateOutcome {
    success: bool,
}

/// Body of `DELETE /delete-movie/:titleToDelete`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteOutcome {
    has_been_deleted: bool,
}

fn trace_list(label: &str, registry: &MovieRegistry) {
    if logger::debug_enabled() {
        let titles = serde_json::to_string(registry.titles()).unwrap_or_default();
        logger::log_debug(&format!("movie list {label} {titles}"));
    }
}

/// `POST /new-movie` with body `{ "title": .. }`
pub async fn new_movie(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    if logger::debug_enabled() {
        logger::log_debug(&format!("body {}", ctx.payload.as_json()));
    }

    let title = ctx.payload.field("title");
    state.movies.write().await.add(title);

    http::build_json_response(&serde_json::json!({}), &state.config.http, ctx.is_head)
}

/// `GET /all-movies`
pub async fn all_movies(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let titles = {
        let movies = state.movies.read().await;
        if movies.is_empty() {
            logger::log_debug("movie list is empty");
        } else if logger::debug_enabled() {
            logger::log_debug(&format!("listing {} movies", movies.len()));
        }
        movies.snapshot()
    };
    http::build_json_response(&titles, &state.config.http, ctx.is_head)
}

/// `PUT /update-movie/:titleToUpdate` with body `{ "newTitle": .. }`
///
/// Reports `success: false` when no movie has the given title.
pub async fn update_movie(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let title_to_update = ctx.param("titleToUpdate");
    let new_title = ctx.payload.field("newTitle");
    if logger::debug_enabled() {
        logger::log_debug(&format!("update {title_to_update:?} -> {new_title}"));
    }

    let success = {
        let mut movies = state.movies.write().await;
        trace_list("before", &movies);
        let success = movies.update(title_to_update, new_title);
        trace_list("after", &movies);
        success
    };

    if !success && logger::debug_enabled() {
        logger::log_debug(&format!("no movie titled {title_to_update:?}"));
    }

    http::build_json_response(&UpdateOutcome { success }, &state.config.http, ctx.is_head)
}

/// `DELETE /delete-movie/:titleToDelete`
pub async fn delete_movie(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let title_to_delete = ctx.param("titleToDelete");

    let has_been_deleted = {
        let mut movies = state.movies.write().await;
        if logger::debug_enabled() {
            logger::log_debug(&format!(
                "delete {title_to_delete:?} at {:?}",
                movies.position(title_to_delete)
            ));
        }
        trace_list("before", &movies);
        let deleted = movies.delete(title_to_delete);
        if deleted {
            trace_list("after", &movies);
        }
        deleted
    };

    http::build_json_response(
        &DeleteOutcome { has_been_deleted },
        &state.config.http,
        ctx.is_head,
    )
}
