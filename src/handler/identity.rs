//! Identity endpoints
//!
//! `/` echoes the server owner and today's date; `/save-user-info` and
//! `/show-user-info` write and read the saved identity.

use chrono::{Local, NaiveDate};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt::Write as _;

use super::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::store::NameField;

const FALLBACK_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// `GET /`
pub fn home(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    logger::log_debug("default route");

    let now = Local::now();
    logger::log_debug(&format!("Today {}", now.to_rfc3339()));

    let app = &state.config.app;
    let body = format!(
        "My Name: {}. Today's date: {}",
        app.owner_name,
        format_date(now.date_naive(), &app.date_format)
    );
    http::build_text_response(body, &state.config.http, ctx.is_head)
}

/// `GET /save-user-info?firstName=..&lastName=..`
pub async fn save_user_info(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    if logger::debug_enabled() {
        logger::log_debug(&format!("query {}", ctx.query.to_json()));
    }

    let first_name = NameField::from_input(ctx.query.get("firstName"));
    let last_name = NameField::from_input(ctx.query.get("lastName"));
    let body = format!("User Info => Name: {first_name} {last_name}");

    state.identity.write().await.set(first_name, last_name);

    http::build_text_response(body, &state.config.http, ctx.is_head)
}

/// `GET /show-user-info`
pub async fn show_user_info(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let full_name = state.identity.read().await.full_name();
    http::build_text_response(
        format!("User Info => Name: {full_name}"),
        &state.config.http,
        ctx.is_head,
    )
}

/// Format a date with a configured `chrono` pattern
///
/// An invalid pattern falls back to the US short date.
fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_ok() {
        return out;
    }

    logger::log_warning(&format!("Invalid date format '{pattern}', using default"));
    date.format(FALLBACK_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_us_short() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(format_date(date, "%-m/%-d/%Y"), "10/17/2026");

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date, "%-m/%-d/%Y"), "3/5/2024");
    }

    #[test]
    fn test_format_date_custom_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date, "%Y-%m-%d"), "2024-03-05");
    }

    #[test]
    fn test_format_date_invalid_pattern_falls_back() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date, "%Q"), "3/5/2024");
    }
}
