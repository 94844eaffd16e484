//! Calendar feed endpoint

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use calfeed_core::{CalFeedError, userid::decode_identifier};
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar/{filename}", get(serve_feed))
}

/// GET /calendar/{key}.ics - Serve a user's iCalendar feed
///
/// Calendar pollers must always re-fetch, so caching is disabled. The
/// response is 200 with a well-formed document even for users that have
/// never synced.
async fn serve_feed(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let key = filename
        .strip_suffix(".ics")
        .ok_or_else(|| CalFeedError::InvalidKey(filename.clone()))?;

    // Keys that our codec didn't produce are rejected before touching
    // storage; this is also what makes traversal via the path impossible.
    let identifier = decode_identifier(key)?;

    info!("Calendar feed requested for {key}");
    let body = state.service.feed(&identifier);

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.ics\"", header_safe(&identifier)),
            ),
            (
                header::CACHE_CONTROL,
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
        ],
        body,
    );

    Ok(response.into_response())
}

/// Reduce an identifier to something safe inside a quoted header value.
fn header_safe(identifier: &str) -> String {
    let cleaned: String = identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '@'))
        .collect();

    if cleaned.is_empty() {
        "calendar".to_string()
    } else {
        cleaned
    }
}
