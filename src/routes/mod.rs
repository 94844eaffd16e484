pub mod feed;
pub mod health;
pub mod sync;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calfeed_core::CalFeedError;
use serde::Serialize;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(sync::router())
        .merge(feed::router())
        .merge(health::router())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert core errors to HTTP responses.
///
/// Input errors (missing identifier, bad storage key) are the caller's
/// fault; everything else is a storage failure.
pub struct AppError(CalFeedError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CalFeedError::MissingIdentifier | CalFeedError::InvalidKey(_) => {
                StatusCode::BAD_REQUEST
            }
            CalFeedError::Io(_) | CalFeedError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<CalFeedError> for AppError {
    fn from(err: CalFeedError) -> Self {
        Self(err)
    }
}
