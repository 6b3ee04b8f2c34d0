//! HTTP mapping for refused engine operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reroute_core::EngineError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            EngineError::ProposalNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Locked | EngineError::NothingToApprove => StatusCode::CONFLICT,
            EngineError::UnknownScenario(_) | EngineError::UnknownProvider(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("Refused request ({}): {}", status, self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
