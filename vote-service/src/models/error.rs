use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::VoteResponse;
use crate::publisher::SubmitError;

impl SubmitError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::MissingIdentity { .. } => StatusCode::BAD_REQUEST,
            SubmitError::InvalidChoice(_) => StatusCode::BAD_REQUEST,
            SubmitError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            SubmitError::BrokerFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmitError::ProducerUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the voter; internal causes stay in the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::MissingIdentity { .. } => "Voter ID missing. Please try voting again.",
            SubmitError::InvalidChoice(_) => "Invalid vote option.",
            SubmitError::Busy => "System busy, please try again later.",
            SubmitError::BrokerFailure(_) => "Failed to submit vote due to system error.",
            SubmitError::ProducerUnavailable => "System error: Kafka not connected",
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(VoteResponse::error(self.user_message()))).into_response()
    }
}
