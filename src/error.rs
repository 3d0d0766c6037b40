use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::models::MatchParseError;

/// Everything a handler can fail with, converted to an HTTP response in one
/// place. Store failures keep their detail for the server-side log only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Match with ID {0} not found")]
    NotFound(String),
    #[error("invalid match id")]
    MalformedId,
    #[error(transparent)]
    Database(mongodb::error::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Match with ID {} not found.", id),
            ),
            ApiError::MalformedId => (
                StatusCode::BAD_REQUEST,
                "Invalid match id.".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedId(_) => ApiError::MalformedId,
            StoreError::Mongo(e) => ApiError::Database(e),
        }
    }
}

impl From<MatchParseError> for ApiError {
    fn from(err: MatchParseError) -> Self {
        ApiError::Validation(format!("Invalid match data: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn validation_maps_to_bad_request() {
        let res = ApiError::Validation("Invalid match data.".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound("abc123".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_id_maps_to_bad_request() {
        let oid_err = ObjectId::parse_str("not-hex").unwrap_err();
        let err = ApiError::from(StoreError::MalformedId(oid_err));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_errors_become_validation() {
        let parse_err = crate::models::Match::from_json("[]").unwrap_err();
        let err = ApiError::from(parse_err);
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
