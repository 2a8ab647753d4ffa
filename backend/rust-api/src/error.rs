use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures surfaced by the game core. Nothing here is retried: every
/// operation either succeeds or reports one of these to its caller.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Too few active questions to build a three-option question.
    #[error("Not enough questions: {0}")]
    InsufficientContent(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Answer or lifeline against an ended session, or a lifeline reused.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;

/// JSON error body shared by handlers and the JSON extractor.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    pub code: &'static str,
}

impl ErrorBody {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
            code,
        }
    }
}

impl GameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::InsufficientContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GameError::SessionNotFound(_) | GameError::CategoryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            GameError::InvalidTransition(_) => StatusCode::CONFLICT,
            GameError::InvalidOption(_) | GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::Forbidden => StatusCode::FORBIDDEN,
            GameError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GameError::InsufficientContent(_) => "insufficient_content",
            GameError::SessionNotFound(_) => "session_not_found",
            GameError::CategoryNotFound(_) => "category_not_found",
            GameError::InvalidTransition(_) => "invalid_transition",
            GameError::InvalidOption(_) => "invalid_option",
            GameError::Validation(_) => "validation_failed",
            GameError::Forbidden => "forbidden",
            GameError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl From<validator::ValidationErrors> for GameError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GameError::Validation(errors.to_string())
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            GameError::StoreUnavailable(e) => {
                tracing::error!(error = %format!("{:#}", e), "Store operation failed");
            }
            other => {
                tracing::warn!(code = other.code(), "Request rejected: {}", other);
            }
        }

        // Store internals stay in the logs.
        let message = match &self {
            GameError::StoreUnavailable(_) => "Store unavailable".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(status, self.code(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            GameError::InsufficientContent("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            GameError::SessionNotFound("s".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GameError::InvalidTransition("ended".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GameError::StoreUnavailable(anyhow::anyhow!("boom")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn store_errors_convert_with_question_mark() {
        fn load() -> GameResult<()> {
            let failing: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset"));
            failing?;
            Ok(())
        }

        let err = load().unwrap_err();
        assert_eq!(err.code(), "store_unavailable");
    }
}
