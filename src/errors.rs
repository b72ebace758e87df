use axum::http::StatusCode;
use chrono::NaiveDate;

/// Failures surfaced by [`crate::storage::VisitStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an office visit entry already exists for {0}")]
    DuplicateKey(NaiveDate),
    #[error("{0}")]
    StorageFault(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StorageFault(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::StorageFault(format!("storage task failed: {err}"))
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(_) => Self::conflict(err.to_string()),
            StoreError::StorageFault(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
