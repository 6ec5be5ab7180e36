use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
