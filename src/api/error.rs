use http::StatusCode;
use thiserror::Error;

use crate::render::RenderError;
use crate::store::error::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) | ApiError::Render(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-visible detail string; internal failures stay generic.
    pub fn detail(&self) -> &'static str {
        match self {
            ApiError::NotFound => "Not found.",
            ApiError::MethodNotAllowed => "Method not allowed.",
            _ => "Internal server error.",
        }
    }
}
