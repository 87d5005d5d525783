use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed entity key: {0}")]
    BadKey(String),

    #[error("malformed query parameter: {0}")]
    BadParam(&'static str),

    #[error("no such entity")]
    NotFound,

    #[error("malformed upload: {0}")]
    BadUpload(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadKey { .. } | AppError::BadParam { .. } | AppError::BadUpload { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
