use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Rejected user input. Handlers turn this into a flash message and a redirect.
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = match &self {
            AppError::NotFound(_) | AppError::Validation(_) => self.to_string(),
            _ => "Internal server error".to_string(),
        };
        (
            status,
            Html(format!(
                "<!doctype html><title>{code}</title><h1>{code}</h1><p>{}</p>",
                tera::escape_html(&body),
                code = status.as_u16()
            )),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
