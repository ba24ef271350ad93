use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn logged(handler: &str, error: PipelineError) -> Self {
        match &error {
            PipelineError::Unexpected(e) => log::error!("Error in {}: {:?}", handler, e),
            other => log::error!("Error in {}: {}", handler, other),
        }
        ApiError::Pipeline(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub fn require(value: &str, field: &'static str) -> Result<(), ApiError> {
    match value.trim().is_empty() {
        true => Err(ApiError::MissingField(field)),
        false => Ok(()),
    }
}
