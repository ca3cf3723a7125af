use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::conversion::ConversionError;
use crate::store::StoreError;
use crate::transaction::ValidationError;

/// What a caller sees. Only validation messages pass through verbatim;
/// store and upstream details stay in the log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        info!("transaction refused. StatusCode 400: {err}");
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn store_write(err: StoreError) -> Self {
        error!("failed to store transaction. StatusCode 500: {err}");
        ApiError::Internal("Failed to store transaction".to_string())
    }

    pub fn transaction_not_found(id: &str) -> Self {
        warn!("transaction with id {id} not found");
        ApiError::NotFound("transaction not found".to_string())
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        match &err {
            ConversionError::CountryRequired => {
                warn!("country parameter is required");
                ApiError::BadRequest("country is required".to_string())
            }
            ConversionError::TransactionNotFound(id) => ApiError::transaction_not_found(&id.to_string()),
            ConversionError::NoRateFound { .. } => {
                warn!("{err}");
                ApiError::NotFound("no exchange rate found".to_string())
            }
            ConversionError::Store(_) => {
                error!("{err}");
                ApiError::Internal("failed to retrieve transaction".to_string())
            }
            ConversionError::Upstream(_) => {
                error!("{err}");
                ApiError::Internal("failed to fetch exchange rates".to_string())
            }
            ConversionError::AmountOverflow { .. } => {
                error!("{err}");
                ApiError::Internal("failed to convert transaction".to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
