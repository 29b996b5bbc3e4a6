use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use ethers::providers::ProviderError;
use serde::Serialize;
use thiserror::Error;

use crate::models::api_response::ApiResponse;

#[derive(Error, Debug)]
pub enum CustomError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No wallet is loaded; create or import one first")]
    NoWalletError,

    #[error("Current wallet has no default address")]
    NoDefaultAddressError,

    #[error("Faucet is only available on {expected}, current wallet is on {actual}")]
    FaucetUnavailableError { expected: String, actual: String },

    #[error("Planner request failed: {0}")]
    PlannerError(String),

    #[error("Planner responded with status {status}: {message}")]
    PlannerStatusError { status: u16, message: String },

    #[error("Failed to decode call data: {0}")]
    DecodeError(String),

    #[error("Unsupported action: {0}")]
    UnsupportedActionError(String),

    #[error("Action {action} is missing step {index}")]
    MissingStepError { action: String, index: usize },

    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction {0} reverted")]
    TransactionFailedError(String),

    #[error("Failed to get transaction receipt")]
    TransactionReceiptFailedError,

    #[error("Timed out after {0:?} waiting for confirmation")]
    ConfirmationTimeoutError(std::time::Duration),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unsupported network: {0}")]
    UnsupportedNetworkError(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    code: u16,
    message: String,
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::NoWalletError
            | CustomError::NoDefaultAddressError
            | CustomError::FaucetUnavailableError { .. }
            | CustomError::UnsupportedActionError(_)
            | CustomError::MissingStepError { .. }
            | CustomError::UnsupportedNetworkError(_)
            | CustomError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CustomError::DecodeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CustomError::PlannerError(_)
            | CustomError::PlannerStatusError { .. }
            | CustomError::ProviderError(_)
            | CustomError::NetworkError(_) => StatusCode::BAD_GATEWAY,
            CustomError::ConfirmationTimeoutError(_) => StatusCode::GATEWAY_TIMEOUT,
            CustomError::ConfigError(_)
            | CustomError::ContractError(_)
            | CustomError::TransactionFailedError(_)
            | CustomError::TransactionReceiptFailedError
            | CustomError::WalletError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let api_error = ApiError {
            code: status.as_u16(),
            message: self.to_string(),
        };

        HttpResponse::build(status).json(ApiResponse {
            status: "FAILURE".to_string(),
            code: api_error.code,
            result: None::<()>,
            error: Some(api_error),
        })
    }
}
