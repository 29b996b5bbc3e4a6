use std::fmt;

use async_trait::async_trait;
use ethers::types::Address;
use log::{debug, info};
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::CustomError, models::transaction::TransactionResult};

const TRANSACTION_PATH: &str = "/api/v0/agent/transaction";
const API_KEY_HEADER: &str = "x-brian-api-key";

/// Turns a free-text prompt into an ordered list of planned actions.
#[async_trait]
pub trait PlanningService: Send + Sync {
    async fn plan(
        &self,
        prompt: &str,
        address: Address,
    ) -> Result<Vec<TransactionResult>, CustomError>;
}

#[derive(Debug, Serialize)]
struct TransactionRequestBody<'a> {
    prompt: &'a str,
    address: String,
}

#[derive(Debug, Deserialize)]
struct TransactionResponseBody {
    #[serde(default)]
    result: Vec<TransactionResult>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client for the hosted transaction planner.
#[derive(Clone)]
pub struct BrianClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl fmt::Debug for BrianClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrianClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BrianClient {
    pub fn new(config: &Config) -> Result<Self, CustomError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CustomError::PlannerError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(
            client,
            config.planner_base_url.clone(),
            config.planner_api_key.clone(),
        ))
    }

    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Error bodies carry `error` or `message`; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.message))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PlanningService for BrianClient {
    async fn plan(
        &self,
        prompt: &str,
        address: Address,
    ) -> Result<Vec<TransactionResult>, CustomError> {
        let endpoint = self.endpoint(TRANSACTION_PATH);
        info!("planning prompt for {:?}", address);
        debug!("POST {endpoint} prompt={prompt:?}");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&TransactionRequestBody {
                prompt,
                address: format!("{:?}", address),
            })
            .send()
            .await
            .map_err(|e| CustomError::PlannerError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CustomError::PlannerError(e.to_string()))?;
        if !status.is_success() {
            return Err(CustomError::PlannerStatusError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: TransactionResponseBody = serde_json::from_str(&body)
            .map_err(|e| CustomError::PlannerError(format!("unexpected response schema: {e}")))?;
        info!("planner returned {} action(s)", parsed.result.len());
        Ok(parsed.result)
    }
}
