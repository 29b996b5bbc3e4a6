use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use log::info;

use crate::{
    errors::CustomError,
    models::{
        api_response::success_response,
        intent::{ReceiptSummary, TransactRequest, TransactResponse},
    },
    services::intent_service::IntentService,
};

#[post("/intent/transact")]
async fn transact(
    service: web::Data<IntentService>,
    request: web::Json<TransactRequest>,
) -> Result<HttpResponse, CustomError> {
    let prompt = request.into_inner().prompt;
    if prompt.trim().is_empty() {
        return Err(CustomError::ValidationError("prompt must not be empty".to_string()));
    }
    info!("transact request: {prompt:?}");

    let receipts = service.transact(&prompt).await?;
    Ok(success_response(TransactResponse {
        receipts: receipts.iter().map(ReceiptSummary::from).collect(),
        completed_at: Utc::now(),
    }))
}
