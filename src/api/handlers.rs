use std::time::Duration;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    errors::CustomError,
    models::{
        api_response::{created_response, success_response},
        intent::{AddressResponse, CreateWalletBody, ImportWalletBody},
        wallet::ConfirmationPolicy,
    },
    services::intent_service::IntentService,
};

#[post("/wallet/create")]
async fn create_wallet(
    service: web::Data<IntentService>,
    body: web::Json<CreateWalletBody>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let defaults = ConfirmationPolicy::default();
    let wallet = service
        .create_wallet(
            body.network_id.unwrap_or_default(),
            body.timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            body.poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
        )
        .await?;
    Ok(created_response(wallet))
}

#[post("/wallet/import")]
async fn import_wallet(
    service: web::Data<IntentService>,
    body: web::Json<ImportWalletBody>,
) -> Result<HttpResponse, CustomError> {
    let wallet = service.import_wallet(body.into_inner().wallet_data).await?;
    Ok(success_response(wallet))
}

#[get("/wallet/export")]
async fn export_wallet(service: web::Data<IntentService>) -> Result<HttpResponse, CustomError> {
    Ok(success_response(service.export_wallet().await?))
}

#[get("/wallet/address")]
async fn get_address(service: web::Data<IntentService>) -> Result<HttpResponse, CustomError> {
    let address = service.get_default_address().await?;
    Ok(success_response(AddressResponse { address }))
}

#[post("/wallet/fund")]
async fn fund_wallet(service: web::Data<IntentService>) -> Result<HttpResponse, CustomError> {
    Ok(success_response(service.fund_wallet().await?))
}
