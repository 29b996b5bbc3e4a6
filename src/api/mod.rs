use actix_web::web;
mod handlers;
mod intent_handlers;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(handlers::create_wallet)
            .service(handlers::import_wallet)
            .service(handlers::export_wallet)
            .service(handlers::get_address)
            .service(handlers::fund_wallet)
            .service(intent_handlers::transact),
    );
}
