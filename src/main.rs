use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use intent_relay::{api, Config, IntentService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        error!("{e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let service = IntentService::from_config(&config).map_err(|e| {
        error!("{e}");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let service = web::Data::new(service);

    info!("listening on 127.0.0.1:{}", config.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .app_data(service.clone())
            .configure(api::config)
            .wrap(cors)
    })
    .bind(("127.0.0.1", config.port))?
    .run()
    .await
}
