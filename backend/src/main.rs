mod config;
mod inference;
mod routes;
#[cfg(test)]
mod test_support;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::AppConfig;
use routes::{UploadLimits, configure_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;

    // Loaded once; a missing model means the stub serves every request.
    let classifier = inference::load_classifier(&config.classifier);
    log::info!("Classifier in use: {}", classifier.kind());

    let limits = UploadLimits {
        max_bytes: config.server.max_upload_bytes,
    };
    let cors_max_age = config.server.cors_max_age;
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors(cors_max_age))
            .app_data(web::Data::from(classifier.clone()))
            .app_data(web::Data::new(limits.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
