use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use kirana_market::{api, database::JsonStore, seeds};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

    log::info!("🚀 Starting Kirana Market server...");
    log::info!("📂 Data directory: {}", data_dir);

    let db = JsonStore::open(&data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    // 🌱 Seed demo stores and a demo customer on first run
    if let Err(e) = seeds::sample_data::seed_sample_data(&db).await {
        log::error!("❌ Sample data seed failed: {}", e);
    }

    let db_data = web::Data::new(db.clone());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    HttpServer::new(move || {
        // The browser front-end is served from file:// or any static host,
        // so the API answers any origin.
        let cors = Cors::permissive();

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(api::configure)
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
