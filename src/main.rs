mod api;
mod database;
mod jobs;
mod middleware;
mod models;
mod seeds;
mod services;
mod store;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Student Portal Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🆔 Raise the student ID counter to the highest already-assigned value
    seeds::counter_seed::sync_student_id_counter(&db).await;

    // 🔔 Start the student ID assigner worker
    log::info!("🔔 Starting background jobs...");
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    jobs::id_assigner::start_id_assigner(db.clone(), event_rx);
    let events_data = web::Data::new(event_tx);
    log::info!("✅ Background jobs started");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Admin page
            .allowed_origin("http://localhost:8080") // Student dashboard
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(events_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Users: registration (student ID assigned asynchronously)
            .service(
                web::scope("/api/v1/users")
                    .route("", web::post().to(api::users::create_user)),
            )
            // Messages: support inbox
            .service(
                web::scope("/api/v1/messages")
                    .route("", web::get().to(api::messages::get_all_messages))
                    .route("", web::post().to(api::messages::create_message))
                    .route("/status", web::post().to(api::messages::update_message_status)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
