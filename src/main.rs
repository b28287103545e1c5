//! DPR Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use sea_orm_migration::MigratorTrait;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dpr_server_lib::auth::ServiceKey;
use dpr_server_lib::config::{Config, SERVICE_KEY_HEADER, SESSION_TOKEN_HEADER};
use dpr_server_lib::db::DbPool;
use dpr_server_lib::migration::Migrator;
use dpr_server_lib::services::Storage;
use dpr_server_lib::{api, middleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and S3 credentials must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  DPR Server");
    info!("  Environment: {}", config.environment);
    info!("  Sites: {}", config.sites.join(", "));
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL, S3 and the service key");
    }

    // Connect to PostgreSQL
    let pool = match DbPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database connection established");

    // Run migrations
    if let Err(e) = Migrator::up(pool.connection(), None).await {
        error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    info!("Database migrations complete");

    // Initialize S3 storage (creates the bucket in development/MinIO)
    let storage = match Storage::new(&config.s3).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to initialize S3 storage: {}", e);
            std::process::exit(1);
        }
    };

    // SMTP is optional at startup; the dispatch bin fails loudly instead.
    if !config.smtp.is_complete() {
        warn!("SMTP configuration incomplete - email dispatch will be unavailable");
    }

    // Prepare shared state
    let bind_address = config.bind_address();
    let service_key = ServiceKey::new(config.service_key.clone());
    let max_upload_size = config.max_upload_size;
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                    SESSION_TOKEN_HEADER.parse().unwrap(),
                    SERVICE_KEY_HEADER.parse().unwrap(),
                ])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                    SESSION_TOKEN_HEADER.parse().unwrap(),
                    SERVICE_KEY_HEADER.parse().unwrap(),
                ])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(middleware::RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(service_key.clone()))
            .app_data(web::Data::new(storage.clone()))
            // Allow some multipart overhead above the per-file limit;
            // the streaming code enforces the real bound.
            .app_data(web::PayloadConfig::new(max_upload_size * 2))
            // Configure API routes
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_auth_routes)
                    .configure(api::configure_user_routes)
                    .configure(api::configure_media_routes)
                    .configure(api::configure_report_routes)
                    .configure(api::configure_activity_routes)
                    .configure(api::configure_recipient_routes)
                    .configure(api::configure_export_routes)
                    .configure(api::configure_metrics_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            )
    });

    // Set worker count
    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
