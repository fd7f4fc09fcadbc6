use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use vollmed_api::database::manager::DatabaseManager;
use vollmed_api::handlers::{patients, physicians};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = vollmed_api::config::config();
    tracing::info!("Starting voll.med API in {:?} mode", config.environment);

    // Apply schema migrations; keep serving (degraded) if the database is down
    if let Err(e) = DatabaseManager::run_migrations().await {
        tracing::warn!("Could not apply database migrations: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("VOLLMED_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("voll.med API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Clinic entities
        .merge(physician_routes())
        .merge(patient_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn physician_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route(
            "/medicos",
            post(physicians::register)
                .get(physicians::list)
                .put(physicians::update),
        )
        .route(
            "/medicos/:id",
            get(physicians::detail).delete(physicians::remove),
        )
}

fn patient_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route(
            "/pacientes",
            post(patients::register)
                .get(patients::list)
                .put(patients::update),
        )
        .route(
            "/pacientes/:id",
            get(patients::detail).delete(patients::remove),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "voll.med API",
            "version": version,
            "description": "Clinic backend for physician and patient management",
            "endpoints": {
                "home": "/",
                "health": "/health",
                "medicos": "/medicos[/{id}]",
                "pacientes": "/pacientes[/{id}]",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
