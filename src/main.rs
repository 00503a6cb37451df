use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use plantcare_api::database;
use plantcare_api::handlers::{self, AppState};
use plantcare_api::middleware::jwt_auth_middleware;
use plantcare_api::store::ResourceStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = plantcare_api::config::config();
    tracing::info!("Starting plantcare API in {:?} mode", config.environment);

    let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "plantcare_db".to_string());

    // The pool is built once here and threaded through everything that needs
    // it; it is closed exactly once on the way out.
    let pool = database::connect(&db_name, &config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {}: {}", db_name, e));

    let state = AppState {
        delegates: ResourceStore::new(pool.clone()),
        plants: ResourceStore::new(pool.clone()),
        reminders: ResourceStore::new(pool.clone()),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PLANTCARE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("plantcare API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    pool.close().await;
    tracing::info!("Closed database pool: {}", db_name);
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("ctrl-c handler");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Scheduler feed (internal, no user token)
        .route("/v1/reminders/due", get(handlers::reminders::due))
        // Protected resource routes
        .merge(delegate_routes())
        .merge(plant_routes())
        .merge(reminder_routes())
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn delegate_routes() -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use handlers::delegates;

    Router::new()
        .route("/v1/proxy/create", post(delegates::create))
        .route("/v1/proxy/:id", get(delegates::get))
        .route("/v1/proxys", get(delegates::list))
        .route("/v1/proxys/search", get(delegates::search))
        .route("/v1/proxy/:id", put(delegates::update))
        .route("/v1/proxy/:id", delete(delegates::delete))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn plant_routes() -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use handlers::plants;

    Router::new()
        .route("/v1/plant/create", post(plants::create))
        .route("/v1/plant/:id", get(plants::get))
        .route("/v1/plants", get(plants::list))
        .route("/v1/plants/search", get(plants::search))
        .route("/v1/plant/:id", put(plants::update))
        .route("/v1/plant/:id", delete(plants::delete))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn reminder_routes() -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use handlers::reminders;

    Router::new()
        .route("/v1/reminder/create", post(reminders::create))
        .route("/v1/reminder/:id", get(reminders::get))
        .route("/v1/reminders", get(reminders::list))
        .route("/v1/reminders/search", get(reminders::search))
        .route("/v1/reminder/:id", put(reminders::update))
        .route("/v1/reminder/:id", delete(reminders::delete))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Plantcare API (Rust)",
            "version": version,
            "description": "Owner-scoped proxy delegate, plant and reminder services built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "proxys": "/v1/proxy/create, /v1/proxy/:id, /v1/proxys, /v1/proxys/search (bearer token)",
                "plants": "/v1/plant/create, /v1/plant/:id, /v1/plants, /v1/plants/search (bearer token)",
                "reminders": "/v1/reminder/create, /v1/reminder/:id, /v1/reminders, /v1/reminders/search (bearer token)",
                "scheduler": "/v1/reminders/due (internal)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(state.delegates.pool()).await {
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
