mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use axum::{Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        broadcast_event_bus::{BroadcastEventBus, spawn_registration_listener},
        schema::ensure_schema,
        user_repository::PostgresUserRepository,
        uuid_token_generator::UuidTokenGenerator,
    },
    presentation::handlers::user_handler::create_user_router,
    usecase::register_user_usecase::RegisterUserUsecase,
};

const EVENT_BUS_CAPACITY: usize = 256;

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "registration=debug,tower_http=info,sea_orm=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;

    let event_bus = BroadcastEventBus::new(EVENT_BUS_CAPACITY);
    spawn_registration_listener(event_bus.subscribe());

    let register_user_usecase = RegisterUserUsecase::new(
        PostgresUserRepository::new(db),
        Argon2PasswordHasher::new(config.hash_cost)?,
        UuidTokenGenerator::new(),
        event_bus,
        config.confirmation_window(),
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/auth", create_user_router(register_user_usecase))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", config.listen_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
