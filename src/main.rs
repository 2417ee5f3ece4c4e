use std::sync::Arc;
use axum::{
    routing::{Router, get},
    http::{Method, HeaderValue},
    middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    compression::CompressionLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing::{info, warn, error};
use tokio::time::Duration;

mod routes;
mod models;
mod services;
mod config;
mod error;
mod utils;
mod state;

use crate::{
    config::Config,
    state::AppState,
    services::{
        Database,
        AuthService,
        AuthorService,
        BookService,
        CategoryService,
        CommentService,
        NotificationService,
        RealtimeService,
        UserService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| "inkshelf=debug,tower_http=debug".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Inkshelf service...");

    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    let db = Arc::new(match Database::new(&config).await {
        Ok(db) => {
            match db.verify_connection().await {
                Ok(_) => {
                    info!("Database connection established successfully");
                    db
                }
                Err(e) => {
                    warn!("Database connection failed: {}", e);
                    info!("Attempting to auto-start database...");

                    if let Err(start_err) = auto_start_database(&config).await {
                        error!("Failed to auto-start database: {}. Original error: {}", start_err, e);
                        return Err(anyhow::anyhow!("Database connection failed"));
                    }

                    let db = Database::new(&config).await?;
                    db.verify_connection().await?;
                    info!("Database auto-started and connected successfully");
                    db
                }
            }
        }
        Err(e) => {
            error!("Failed to create database connection: {}", e);
            return Err(anyhow::anyhow!("Database initialization failed"));
        }
    });

    // Service wiring: the realtime registry and recipient resolver feed
    // the notification dispatcher, which the comment service invokes
    let auth_service = AuthService::new(&config).await?;
    let user_service = UserService::new(db.clone(), auth_service.clone()).await?;
    let realtime_service = RealtimeService::new().await?;
    let notification_service =
        NotificationService::new(db.clone(), user_service.clone(), realtime_service.clone()).await?;
    let comment_service = CommentService::new(db.clone(), notification_service.clone()).await?;
    let book_service = BookService::new(db.clone()).await?;
    let category_service = CategoryService::new(db.clone()).await?;
    let author_service = AuthorService::new(db.clone()).await?;

    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: (*db).clone(),
        auth_service,
        user_service,
        author_service,
        book_service,
        category_service,
        comment_service,
        notification_service,
        realtime_service,
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(
            config.cors_allowed_origins
                .split(',')
                .map(|origin| origin.parse::<HeaderValue>().unwrap())
                .collect::<Vec<_>>(),
        );

    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/author", routes::author::router())
        .nest("/api/books", routes::books::router())
        .nest("/api/categories", routes::categories::router())
        .nest("/api/comments", routes::comments::router())
        .nest("/api/notifications", routes::notifications::router())
        .nest("/api/ws", routes::websocket::router())
        .layer(middleware::from_fn_with_state(app_state.clone(), utils::middleware::auth_middleware))
        .layer(middleware::from_fn_with_state(app_state.clone(), utils::middleware::rate_limit_middleware))
        .layer(middleware::from_fn(utils::middleware::request_logging_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server on http://{}", addr);

    axum::Server::bind(&addr.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "Inkshelf is running!"
}

async fn auto_start_database(config: &Config) -> anyhow::Result<()> {
    info!("Attempting to start SurrealDB...");

    let output = tokio::process::Command::new("surreal")
        .args(&[
            "start",
            "--user", &config.database_username,
            "--pass", &config.database_password,
            "memory",
        ])
        .spawn();

    match output {
        Ok(_) => {
            info!("SurrealDB started successfully");
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok(())
        }
        Err(e) => {
            error!("Failed to start SurrealDB: {}", e);
            Err(anyhow::anyhow!("Failed to start database"))
        }
    }
}
