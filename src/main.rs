mod app;
mod config;
mod dto;
mod handlers;
mod middleware;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use axum::{ServiceExt, extract::Request};

use tracing_subscriber::EnvFilter;

use repository::Repository;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Loaded config: {:?}", cfg);

    // Repository creation
    let repo = if cfg.seed_fixtures {
        Repository::with_fixtures().unwrap_or_else(|e| {
            tracing::error!("Failed to build fixture notes: {e}");
            panic!("failed to build fixture notes: {e}");
        })
    } else {
        Repository::empty()
    };
    tracing::info!("Store starts with {} notes", repo.list().len());
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(repo));

    // Service creation
    let service = Arc::new(NoteService::new(repo_ptr));

    // Router config
    let router = app::build_router(service, cfg.body_limit);

    let listener = tokio::net::TcpListener::bind(cfg.bind_address())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind {}: {e}", cfg.bind_address());
            panic!("failed to bind {}: {e}", cfg.bind_address());
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server running, listening on {}", addr),
        Err(e) => tracing::warn!("Server running, local address unknown: {e}"),
    }

    axum::serve(listener, ServiceExt::<Request>::into_make_service(router))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("HTTP server error: {e}");
            panic!("failed to run HTTP server: {e}");
        });
}
