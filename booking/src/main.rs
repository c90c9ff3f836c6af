//! Cabanamar booking server.
//!
//! Serves the reservation API over the configured backend.
//!
//! # Usage
//!
//! ```bash
//! # Against the managed backend
//! SUPABASE_URL=... SUPABASE_SERVICE_KEY=... cargo run --bin server
//!
//! # Self-contained demo mode (in-memory backend, seeded session)
//! DEMO_MODE=true cargo run --bin server
//! ```

use cabanamar_booking::backend::{BookingBackend, InMemoryBackend, SupabaseBackend};
use cabanamar_booking::session::{MemorySessionStore, Profile, SessionStore, SupabaseSessionStore};
use cabanamar_booking::types::CustomerId;
use cabanamar_booking::{AppState, Config, build_router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Session token seeded in demo mode.
const DEMO_TOKEN: &str = "demo-session";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        demo = config.demo,
        "Starting Cabanamar booking server"
    );

    let (backend, sessions): (Arc<dyn BookingBackend>, Arc<dyn SessionStore>) = if config.demo {
        let sessions = MemorySessionStore::new();
        sessions
            .insert(
                DEMO_TOKEN,
                Profile {
                    customer_id: CustomerId::new(),
                    display_name: "Demo Guest".to_string(),
                    email: Some("demo@example.com".to_string()),
                    phone: None,
                },
            )
            .await;
        tracing::info!(token = DEMO_TOKEN, "Demo session seeded");
        (Arc::new(InMemoryBackend::demo()), Arc::new(sessions))
    } else {
        let http = reqwest::Client::new();
        let backend = SupabaseBackend::new(
            http.clone(),
            config.supabase.url.clone(),
            config.supabase.service_key.clone(),
        );
        let sessions = SupabaseSessionStore::new(
            http,
            config.supabase.url.clone(),
            config.supabase.service_key.clone(),
        );
        (Arc::new(backend), Arc::new(sessions))
    };

    let app = build_router(AppState::new(backend, sessions));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
