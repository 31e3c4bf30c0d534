use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client_onboarding::config::Config;
use client_onboarding::db::Database;
use client_onboarding::db_storage::PgClientStore;
use client_onboarding::handlers::AppState;
use client_onboarding::pipeline::OnboardingPipeline;
use client_onboarding::routes::{build_router, RateLimit};
use client_onboarding::scoring_client::ScoringClient;
use client_onboarding::store::{ClientStore, InMemoryClientStore};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Client store (PostgreSQL when configured, in-memory otherwise).
/// - Scoring service client.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client_onboarding=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let scorer = ScoringClient::new(config.scoring_url.clone(), config.scoring_timeout)?;
    tracing::info!(
        "✓ Scoring client initialized: {} (timeout {:?})",
        scorer.endpoint(),
        config.scoring_timeout
    );

    match config.database_url {
        Some(ref url) => {
            let db = Database::new(url).await?;
            tracing::info!("Database connection pool established");
            serve(&config, PgClientStore::new(db.pool), scorer).await
        }
        None => serve(&config, InMemoryClientStore::new(), scorer).await,
    }
}

async fn serve<S: ClientStore>(
    config: &Config,
    store: S,
    scorer: ScoringClient,
) -> anyhow::Result<()> {
    let pipeline = OnboardingPipeline::new(store, scorer).with_locale(config.offer_locale);
    let app_state = Arc::new(AppState::new(pipeline));

    let app = build_router(
        app_state,
        Some(RateLimit {
            per_second: config.rate_limit_per_second,
            burst: config.rate_limit_burst,
        }),
    )?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Connect info lets the rate limiter fall back to the peer address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
