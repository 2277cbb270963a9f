use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use pentest_intake::config::AppConfig;
use pentest_intake::notify::{self, Notifier};
use pentest_intake::store::{MemorySubmissionStore, PgSubmissionStore, SubmissionStore};
use pentest_intake::{db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pentest_intake=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env();

    let store: Arc<dyn SubmissionStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            db::migrate(&pool).await.context("Failed to run migrations")?;
            Arc::new(PgSubmissionStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, submissions are kept in memory only");
            Arc::new(MemorySubmissionStore::new())
        }
    };

    let (notifier, failures) = Notifier::from_config(&config.notify);
    tokio::spawn(notify::log_failures(failures));

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        addr = %addr,
        storage = store.backend(),
        sinks = ?notifier.sink_names(),
        "Starting pentest intake API server"
    );

    let app = routes::router(AppState {
        store,
        notifier,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
