use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rating_recommender::{
    api::{create_router, AppState},
    config::{Config, DatasetKind},
    services::sources::{load_store, BookCrossingSource, MovieLensSource, RatingSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rating_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let source: Box<dyn RatingSource> = match config.dataset {
        DatasetKind::Books => Box::new(BookCrossingSource::new(&config.data_dir)),
        DatasetKind::Movies => Box::new(MovieLensSource::new(&config.data_dir)),
    };

    // The store is complete before the first request can reach it
    let store = load_store(source.as_ref())
        .await
        .with_context(|| format!("Failed to load dataset from {}", config.data_dir.display()))?;

    let addr = config.bind_addr();
    let app = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
