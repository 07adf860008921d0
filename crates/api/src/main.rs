use std::sync::Arc;

use anyhow::Context;

use pawdesk_api::config::ApiConfig;
use pawdesk_api::sessions::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = ApiConfig::from_env()?;

    pawdesk_observability::init(config.log_format);

    let store = Arc::new(match &config.session_snapshot {
        Some(path) => SessionStore::with_snapshot(path),
        None => SessionStore::in_memory(),
    });

    // Guarded routes answer "loading" until this finishes.
    {
        let store = store.clone();
        tokio::spawn(async move {
            match store.restore().await {
                Ok(count) => tracing::info!(count, "sessions restored"),
                Err(e) => tracing::warn!("session restore failed, starting empty: {e}"),
            }
        });
    }

    let app = pawdesk_api::app::build_app(store).context("failed to build route table")?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
