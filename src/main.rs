use anyhow::Result;
use custom_head_code::config::Config;
use custom_head_code::i18n::StaticLayer;
use custom_head_code::server::{build_router, AppState};
use custom_head_code::store::{FragmentStore, JsonFileStore, MemoryStore};
use custom_head_code::HeadInjector;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("custom_head_code=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn FragmentStore> = match &config.store_path {
        Some(path) => {
            info!("Using JSON file store at {}", path);
            Arc::new(JsonFileStore::new(path, config.meta_key.clone()))
        }
        None => {
            warn!("STORE_PATH not set, fragments are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let languages = config.language_registry()?.map(StaticLayer::new);
    match &languages {
        Some(layer) => info!(
            "Multilingual layer active: {} languages, default '{}'",
            layer.registry().list_enabled().len(),
            layer.registry().default_language()
        ),
        None => info!("Multilingual layer inactive"),
    }

    let state = Arc::new(AppState {
        injector: HeadInjector::with_priority(store, config.head_priority),
        languages,
        api_key: config.api_key.clone(),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Preview host listening on {} (head priority {})", addr, config.head_priority);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
