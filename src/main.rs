use std::sync::Arc;

use stylesync_api::{
    config::Config,
    db::{self, Cache, MemoryStore, PgStore, Store},
    routes::{create_router, AppState},
    services::{
        explanation::OllamaExplainer, recommendations::Recommender, weather::WeatherService,
    },
};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "stylesync_api=debug,tower_http=info".to_string());
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
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let client = db::create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client);
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, weather readings will not be cached");
            (None, None)
        }
    };

    let explainer = OllamaExplainer::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.explanation_timeout(),
    )?;
    tracing::info!(url = %config.ollama_url, model = %config.ollama_model, "Using Ollama for explanations");

    let weather = WeatherService::from_config(&config, cache)?;

    let state = AppState {
        store,
        recommender: Recommender::new(Arc::new(explainer), config.explanation_timeout()),
        weather,
    };
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
