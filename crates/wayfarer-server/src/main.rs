mod routes;
mod state;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use wayfarer_core::model::{GeminiClient, ModelConfig};
use wayfarer_core::places::{KakaoLocalClient, PlacesConfig};
use wayfarer_db::config::DbConfig;
use wayfarer_db::pool;

use state::AppState;

#[derive(Parser)]
#[command(name = "wayfarer", about = "Collaborative travel-planning backend")]
struct Cli {
    /// Database URL (overrides WAYFARER_DATABASE_URL env var)
    #[arg(long)]
    database_url: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db_config = match cli.database_url {
        Some(url) => DbConfig::new(url),
        None => DbConfig::from_env(),
    };

    pool::ensure_database_exists(&db_config).await?;
    let db_pool = pool::create_pool(&db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let model_config = ModelConfig::from_env()?;
    let model = Arc::new(GeminiClient::new(model_config));

    let places_config = PlacesConfig::from_env()?;
    let places = Arc::new(KakaoLocalClient::new(places_config));

    let state = AppState {
        pool: db_pool.clone(),
        model,
        places,
    };

    let result = routes::run_serve(state, &cli.bind, cli.port).await;

    db_pool.close().await;
    result
}
