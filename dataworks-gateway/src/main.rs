use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;

use dataworks::config::{AgentConfig, OracleConfig};
use dataworks::oracle::OpenAiOracle;
use dataworks::Agent;

#[derive(Parser)]
#[command(name = "dataworks-gateway")]
#[command(version)]
#[command(about = "DataWorks agent gateway - free-text tasks over HTTP")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind_addr: String,

    #[arg(long, default_value = "./data")]
    data_root: PathBuf,

    #[arg(long, env = "DATAWORKS_ORACLE_URL", default_value = dataworks::config::DEFAULT_ORACLE_URL)]
    oracle_url: String,

    #[arg(long, env = "DATAWORKS_MODEL", default_value = dataworks::config::DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "DATAWORKS_EMBEDDING_MODEL", default_value = dataworks::config::DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    #[arg(long, default_value = "30")]
    timeout_seconds: u64,

    /// Name of the environment variable holding the oracle credential.
    #[arg(long, default_value = dataworks::config::DEFAULT_API_KEY_ENV)]
    api_key_env: String,
}

#[tokio::main]
async fn main() {
    // Bridge log records (reqwest, rusqlite) into tracing.
    tracing_log::LogTracer::init().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = serve(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn serve(cli: Cli) -> Result<(), String> {
    let api_key = std::env::var(&cli.api_key_env).ok();
    if api_key.is_none() {
        warn!(
            variable = %cli.api_key_env,
            "oracle credential not set; every classification will degrade to undetermined"
        );
    }

    let config = AgentConfig {
        bind_addr: cli.bind_addr,
        data_root: cli.data_root,
        oracle: OracleConfig {
            base_url: cli.oracle_url,
            model: cli.model,
            embedding_model: cli.embedding_model,
            api_key,
            timeout_seconds: cli.timeout_seconds,
            ..OracleConfig::default()
        },
    };
    config.validate()?;

    let oracle = Arc::new(OpenAiOracle::new(config.oracle.clone()).map_err(|e| e.to_string())?);
    let bind_addr = config.bind_addr.clone();
    Agent::new(&config, oracle).serve(&bind_addr).await
}
