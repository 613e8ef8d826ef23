use std::path::PathBuf;

use clap::Parser;
use sqlgate::{config, server};

/// sqlgate - SQL over HTTP for SQLite
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// SQLite database file (created if missing)
    #[arg(long, default_value = "./db.sqlite3")]
    database: PathBuf,

    /// Milliseconds to wait on a locked database
    #[arg(long, default_value_t = 100)]
    busy_timeout_ms: u64,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_body_bytes: usize,

    /// Replace store error text in responses with generic messages
    #[arg(long)]
    quiet_errors: bool,

    /// Load configuration from a YAML file instead of flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run server in daemon mode (graceful shutdown on SIGINT/SIGTERM)
    #[arg(long)]
    daemon: bool,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            database_path: cli.database,
            busy_timeout_ms: cli.busy_timeout_ms,
            max_body_bytes: cli.max_body_bytes,
            quiet_errors: cli.quiet_errors,
            daemon: cli.daemon,
        }
    }
}

#[tokio::main]
async fn main() {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("sqlgate v{}", env!("CARGO_PKG_VERSION"));

    let config = match cli.config.clone() {
        Some(path) => config::ServerConfig::from_yaml_file(path),
        None => config::ServerConfig::from_cli(cli.into()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run_with_config(config).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
