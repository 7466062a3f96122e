use anyhow::Context;
use clap::{Parser, Subcommand};
use quina::api::{self, AppState};
use quina::store::AnyStore;
use quina::Config;
use quina_core::RowSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quina", about = "Quina draw results — REST API over SQLite or PostgreSQL")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: $QUINA_CONFIG, then ./quina.toml if present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the results API and the web client (the default).
    Serve {
        /// Overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Directory holding the web client.
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Create the results table and insert the sample draws.
    Bootstrap {
        /// SQLite file to bootstrap (overrides DB_PATH).
        #[arg(long, value_name = "FILE")]
        db_path: Option<PathBuf>,
    },
    /// Query a running server and summarise its answer.
    Check {
        /// Defaults to the configured port on localhost.
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        static_dir: None,
    }) {
        Command::Serve { port, static_dir } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = static_dir {
                config.server.static_dir = dir;
            }
            let store = AnyStore::open(&config.store)?;
            tracing::info!(backend = %store.backend(), "storage backend ready");
            let state = AppState::new(store, config.store.result_limit);
            api::run(state, &config.server).await
        }
        Command::Bootstrap { db_path } => {
            if let Some(path) = db_path {
                config.store.database_url = None;
                config.store.db_path = Some(path);
            }
            let store = AnyStore::open(&config.store)?;
            let report = store.bootstrap().await.context("bootstrapping the results table")?;
            println!("{report}");
            Ok(())
        }
        Command::Check { url } => {
            let url = url.unwrap_or_else(|| {
                format!("http://localhost:{}/api/results", config.server.port)
            });
            println!("testing {url}\n");
            let report = quina::check::fetch(&url).await?;
            print!("{report}");
            Ok(())
        }
    }
}
