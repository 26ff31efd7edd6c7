mod ask_cmd;
mod ocr_cmd;
mod runtime;
mod status_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use textlens_config::{LoggingConfig, TextlensConfig};
use textlens_gateway::{build_router, start_server, GatewayState};
use textlens_logging::init_logger;
use textlens_media::UploadStore;

#[derive(Parser)]
#[command(name = "textlens")]
#[command(about = "textlens: image OCR and a Nemotron completion proxy")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.textlens/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status,
    /// Run OCR on a local image and print the text
    Ocr {
        /// Image file
        path: PathBuf,
    },
    /// Send one prompt to the completion endpoint and print the reply
    Ask {
        /// Prompt text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    textlens_config::load_dotenv();
    let (mut config, report) = textlens_config::load_and_prepare(cli.config.as_deref()).await?;

    init_logger(&logging_for(&cli.command, &config));
    report.log_warnings();

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status => status_cmd::run(config.server.port).await?,
        Commands::Ocr { path } => ocr_cmd::run(&config, &path).await?,
        Commands::Ask { text } => ask_cmd::run(&config, &text).await?,
    }

    Ok(())
}

/// One-shot commands print their result on stdout; keep their log to
/// warnings unless `RUST_LOG` says otherwise.
fn logging_for(command: &Commands, config: &TextlensConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if !matches!(command, Commands::Serve { .. }) {
        logging.level = "warn".into();
    }
    logging
}

async fn run_server(config: TextlensConfig) -> Result<()> {
    info!(
        port = config.server.port,
        bind = %config.server.bind,
        "Starting textlens"
    );
    info!(config = %textlens_config::redact(&config), "Effective configuration");

    let ocr = runtime::ocr_service(&config)?;

    let uploads = UploadStore::new(&config.uploads.dir, config.uploads.naming);
    uploads.ensure_dir().await?;
    info!(
        dir = %uploads.dir().display(),
        naming = ?uploads.naming(),
        "Upload store ready"
    );

    let completion = runtime::completion_client(&config)?;
    info!(
        endpoint = %completion.endpoint(),
        model = %completion.settings().model,
        "Completion client ready"
    );

    let state = GatewayState::new(
        ocr,
        uploads,
        Arc::new(completion),
        &config.server.public_base_url,
    );
    let router = build_router(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;
    start_server(addr, router).await
}
