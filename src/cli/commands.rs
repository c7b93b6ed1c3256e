//! CLI command implementations

use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::observability::{init_logging, LogFormat};
use crate::record_store::RecordStore;
use crate::users::USERS_COLLECTION;

use super::args::{Command, ConfigArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command).await
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, no_tls } => serve(&config, no_tls).await,
        Command::Init { config } => init(&config).await.map(|_| ()),
    }
}

fn load_config(args: &ConfigArgs) -> CliResult<AppConfig> {
    Ok(AppConfig::load(args.env.as_deref(), args.config.as_deref())?)
}

/// Create `<data_dir>/<collection>` for every known collection
///
/// Idempotent; returns the store it prepared.
pub async fn prepare_data_dir(config: &AppConfig) -> CliResult<RecordStore> {
    let store = RecordStore::new(&config.data_dir);
    store.ensure_collection(USERS_COLLECTION).await?;
    Ok(store)
}

/// Create the data directory layout
pub async fn init(args: &ConfigArgs) -> CliResult<RecordStore> {
    let config = load_config(args)?;
    let store = prepare_data_dir(&config).await?;
    println!("Initialized data directory {}", store.base_dir().display());
    Ok(store)
}

/// Start the server for the selected environment
pub async fn serve(args: &ConfigArgs, no_tls: bool) -> CliResult<()> {
    let mut config = load_config(args)?;
    if no_tls {
        config = config.without_tls();
    }

    init_logging(&config.log_level, LogFormat::from_json_flag(config.log_json));
    tracing::info!(
        env = %config.env_name,
        data_dir = %config.data_dir.display(),
        tls = config.tls.is_some(),
        "Starting server"
    );

    prepare_data_dir(&config).await?;

    HttpServer::new(config)
        .start()
        .await
        .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {e}")))
}
