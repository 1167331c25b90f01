use std::{env, error::Error, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledger_rs::{AppState, build_router, get_local_offset, graceful_shutdown};

/// The REST API server for ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: String,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    ///
    /// Transactions created without a date are dated today in this timezone.
    #[arg(short, long, default_value = "Etc/UTC")]
    timezone: String,

    /// File path to write debug logs to. Debug logs are not written if omitted.
    #[arg(long)]
    log_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_path.as_ref())?;

    if get_local_offset(&args.timezone).is_none() {
        return Err(format!("Unknown timezone {:?}", args.timezone).into());
    }

    let address: SocketAddr = format!("{}:{}", args.address, args.port).parse()?;

    let secret = env::var("SECRET").map_err(|_| "The environment variable 'SECRET' must be set")?;

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, &secret, &args.timezone)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);

    tracing::info!("HTTP server listening on {}", address);
    axum_server::bind(address)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_path: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(env_filter);

    let debug_log = match log_path {
        Some(log_path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}
