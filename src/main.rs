use anyhow::{bail, Context, Result};
use axum::serve;
use statboard::core::config::Config;
use statboard::core::startup::{open_record_store, open_user_store};
use statboard::core::state::AppState;
use statboard::core::{routes, tracing_init};
use statboard::importer;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

const USAGE: &str = "usage: statboard [CONFIG] [serve | import [SPREADSHEET] | clear]";

#[derive(Debug, PartialEq)]
enum Command {
    Serve,
    Import(Option<PathBuf>),
    Clear,
}

fn parse_args(args: &[String]) -> Result<(PathBuf, Command)> {
    let is_command = |arg: &str| matches!(arg, "serve" | "import" | "clear");

    let (config_path, rest) = match args.first() {
        Some(first) if !is_command(first) => (PathBuf::from(first), &args[1..]),
        _ => (PathBuf::from("config.toml"), args),
    };

    let command = match rest {
        [] => Command::Serve,
        [cmd] if cmd == "serve" => Command::Serve,
        [cmd] if cmd == "clear" => Command::Clear,
        [cmd] if cmd == "import" => Command::Import(None),
        [cmd, path] if cmd == "import" => Command::Import(Some(PathBuf::from(path))),
        _ => bail!(USAGE),
    };

    Ok((config_path, command))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (config_path, command) = parse_args(&args)?;

    // Missing signing key or bad values abort here, before anything starts
    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'",
            config_path.display()
        ))?;

    tracing_init::init_tracing(&config.logging);

    match command {
        Command::Serve => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(config.server.num_threads)
                .enable_all()
                .build()
                .context("Failed to build Tokio runtime")?;

            runtime.block_on(async_main(config, config_path))
        }
        Command::Import(path) => {
            let path = path.unwrap_or_else(|| config.import.spreadsheet.clone());
            let records = open_record_store(&config.storage)?;
            let summary = importer::import_spreadsheet(&records, &path)
                .context(format!("Failed to import '{}'", path.display()))?;

            println!("imported {} rows, {} failed", summary.inserted, summary.failed);
            Ok(())
        }
        Command::Clear => {
            let records = open_record_store(&config.storage)?;
            let removed = importer::clear_all(&records)?;

            println!("removed {} records", removed);
            Ok(())
        }
    }
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        num_threads = config.server.num_threads,
        data_dir = %config.storage.data_dir.display(),
        log_level = %config.logging.level,
        "Statboard starting"
    );

    let records = open_record_store(&config.storage)?;
    let users = open_user_store(&config.storage)?;

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = AppState::new(config, records, users);

    info!(
        records = state.records.len(),
        users = state.users.len(),
        "Statboard startup complete"
    );

    let app = routes::build_router(Arc::new(state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "HTTP server listening");

    if let Err(e) = serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "HTTP server failed");
        return Err(e).context("HTTP server error");
    }

    info!("Shutting down gracefully");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_serve() {
        let (path, command) = parse_args(&[]).unwrap();
        assert_eq!(path, PathBuf::from("config.toml"));
        assert_eq!(command, Command::Serve);
    }

    #[test]
    fn test_config_path_then_command() {
        let (path, command) = parse_args(&args(&["prod.toml", "clear"])).unwrap();
        assert_eq!(path, PathBuf::from("prod.toml"));
        assert_eq!(command, Command::Clear);
    }

    #[test]
    fn test_import_with_and_without_path() {
        let (_, command) = parse_args(&args(&["import"])).unwrap();
        assert_eq!(command, Command::Import(None));

        let (path, command) = parse_args(&args(&["c.toml", "import", "stats.xlsx"])).unwrap();
        assert_eq!(path, PathBuf::from("c.toml"));
        assert_eq!(command, Command::Import(Some(PathBuf::from("stats.xlsx"))));
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_args(&args(&["c.toml", "migrate"])).is_err());
        assert!(parse_args(&args(&["clear", "extra"])).is_err());
    }
}
