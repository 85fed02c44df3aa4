//! Application startup: arguments, configuration, logging, then the relay

use super::cli::{load_config_file, Args, Settings};
use super::error::AppError;
use super::relay::{run_relay, RelaySummary};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::queue::SequencedQueue;
use clap::Parser;
use log::{debug, info};
use std::io::IsTerminal;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};
use tokio::sync::broadcast;

/// Run the application; returns the process exit status
pub async fn startup() -> i32 {
    let args = Args::parse();

    // Logging is not up yet, so configuration problems go straight to stderr
    let file_config = match load_config_file(args.config_file.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let settings = match Settings::resolve(&args, file_config, std::io::stderr().is_terminal()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let log_file = settings.log_file.as_ref().map(|p| p.to_string_lossy().into_owned());
    if let Err(e) = init_logging(
        settings.log_level.as_deref(),
        settings.log_format,
        log_file.as_deref(),
        settings.color,
    ) {
        let error = AppError::Logging {
            message: e.to_string(),
        };
        eprintln!("Error: {}", error);
        return 1;
    }

    info!(
        "seqqueue {} starting",
        crate::core::version::long_version()
    );
    debug!("Effective settings: {:?}", settings);

    let result = ShutdownCoordinator::guard(|_coordinator, shutdown_rx| {
        relay_with_settings(settings, shutdown_rx)
    })
    .await;

    match result {
        Ok(summary) => {
            info!("{}", summary);
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Relaying input");
            1
        }
    }
}

async fn relay_with_settings(
    settings: Settings,
    shutdown: broadcast::Receiver<()>,
) -> Result<RelaySummary, AppError> {
    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &settings.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| AppError::io(format!("Opening input {}", path.display()), e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let output: Box<dyn AsyncWrite + Unpin + Send> = match &settings.output {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .map_err(|e| AppError::io(format!("Creating output {}", path.display()), e))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(tokio::io::stdout())),
    };

    let queue = SequencedQueue::with_config(settings.queue.clone());
    run_relay(input, output, queue, settings.fail_every, shutdown).await
}
