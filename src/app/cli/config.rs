//! TOML configuration file loading and merging with the command line
//!
//! ```toml
//! log_level = "debug"
//! log_format = "ext"
//!
//! [queue]
//! name = "shipper"
//! initial_sequence = 0
//!
//! [relay]
//! input = "/var/log/app.log"
//! fail_every = 5
//! ```

use super::args::Args;
use crate::app::error::AppError;
use crate::core::logging::LogFormat;
use crate::queue::QueueConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Relay options from the `[relay]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub fail_every: Option<usize>,
}

/// Contents of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub color: Option<bool>,
    pub queue: QueueConfig,
    pub relay: RelayConfig,
}

impl FileConfig {
    /// Parse and validate file contents; `path` is only used in messages
    pub fn parse(path: &Path, contents: &str) -> Result<Self, AppError> {
        let config: FileConfig = toml::from_str(contents).map_err(|e| {
            AppError::config(format!("Error parsing {}: {}", path.display(), e))
        })?;

        if let Some(n) = config.relay.fail_every {
            if n < 2 {
                return Err(AppError::config(format!(
                    "Error in {}: relay.fail_every must be at least 2, got {}",
                    path.display(),
                    n
                )));
            }
        }
        if let Some(format) = &config.log_format {
            format.parse::<LogFormat>().map_err(|e| {
                AppError::config(format!("Error in {}: {}", path.display(), e))
            })?;
        }
        Ok(config)
    }
}

/// `<config_dir>/Seqqueue/seqqueue.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Seqqueue").join("seqqueue.toml"))
}

/// Load the configuration file
///
/// An explicitly named file must exist. Without one the default path is
/// used if present; `Ok(None)` means there is no file to load.
pub async fn load_config_file(config_file: Option<&Path>) -> Result<Option<FileConfig>, AppError> {
    let path = match config_file {
        Some(path) => {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(AppError::config(format!(
                    "The specified configuration file does not exist: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::io(format!("Reading configuration file {}", path.display()), e))?;
    FileConfig::parse(&path, &contents).map(Some)
}

/// Effective settings after merging file and command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: Option<String>,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub color: bool,
    pub queue: QueueConfig,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub fail_every: Option<usize>,
}

impl Settings {
    /// Command line values win over file values; colour falls back to
    /// whether the log destination is a terminal
    pub fn resolve(args: &Args, file: Option<FileConfig>, is_terminal: bool) -> Result<Self, AppError> {
        let file = file.unwrap_or_default();

        let log_format = match args.log_format.as_ref().or(file.log_format.as_ref()) {
            Some(format) => format.parse::<LogFormat>().map_err(AppError::config)?,
            None => LogFormat::default(),
        };
        let log_file = args.log_file.clone().or(file.log_file);
        let color = args
            .color_override()
            .or(file.color)
            .unwrap_or(is_terminal && log_file.is_none());

        let mut queue = file.queue;
        if let Some(name) = &args.name {
            queue.name = name.clone();
        }
        if let Some(seq) = args.initial_sequence {
            queue.initial_sequence = seq;
        }

        Ok(Self {
            log_level: args.log_level.clone().or(file.log_level),
            log_format,
            log_file,
            color,
            queue,
            input: args.input.clone().or(file.relay.input),
            output: args.output.clone().or(file.relay.output),
            fail_every: args.fail_every.or(file.relay.fail_every),
        })
    }
}
