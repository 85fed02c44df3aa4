//! Command line arguments
//!
//! Every option may also come from the configuration file; values given on
//! the command line win.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "seqqueue")]
#[command(about = "Relay lines through an acknowledgment-gated queue")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Input file (stdin when omitted)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fail every Nth forwarding attempt so the entry is redelivered
    #[arg(long = "fail-every", value_name = "N", value_parser = parse_fail_every)]
    pub fail_every: Option<usize>,

    /// Sequence number given to the first line
    #[arg(long = "initial-sequence", value_name = "SEQ")]
    pub initial_sequence: Option<u64>,

    /// Queue name used in log records
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Log level or flexi_logger spec
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (stderr when omitted)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured log output
    #[arg(long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured log output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,
}

impl Args {
    /// `Some(true)` / `Some(false)` when forced, `None` for auto
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// A failure interval of 1 would never let an entry through
pub(crate) fn parse_fail_every(value: &str) -> Result<usize, String> {
    let n: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a positive integer", value))?;
    if n < 2 {
        return Err(format!("must be at least 2, got {}", n));
    }
    Ok(n)
}
