//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "zipcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify the CRC-32 checksum of every file in an archive
    Verify(VerifyArgs),
    /// List archive contents with stored checksums
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Read buffer size per chunk (accepts K, M, G suffixes)
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub chunk_size: Option<u64>,

    /// Cancel the run if it has not finished in time (e.g. 500ms, 30s, 5m)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show size and stored CRC-32 of each file
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

/// Parse byte size with optional suffix (K, M, G)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    let size = num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })?;

    if size == 0 {
        return Err("byte size must be at least 1".to_string());
    }
    Ok(size)
}

/// Parse a duration with a unit suffix (ms, s, m, h); bare numbers are seconds
#[allow(clippy::option_if_let_else)]
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (num_str, unit_ms) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1000)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60_000)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3_600_000)
    } else {
        (s, 1000)
    };

    let millis = num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid duration: {s}"))
        .and_then(|n| {
            n.checked_mul(unit_ms)
                .ok_or_else(|| format!("duration overflow: {s}"))
        })?;

    if millis == 0 {
        return Err("duration must be positive".to_string());
    }
    Ok(Duration::from_millis(millis))
}
