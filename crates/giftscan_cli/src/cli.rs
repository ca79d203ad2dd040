use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use giftscan_engine::{
    AddressError, ConcurrencyLimit, FetchSettings, ScanRange, TargetAddress,
    DEFAULT_BASE_TEMPLATE, DEFAULT_CONCURRENCY,
};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ScannerConfig;

/// Scan numbered Telegram gift pages and summarise how often each attribute value occurs.
#[derive(Debug, Parser)]
#[command(name = "giftscan", version, about)]
pub struct Cli {
    /// Collection name used to build the page address, e.g. PlushPepe
    pub name: String,

    /// Number of gifts to check
    pub count: u64,

    /// Maximum number of requests in flight [default: 10]
    pub threads: Option<usize>,

    /// Attribute row to tally
    #[arg(long, value_enum)]
    pub attribute: Option<Attribute>,

    /// First gift number to check
    #[arg(long, default_value_t = 1)]
    pub start: u64,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// RON file with scanner settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Exit right after printing the report
    #[arg(long)]
    pub no_wait: bool,

    /// Where to write log output
    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,

    /// Log file used by `--log file` and `--log both`
    #[arg(long, value_name = "PATH", default_value = "giftscan.log")]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Model,
    Backdrop,
    Symbol,
}

impl Attribute {
    /// Header text of the attribute's row on a gift page.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Model => "Model",
            Attribute::Backdrop => "Backdrop",
            Attribute::Symbol => "Symbol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("count must be at least 1")]
    ZeroCount,
    #[error("start must be at least 1")]
    ZeroStart,
    #[error("threads must be at least 1")]
    ZeroThreads,
    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Everything needed to run one scan, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub target: TargetAddress,
    pub range: ScanRange,
    pub limit: ConcurrencyLimit,
    pub attribute: Attribute,
    pub fetch: FetchSettings,
    pub output: OutputMode,
    pub wait_for_enter: bool,
}

impl Cli {
    /// Resolves flags over `config` over defaults.
    pub fn into_plan(self, config: ScannerConfig) -> Result<ScanPlan, InputError> {
        if self.count == 0 {
            return Err(InputError::ZeroCount);
        }
        if self.start == 0 {
            return Err(InputError::ZeroStart);
        }
        let threads = self
            .threads
            .or(config.threads)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if threads == 0 {
            return Err(InputError::ZeroThreads);
        }
        if self.timeout == Some(0) || config.timeout_secs == Some(0) {
            return Err(InputError::ZeroTimeout);
        }

        let template = config
            .base_template
            .as_deref()
            .unwrap_or(DEFAULT_BASE_TEMPLATE);
        let target = TargetAddress::for_collection(template, &self.name)?;

        let mut fetch = config.fetch_settings();
        if let Some(secs) = self.timeout {
            fetch.request_timeout = std::time::Duration::from_secs(secs);
        }

        let output = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Table
        };

        Ok(ScanPlan {
            target,
            range: ScanRange::starting_at(self.start, self.count),
            limit: ConcurrencyLimit::new(threads),
            attribute: self
                .attribute
                .or(config.attribute)
                .unwrap_or(Attribute::Model),
            fetch,
            output,
            wait_for_enter: output == OutputMode::Table && !self.no_wait,
        })
    }
}
