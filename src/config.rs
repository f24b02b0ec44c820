use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crawler::{
    Blacklist, DEFAULT_USER_AGENT, DEFAULT_WORKER_COUNT, LINK_REQUEST_TIMEOUT_SEC, WalkerConfig,
};
use crate::export::DEFAULT_EXPORT_PATH;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// This struct receives all program arguments while WalkerConfig
/// describes only the crawl engine
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Site to start the walk from
    #[arg(short, long, required_unless_present = "load_file")]
    pub seed_url: Option<String>,
    /// Number of hops to walk outward from the seed
    #[arg(short, long, default_value = "3")]
    pub depth: usize,
    /// Verifications allowed in flight at once
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub worker_count: usize,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = LINK_REQUEST_TIMEOUT_SEC)]
    pub request_timeout_sec: u64,
    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Domain that is never requested (repeatable)
    #[arg(short, long, default_value = "0xc3.win")]
    pub blacklist: Vec<String>,
    /// Where the relations are exported
    #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
    pub output_file: PathBuf,
    /// Skip the walk and visualize a previous export
    #[arg(long, conflicts_with = "seed_url")]
    pub load_file: Option<PathBuf>,
    /// Don't open the graph window
    #[arg(long)]
    pub no_visualize: bool,
    /// Don't draw a progress bar per depth round
    #[arg(long)]
    pub no_progress: bool,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.seed_url.is_none() && self.load_file.is_none() {
            anyhow::bail!("either seed_url or load_file must be given");
        }
        if self.depth == 0 {
            anyhow::bail!("depth must be greater than 0");
        }
        if self.worker_count == 0 {
            anyhow::bail!("worker_count must be greater than 0");
        }
        if self.request_timeout_sec == 0 {
            anyhow::bail!("request_timeout_sec must be greater than 0");
        }
        Ok(())
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new()
            .with_max_depth(self.depth)
            .with_worker_count(self.worker_count)
            .with_request_timeout(self.request_timeout_sec)
            .with_user_agent(self.user_agent.clone())
            .with_blacklist(Blacklist::new(&self.blacklist))
            .with_progress(!self.no_progress)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
