use std::collections::HashSet;
use std::sync::Arc;

use super::domain::DomainKey;

/// Default timeout for page requests in seconds
pub const LINK_REQUEST_TIMEOUT_SEC: u64 = 5;
/// Number of verifications allowed in flight within one round
pub const DEFAULT_WORKER_COUNT: usize = 32;
pub const DEFAULT_USER_AGENT: &str = "curl/8.13.0";
/// Sites known to hang the scanner
pub const DEFAULT_BLACKLIST: &[&str] = &["0xc3.win"];

/// Domains that are never requested, neither as origin nor as candidate.
/// Fixed once built.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    domains: HashSet<DomainKey>,
}

impl Blacklist {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| DomainKey::from(d.as_ref()))
                .collect(),
        }
    }

    pub fn contains(&self, domain: &DomainKey) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Configuration for the walker and everything it drives
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub max_depth: usize,
    pub worker_count: usize,
    pub request_timeout_sec: u64,
    pub user_agent: String,
    pub blacklist: Arc<Blacklist>,
    /// Draw a progress bar per depth round
    pub show_progress: bool,
}

impl WalkerConfig {
    pub fn new() -> Self {
        Self {
            max_depth: 1,
            worker_count: DEFAULT_WORKER_COUNT,
            request_timeout_sec: LINK_REQUEST_TIMEOUT_SEC,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            blacklist: Arc::new(Blacklist::new(DEFAULT_BLACKLIST)),
            show_progress: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = Arc::new(blacklist);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self::new()
    }
}
