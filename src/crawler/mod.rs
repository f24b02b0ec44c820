pub mod candidates;
pub mod config;
pub mod domain;
pub mod round;
pub mod scan;
pub mod verify;
pub mod walker;


pub use candidates::{resolve_candidates, root_of};
pub use config::{
    Blacklist, DEFAULT_BLACKLIST, DEFAULT_USER_AGENT, DEFAULT_WORKER_COUNT,
    LINK_REQUEST_TIMEOUT_SEC, WalkerConfig,
};
pub use domain::{DomainKey, domain_of, is_external};
pub use round::{CrawlRound, RoundOutcome};
pub use scan::{
    HttpScanner, PageScanner, ScanFailure, ScanStats, extract_image_links, scan_or_empty,
};
pub use verify::{BacklinkVerifier, links_back};
pub use walker::{FrontierWalker, Relation, WalkState, round_progress};
