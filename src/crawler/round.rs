use log2::*;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use url::Url;

use super::candidates::resolve_candidates;
use super::config::{Blacklist, WalkerConfig};
use super::domain::domain_of;
use super::scan::PageScanner;
use super::verify::BacklinkVerifier;

/// Result of crawling one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub origin: Url,
    /// Candidates that link back to the origin, in completion order
    pub backlinks: Vec<Url>,
}

impl RoundOutcome {
    fn empty(origin: Url) -> Self {
        Self { origin, backlinks: Vec::new() }
    }
}

/// Discovers and verifies the backlinks of a single origin
pub struct CrawlRound {
    scanner: Arc<dyn PageScanner>,
    verifier: Arc<BacklinkVerifier>,
    blacklist: Arc<Blacklist>,
    worker_count: usize,
}

impl CrawlRound {
    pub fn new(scanner: Arc<dyn PageScanner>, config: &WalkerConfig) -> Self {
        let blacklist = Arc::clone(&config.blacklist);
        Self {
            verifier: Arc::new(BacklinkVerifier::new(Arc::clone(&scanner), Arc::clone(&blacklist))),
            scanner,
            blacklist,
            worker_count: config.worker_count.max(1),
        }
    }

    pub fn is_blacklisted(&self, site: &Url) -> bool {
        self.blacklist.contains(&domain_of(site))
    }

    pub async fn run(&self, origin: &Url) -> RoundOutcome {
        let origin_domain = domain_of(origin);
        if self.blacklist.contains(&origin_domain) {
            debug!("Origin {} is blacklisted, not scanning", origin);
            return RoundOutcome::empty(origin.clone());
        }

        let candidates = resolve_candidates(self.scanner.as_ref(), origin).await;
        if candidates.is_empty() {
            debug!("No candidates found on {}", origin);
            return RoundOutcome::empty(origin.clone());
        }
        debug!("Verifying {} candidates for {}", candidates.len(), origin);

        let mut ordered: Vec<Url> = candidates.into_iter().collect();
        ordered.sort();
        let workers = self.worker_count.min(ordered.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(ordered)));
        // hits are sent as they are verified; a dying worker only loses its current candidate
        let (verified_tx, mut verified_rx) = mpsc::unbounded_channel::<Url>();
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let verifier = Arc::clone(&self.verifier);
            let origin_domain = origin_domain.clone();
            let verified_tx = verified_tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(candidate) = next else { break };

                    if verifier.verifies(&candidate, &origin_domain).await {
                        debug!(
                            "Worker {}: {} links back to {}",
                            worker_id, candidate, origin_domain
                        );
                        if verified_tx.send(candidate).is_err() {
                            break;
                        }
                    }
                }
            }));
        }
        drop(verified_tx);

        let mut backlinks = Vec::new();
        while let Some(candidate) = verified_rx.recv().await {
            backlinks.push(candidate);
        }
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Verification worker for {} failed: {}", origin, e);
            }
        }

        RoundOutcome { origin: origin.clone(), backlinks }
    }
}
