use log2::debug;
use std::sync::Arc;
use url::Url;

use super::config::Blacklist;
use super::domain::{DomainKey, domain_of};
use super::scan::{PageScanner, scan_or_empty};

/// Whether any of `links` points back at `origin_domain`.
///
/// This is plain substring containment on the serialized link, so a link to
/// `a.test.mirror.net` counts as pointing at `a.test`. Known to admit false
/// positives; kept as is. Links only reach this point if they parsed as a `Url`,
/// so an href like `https://a.test:99999/` never matches.
pub fn links_back(links: &[Url], origin_domain: &DomainKey) -> bool {
    links
        .iter()
        .any(|link| link.as_str().contains(origin_domain.as_str()))
}

/// Checks a single candidate site for an image-backlink to an origin
pub struct BacklinkVerifier {
    scanner: Arc<dyn PageScanner>,
    blacklist: Arc<Blacklist>,
}

impl BacklinkVerifier {
    pub fn new(scanner: Arc<dyn PageScanner>, blacklist: Arc<Blacklist>) -> Self {
        Self { scanner, blacklist }
    }

    pub async fn verifies(&self, candidate: &Url, origin_domain: &DomainKey) -> bool {
        if self.blacklist.contains(&domain_of(candidate)) {
            debug!("Skipping blacklisted candidate {}", candidate);
            return false;
        }

        let links = scan_or_empty(self.scanner.as_ref(), candidate).await;
        links_back(&links, origin_domain)
    }
}
