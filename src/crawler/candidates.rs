use std::collections::HashSet;
use url::Url;

use super::domain::{domain_of, is_external};
use super::scan::{PageScanner, scan_or_empty};

/// Reduces a link to the root of its site (`scheme://host[:port]/`).
/// Links without a host, such as `mailto:`, have no root.
pub fn root_of(link: &Url) -> Option<Url> {
    let host = link.host_str()?;
    let root = match link.port() {
        Some(port) => format!("{}://{}:{}/", link.scheme(), host, port),
        None => format!("{}://{}/", link.scheme(), host),
    };
    Url::parse(&root).ok()
}

/// External sites the origin points at through image-wrapped anchors,
/// one root URL per site.
pub async fn resolve_candidates(scanner: &dyn PageScanner, origin_url: &Url) -> HashSet<Url> {
    let origin_domain = domain_of(origin_url);
    scan_or_empty(scanner, origin_url)
        .await
        .iter()
        .filter(|link| is_external(link, &origin_domain))
        .filter_map(root_of)
        .collect()
}
