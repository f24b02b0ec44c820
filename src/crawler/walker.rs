use indicatif::{ProgressBar, ProgressStyle};
use log2::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use url::Url;

use super::config::WalkerConfig;
use super::domain::{DomainKey, domain_of};
use super::round::{CrawlRound, RoundOutcome};
use super::scan::PageScanner;

/// A confirmed backlink: at round `depth`, `target` was found to link back to `source`.
/// Serialized as a `[source, target, depth]` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(DomainKey, DomainKey, usize)", into = "(DomainKey, DomainKey, usize)")]
pub struct Relation {
    pub source: DomainKey,
    pub target: DomainKey,
    pub depth: usize,
}

impl Relation {
    pub fn new(source: DomainKey, target: DomainKey, depth: usize) -> Self {
        Self { source, target, depth }
    }
}

impl From<(DomainKey, DomainKey, usize)> for Relation {
    fn from((source, target, depth): (DomainKey, DomainKey, usize)) -> Self {
        Self::new(source, target, depth)
    }
}

impl From<Relation> for (DomainKey, DomainKey, usize) {
    fn from(r: Relation) -> Self {
        (r.source, r.target, r.depth)
    }
}

/// Everything the walk carries from one round to the next.
/// Only the driver touches it.
#[derive(Debug, Default)]
pub struct WalkState {
    /// Sites to crawl as origins in the current round
    pub frontier: BTreeSet<Url>,
    /// Sites already crawled as an origin
    pub visited: HashSet<DomainKey>,
    pub relations: Vec<Relation>,
    /// Number of rounds completed so far
    pub depth: usize,
}

impl WalkState {
    pub fn new(seed: Url) -> Self {
        Self {
            frontier: BTreeSet::from([seed]),
            ..Default::default()
        }
    }

    pub fn is_finished(&self, max_depth: usize) -> bool {
        self.depth >= max_depth || self.frontier.is_empty()
    }

    /// Claims `site` as an origin for this round.
    /// Returns false if it was already crawled.
    fn visit(&mut self, site: &Url) -> bool {
        self.visited.insert(domain_of(site))
    }

    /// Folds one origin's result into the state.
    /// A backlink that was already crawled still joins the next frontier, but adds no relation.
    fn absorb(&mut self, outcome: RoundOutcome, depth: usize, next_frontier: &mut BTreeSet<Url>) {
        let source = domain_of(&outcome.origin);
        for site in outcome.backlinks {
            let target = domain_of(&site);
            if !self.visited.contains(&target) {
                self.relations.push(Relation::new(source.clone(), target, depth));
            }
            next_frontier.insert(site);
        }
    }
}

/// Bar over the sites of one frontier, labelled with the round's depth.
/// Hidden bars still count, they just never draw.
pub fn round_progress(depth: usize, sites: usize, show: bool) -> ProgressBar {
    let pb = if show {
        ProgressBar::new(sites as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_length(sites as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} sites ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_message(format!("Depth {}", depth));
    pb
}

/// Breadth-first expansion of crawl rounds, one depth level at a time
pub struct FrontierWalker {
    round: CrawlRound,
    show_progress: bool,
}

impl FrontierWalker {
    pub fn new(scanner: Arc<dyn PageScanner>, config: &WalkerConfig) -> Self {
        Self {
            round: CrawlRound::new(scanner, config),
            show_progress: config.show_progress,
        }
    }

    /// Runs the next depth level to completion.
    /// Returns the round's finished progress bar.
    pub async fn step(&self, state: &mut WalkState) -> ProgressBar {
        let depth = state.depth + 1;
        let frontier = std::mem::take(&mut state.frontier);
        let mut next_frontier = BTreeSet::new();
        info!("Depth {}: {} sites in frontier", depth, frontier.len());
        let progress = round_progress(depth, frontier.len(), self.show_progress);

        // skipped sites still advance the bar
        for site in frontier {
            if state.visit(&site) {
                let outcome = self.round.run(&site).await;
                debug!(
                    "Depth {}: {} has {} backlinks",
                    depth,
                    outcome.origin,
                    outcome.backlinks.len()
                );
                state.absorb(outcome, depth, &mut next_frontier);
            }
            progress.inc(1);
        }

        progress.finish();
        state.frontier = next_frontier;
        state.depth = depth;
        progress
    }

    pub async fn walk(&self, seed: Url, max_depth: usize) -> Vec<Relation> {
        if self.round.is_blacklisted(&seed) {
            warn!("Seed {} is blacklisted, nothing will be crawled", seed);
        }

        let mut state = WalkState::new(seed);
        while !state.is_finished(max_depth) {
            self.step(&mut state).await;
        }

        info!(
            "Walk finished after {} rounds: {} relations, {} sites visited",
            state.depth,
            state.relations.len(),
            state.visited.len()
        );
        state.relations
    }
}
