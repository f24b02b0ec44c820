use anyhow::Result;
use log2::*;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;
use url::Url;
use webring_walker::{config, crawler, export, viewer};

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("webring_walker"))
        .compress(false)
        .level(cfg.log_level.to_string())
        .start();

    let relations = match (&cfg.load_file, &cfg.seed_url) {
        (Some(path), _) => export::read_relations(path)?,
        (None, Some(seed)) => {
            let seed_url = Url::parse(seed)?;
            let walker_config = cfg.walker_config();
            let scanner = Arc::new(crawler::HttpScanner::new(&walker_config)?);
            let walker = crawler::FrontierWalker::new(scanner.clone(), &walker_config);

            let relations = walker.walk(seed_url, walker_config.max_depth).await;
            info!(
                "Requested {} pages ({} failed, {} timed out) in {:.1?}",
                scanner.stats.pages_requested.load(Ordering::Relaxed),
                scanner.stats.failures.load(Ordering::Relaxed),
                scanner.stats.timeouts.load(Ordering::Relaxed),
                START_TIME.elapsed()
            );

            if let Err(e) = export::write_relations(&cfg.output_file, &relations) {
                error!("Export failed: {:#}", e);
            }
            relations
        }
        (None, None) => anyhow::bail!("nothing to do: no seed url and no file to load"),
    };

    if !cfg.no_visualize {
        viewer::show(&relations)?;
    }

    Ok(())
}
