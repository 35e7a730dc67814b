//! Periodic reload of a rule document into a registry.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use super::registry::LimiterRegistry;
use super::rules::LimiterRules;

/// Reload `path` into `registry` every `interval` until `shutdown` resolves.
///
/// A document that fails to load is logged and skipped; the registry keeps
/// the last valid rule set. Returns the number of successful reloads.
pub async fn watch_rules<F>(
    path: &Path,
    interval: Duration,
    registry: &LimiterRegistry,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    let mut reloads = 0;

    info!(path = %path.display(), interval = ?interval, "Watching limiter rules");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => match LimiterRules::from_file(path) {
                Ok(rules) => {
                    let summary = registry.reload(rules);
                    for key in summary.added.iter().chain(&summary.changed) {
                        if let Some(config) = registry.get(key) {
                            info!(
                                rule = %key,
                                strategy = %config.strategy(),
                                window_ms = config.window_ms(),
                                axes = ?config.enabled_axes(),
                                "Limiter rule published"
                            );
                        }
                    }
                    reloads += 1;
                }
                Err(e) => error!(path = %path.display(), error = %e, "Rejected limiter rules"),
            },
        }
    }

    info!(path = %path.display(), reloads, "Stopped watching limiter rules");
    reloads
}
