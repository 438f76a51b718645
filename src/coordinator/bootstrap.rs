//! Wiring of the workflow from `AppConfig`.

use std::sync::Arc;
use tracing::{info, warn};

use super::{SubmissionCoordinator, SubmissionTarget};
use crate::config::{AppConfig, CacheConfig};
use crate::error::{RegistryError, Result};
use crate::identifier::IdentifierStrategy;
use crate::persistence::{CacheBackend, FileCache, MemoryCache, RosterCache};
use crate::remote::{build_dhis2_client, IdentifierService};

/// File-backed cache in the configured directory, or memory-only when
/// `ephemeral` is set or no directory can be determined.
pub fn build_roster_cache(cfg: &CacheConfig, ephemeral: bool) -> RosterCache {
    let backend: Arc<dyn CacheBackend> = match (ephemeral, cfg.resolved_dir()) {
        (false, Some(dir)) => {
            info!(dir = %dir.display(), "using roster cache directory");
            Arc::new(FileCache::new(dir))
        }
        (false, None) => {
            warn!("no data directory available, roster cache kept in memory");
            Arc::new(MemoryCache::new())
        }
        (true, _) => Arc::new(MemoryCache::new()),
    };
    RosterCache::new(backend, cfg.key.clone())
}

/// The configured identifier strategy, talking to `service` when remote
pub fn build_identifier_strategy(
    app_config: &AppConfig,
    service: Arc<dyn IdentifierService>,
) -> Result<IdentifierStrategy> {
    let strategy = IdentifierStrategy::from_config(&app_config.identifier, service)?;
    info!(strategy = %strategy.kind(), "identifier strategy selected");
    Ok(strategy)
}

/// Build the coordinator against the configured DHIS2 instance
pub fn build_coordinator(
    app_config: &AppConfig,
    ephemeral_cache: bool,
) -> Result<SubmissionCoordinator> {
    app_config
        .validate()
        .map_err(|errors| RegistryError::Validation(errors.join("; ")))?;

    let client = Arc::new(build_dhis2_client(&app_config.dhis2)?);
    let strategy = build_identifier_strategy(app_config, client.clone())?;
    let cache = build_roster_cache(&app_config.cache, ephemeral_cache);

    Ok(SubmissionCoordinator::new(
        Arc::new(strategy),
        client,
        cache,
        SubmissionTarget {
            namespace: app_config.dhis2.namespace.clone(),
            write_mode: app_config.submission.write_mode,
        },
    ))
}
