//! Identifier Provider
//!
//! A new record needs a unique key before it can be written. Two strategies
//! exist and exactly one is chosen when the workflow is built:
//! - `local`: a random UUID minted in-process, optionally cut down to an
//!   upper-case display code
//! - `remote`: a code issued by the DHIS2 identifier generator

pub mod local;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::IdentifierConfig;
use crate::error::{RegistryError, Result};
use crate::remote::IdentifierService;

pub use local::LocalIdentifier;
pub use remote::RemoteIdentifier;

/// Which identifier strategy is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Local,
    #[default]
    Remote,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" | "uuid" => Ok(Self::Local),
            "remote" | "server" => Ok(Self::Remote),
            _ => Err(RegistryError::Validation(
                "invalid identifier strategy; expected local|remote".to_string(),
            )),
        }
    }
}

/// Capability: produce a unique identifier for a new record
#[async_trait]
pub trait IdentifierProvider: Send + Sync {
    async fn next_identifier(&self) -> Result<String>;

    /// Several identifiers at once
    async fn next_identifiers(&self, count: usize) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.next_identifier().await?);
        }
        Ok(ids)
    }
}

/// The active strategy, fixed at construction
pub enum IdentifierStrategy {
    Local(LocalIdentifier),
    Remote(RemoteIdentifier),
}

impl IdentifierStrategy {
    /// Build the configured strategy. `service` is only used by `remote`.
    pub fn from_config(cfg: &IdentifierConfig, service: Arc<dyn IdentifierService>) -> Result<Self> {
        match cfg.strategy {
            StrategyKind::Local => Ok(Self::Local(LocalIdentifier::new(cfg.short_code_len)?)),
            StrategyKind::Remote => Ok(Self::Remote(RemoteIdentifier::new(service))),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Local(_) => StrategyKind::Local,
            Self::Remote(_) => StrategyKind::Remote,
        }
    }
}

#[async_trait]
impl IdentifierProvider for IdentifierStrategy {
    async fn next_identifier(&self) -> Result<String> {
        match self {
            Self::Local(local) => Ok(local.generate()),
            Self::Remote(remote) => remote.next_identifier().await,
        }
    }

    async fn next_identifiers(&self, count: usize) -> Result<Vec<String>> {
        match self {
            Self::Local(local) => Ok((0..count).map(|_| local.generate()).collect()),
            Self::Remote(remote) => remote.next_identifiers(count).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockIdentifierService;

    #[test]
    fn strategy_kind_parses_aliases() {
        assert_eq!("uuid".parse::<StrategyKind>().unwrap(), StrategyKind::Local);
        assert_eq!("Remote".parse::<StrategyKind>().unwrap(), StrategyKind::Remote);
        assert!("random".parse::<StrategyKind>().is_err());
    }

    #[tokio::test]
    async fn local_strategy_never_calls_the_service() {
        let mut service = MockIdentifierService::new();
        service.expect_generate_ids().never();

        let cfg = IdentifierConfig {
            strategy: StrategyKind::Local,
            short_code_len: Some(8),
        };
        let strategy = IdentifierStrategy::from_config(&cfg, Arc::new(service)).unwrap();
        assert_eq!(strategy.kind(), StrategyKind::Local);

        let ids = strategy.next_identifiers(3).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.len() == 8));
    }

    #[tokio::test]
    async fn remote_strategy_uses_the_service() {
        let mut service = MockIdentifierService::new();
        service
            .expect_generate_ids()
            .withf(|limit| *limit == 1)
            .times(1)
            .returning(|_| Ok(vec!["ABC123".to_string()]));

        let strategy =
            IdentifierStrategy::from_config(&IdentifierConfig::default(), Arc::new(service))
                .unwrap();
        assert_eq!(strategy.kind(), StrategyKind::Remote);
        assert_eq!(strategy.next_identifier().await.unwrap(), "ABC123");
    }
}
