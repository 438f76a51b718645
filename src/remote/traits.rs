use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{RegistryError, Result};

/// How a record is written to the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Fails if the key already exists
    #[default]
    Create,
    /// Fails if the key does not exist
    Update,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create" | "post" => Ok(Self::Create),
            "update" | "put" => Ok(Self::Update),
            _ => Err(RegistryError::Validation(
                "invalid write mode; expected create|update".to_string(),
            )),
        }
    }
}

/// Service that hands out unique identifiers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentifierService: Send + Sync {
    /// Ask for `limit` identifiers; the service may return fewer
    async fn generate_ids(&self, limit: usize) -> Result<Vec<String>>;
}

/// Namespaced key-value store holding submitted records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn write_entry(
        &self,
        namespace: &str,
        key: &str,
        value: &serde_json::Value,
        mode: WriteMode,
    ) -> Result<()>;

    async fn list_keys(&self, namespace: &str) -> Result<Vec<String>>;

    async fn read_entry(&self, namespace: &str, key: &str) -> Result<Option<serde_json::Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mode_accepts_http_aliases() {
        assert_eq!("create".parse::<WriteMode>().unwrap(), WriteMode::Create);
        assert_eq!("PUT".parse::<WriteMode>().unwrap(), WriteMode::Update);
        assert!("upsert".parse::<WriteMode>().is_err());
    }
}
