use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::IdentifierProvider;
use crate::error::{RegistryError, Result};
use crate::remote::IdentifierService;

/// Identifiers issued by the remote identifier service
#[derive(Clone)]
pub struct RemoteIdentifier {
    service: Arc<dyn IdentifierService>,
}

impl RemoteIdentifier {
    pub fn new(service: Arc<dyn IdentifierService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl IdentifierProvider for RemoteIdentifier {
    async fn next_identifier(&self) -> Result<String> {
        let codes = self.next_identifiers(1).await?;
        codes.into_iter().next().ok_or_else(|| {
            RegistryError::IdentifierAcquisition("identifier service returned no codes".to_string())
        })
    }

    /// One service call asking for `count` codes
    async fn next_identifiers(&self, count: usize) -> Result<Vec<String>> {
        let codes = self
            .service
            .generate_ids(count)
            .await
            .map_err(RegistryError::into_identifier_failure)?;

        let codes: Vec<String> = codes
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        debug!(requested = count, received = codes.len(), "identifier codes received");

        if codes.len() < count {
            return Err(RegistryError::IdentifierAcquisition(format!(
                "identifier service returned {} of {} requested codes",
                codes.len(),
                count
            )));
        }
        Ok(codes)
    }
}
