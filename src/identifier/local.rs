use uuid::Uuid;

use crate::error::{RegistryError, Result};

const MAX_SHORT_CODE_LEN: usize = 32;

/// Identifiers minted in-process from random UUIDs
#[derive(Debug, Clone, Default)]
pub struct LocalIdentifier {
    short_code_len: Option<usize>,
}

impl LocalIdentifier {
    /// `short_code_len` cuts the UUID down to that many upper-case hex chars
    pub fn new(short_code_len: Option<usize>) -> Result<Self> {
        if let Some(len) = short_code_len {
            if len == 0 || len > MAX_SHORT_CODE_LEN {
                return Err(RegistryError::Validation(format!(
                    "short code length must be between 1 and {MAX_SHORT_CODE_LEN}, got {len}"
                )));
            }
        }
        Ok(Self { short_code_len })
    }

    pub fn generate(&self) -> String {
        let uuid = Uuid::new_v4();
        match self.short_code_len {
            None => uuid.hyphenated().to_string(),
            Some(len) => {
                let mut code = uuid.simple().to_string();
                code.truncate(len);
                code.to_ascii_uppercase()
            }
        }
    }
}
