//! Deployment configuration
//!
//! Role wiring for a new ledger, loaded from JSON:
//!
//! ```json
//! {
//!   "owner": "0x0000000000000000000000000000000000000001",
//!   "payer": "0x0000000000000000000000000000000000000002",
//!   "first_beneficiary": "0x0000000000000000000000000000000000000003",
//!   "second_beneficiary": "0x0000000000000000000000000000000000000004"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use types::ids::Address;

use crate::errors::ConfigError;
use crate::splitter::Splitter;

/// Initial role identities for a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Deploying identity; controls `set_payer` and `close`
    pub owner: Address,
    pub payer: Address,
    pub first_beneficiary: Address,
    pub second_beneficiary: Address,
}

impl DeploymentConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading deployment config");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Validate the roles and create the ledger.
    pub fn deploy(&self) -> Result<Splitter, ConfigError> {
        Ok(Splitter::deploy(self)?)
    }
}
