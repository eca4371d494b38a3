//! Deployment file.
//!
//! ```json
//! {
//!   "deployer": "0x…",
//!   "token": {
//!     "name": "Bastion Dollar",
//!     "symbol": "BUSD",
//!     "initial_supply": 1000000,
//!     "decimals": 6,
//!     "owner": "0x…",
//!     "features": { "mintable": true, "deny_list_enabled": true }
//!   }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bastion_contracts::{FeatureFlags, GatedToken, TokenConfig};
use bastion_protocol::Principal;

/// Who deploys the token, and with what configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Initial owner. Control passes to `token.owner` right after
    /// deployment if the two differ.
    pub deployer: Principal,
    pub token: TokenConfig,
}

impl DeploymentConfig {
    /// Reads and parses a deployment file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read deployment file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid deployment file {}", path.display()))
    }

    /// Writes the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode deployment")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write deployment file {}", path.display()))
    }

    /// A compliance-heavy example: mintable, burnable, pausable, deny-list
    /// and force transfer enabled.
    pub fn sample() -> Self {
        let issuer = Principal::derive("bastion-issuer");
        Self {
            deployer: issuer,
            token: TokenConfig {
                name: "Bastion Dollar".into(),
                symbol: "BUSD".into(),
                initial_supply: 1_000_000,
                decimals: 6,
                owner: issuer,
                features: FeatureFlags {
                    mintable: true,
                    burnable: true,
                    pausable: true,
                    deny_list_enabled: true,
                    allow_list_enabled: false,
                    force_transfer_allowed: true,
                },
            },
        }
    }

    /// Deploys the configured token on a fresh ledger.
    pub fn deploy(&self) -> Result<GatedToken> {
        GatedToken::deploy(self.token.clone(), self.deployer).with_context(|| {
            format!(
                "failed to deploy token {} ({})",
                self.token.name, self.token.symbol
            )
        })
    }
}
