//! Environment configuration with validation

use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};
use std::{env, str::FromStr, time::Duration};

use crate::error::ConfigError;
use crate::pipeline::DecodePolicy;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Jupiter perpetuals program
pub const DEFAULT_PROGRAM_ID: &str = "PERPHjGBqRHArX4DySjwM6UJHiR3sWAatqfdBS2qQJu";

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    /// Restrict collection to one wallet's positions.
    pub owner: Option<Pubkey>,
    pub commitment: CommitmentConfig,
    pub request_timeout: Duration,
    pub decode_policy: DecodePolicy,
    pub log_level: String,
}

impl ScannerConfig {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ScannerConfig {
            rpc_url: var("SOLANA_RPC_URL", DEFAULT_RPC_URL),
            program_id: parse_address("PROGRAM_ID", &var("PROGRAM_ID", DEFAULT_PROGRAM_ID))?,
            owner: lookup("POSITION_OWNER")
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_address("POSITION_OWNER", &s))
                .transpose()?,
            commitment: {
                let raw = var("SOLANA_COMMITMENT", "confirmed");
                let commitment = CommitmentLevel::from_str(raw.trim()).map_err(|_| {
                    ConfigError::InvalidValue {
                        field: "SOLANA_COMMITMENT".to_string(),
                        value: raw.clone(),
                    }
                })?;
                CommitmentConfig { commitment }
            },
            request_timeout: {
                let raw = var("RPC_TIMEOUT_SECONDS", "30");
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "RPC_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            },
            decode_policy: var("DECODE_POLICY", "skip").parse()?,
            log_level: var("LOG_LEVEL", "info"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired("SOLANA_RPC_URL".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "RPC timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_address(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Create example .env file
pub fn create_env_example() -> String {
    r#"# Solana Configuration
SOLANA_RPC_URL=https://api.mainnet-beta.solana.com
SOLANA_COMMITMENT=confirmed
RPC_TIMEOUT_SECONDS=30

# Program to scan
PROGRAM_ID=PERPHjGBqRHArX4DySjwM6UJHiR3sWAatqfdBS2qQJu
# Only collect positions of this wallet (optional)
POSITION_OWNER=

# skip | fail_fast
DECODE_POLICY=skip

LOG_LEVEL=info
"#
    .to_string()
}
