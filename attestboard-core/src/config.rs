//! Process configuration.
//!
//! All values are resolved once at startup via [`AppConfig::from_env`] and
//! passed by reference; nothing reads the environment afterwards.

use std::{env, time::Duration};

use anyhow::{Context, Result};

use crate::{chain::ChainConfig, confirm::ConfirmPolicy};

/// Active chain id (30 mainnet / 31 testnet).
pub const CHAIN_ID_ENV: &str = "ATTESTBOARD_CHAIN_ID";
/// Mainnet RPC transport URL.
pub const MAINNET_RPC_ENV: &str = "ATTESTBOARD_MAINNET_RPC_URL";
/// Testnet RPC transport URL.
pub const TESTNET_RPC_ENV: &str = "ATTESTBOARD_TESTNET_RPC_URL";
/// WalletConnect project identifier.
pub const WALLETCONNECT_PROJECT_ID_ENV: &str = "ATTESTBOARD_WALLETCONNECT_PROJECT_ID";
/// GraphQL endpoint serving attestation queries.
pub const GRAPHQL_URL_ENV: &str = "ATTESTBOARD_GRAPHQL_URL";
/// Indexer endpoint polled during schema-creation confirmation.
pub const INDEXER_URL_ENV: &str = "ATTESTBOARD_INDEXER_URL";
/// Whether schema creation waits for the indexer before navigating.
pub const INDEXER_WAIT_ENV: &str = "ATTESTBOARD_ENABLE_INDEXER_WAIT";
/// Confirmation poll interval in milliseconds.
pub const POLL_INTERVAL_MS_ENV: &str = "ATTESTBOARD_POLL_INTERVAL_MS";
/// Maximum confirmation poll attempts.
pub const POLL_MAX_ATTEMPTS_ENV: &str = "ATTESTBOARD_POLL_MAX_ATTEMPTS";

const DEFAULT_MAINNET_RPC: &str = "https://public-node.rsk.co";
const DEFAULT_TESTNET_RPC: &str = "https://public-node.testnet.rsk.co";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;

/// Static application metadata handed to the wallet-connect layer.
#[derive(Clone, Debug)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "EAS".to_string(),
            description: "Attestation schema dashboard for Rootstock".to_string(),
            url: "https://example.com".to_string(),
            icon: "https://example.com/logo.png".to_string(),
        }
    }
}

/// Process-wide configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Active chain, selected from [`CHAIN_ID_ENV`].
    pub chain: ChainConfig,
    /// Mainnet RPC transport URL.
    pub mainnet_rpc_url: String,
    /// Testnet RPC transport URL.
    pub testnet_rpc_url: String,
    /// WalletConnect project identifier.
    pub walletconnect_project_id: String,
    /// GraphQL endpoint serving attestation queries.
    pub graphql_url: String,
    /// Indexer endpoint polled during schema-creation confirmation.
    pub indexer_url: String,
    /// Whether schema creation waits for the indexer before navigating.
    pub enable_indexer_wait: bool,
    /// Confirmation poll interval.
    pub poll_interval: Duration,
    /// Maximum confirmation poll attempts.
    pub poll_max_attempts: u32,
    /// Application metadata for the wallet-connect layer.
    pub metadata: AppMetadata,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mainnet_rpc_url =
            env::var(MAINNET_RPC_ENV).unwrap_or_else(|_| DEFAULT_MAINNET_RPC.to_string());
        let testnet_rpc_url =
            env::var(TESTNET_RPC_ENV).unwrap_or_else(|_| DEFAULT_TESTNET_RPC.to_string());

        let raw_chain_id = env::var(CHAIN_ID_ENV).unwrap_or_default();
        let chain = ChainConfig::select(&raw_chain_id, &mainnet_rpc_url, &testnet_rpc_url);

        let walletconnect_project_id = env::var(WALLETCONNECT_PROJECT_ID_ENV)
            .with_context(|| format!("{} must be set", WALLETCONNECT_PROJECT_ID_ENV))?;
        let graphql_url = env::var(GRAPHQL_URL_ENV)
            .with_context(|| format!("{} must be set", GRAPHQL_URL_ENV))?;
        let indexer_url = env::var(INDEXER_URL_ENV)
            .with_context(|| format!("{} must be set", INDEXER_URL_ENV))?;

        let enable_indexer_wait = env::var(INDEXER_WAIT_ENV)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let poll_interval_ms: u64 = env::var(POLL_INTERVAL_MS_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let poll_max_attempts: u32 = env::var(POLL_MAX_ATTEMPTS_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS);

        Ok(Self {
            chain,
            mainnet_rpc_url,
            testnet_rpc_url,
            walletconnect_project_id,
            graphql_url,
            indexer_url,
            enable_indexer_wait,
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_max_attempts,
            metadata: AppMetadata::default(),
        })
    }

    /// Confirmation policy derived from this configuration.
    pub fn confirm_policy(&self) -> ConfirmPolicy {
        ConfirmPolicy {
            wait_for_indexer: self.enable_indexer_wait,
            poll_interval: self.poll_interval,
            max_attempts: self.poll_max_attempts,
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn loads_from_environment() {
        env::set_var(CHAIN_ID_ENV, "30");
        env::set_var(WALLETCONNECT_PROJECT_ID_ENV, "test-project");
        env::set_var(GRAPHQL_URL_ENV, "http://localhost:4000/graphql");
        env::set_var(INDEXER_URL_ENV, "http://localhost:4001/graphql");
        env::set_var(INDEXER_WAIT_ENV, "true");
        env::set_var(POLL_INTERVAL_MS_ENV, "500");
        env::set_var(POLL_MAX_ATTEMPTS_ENV, "5");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.chain.chain_id, 30);
        assert_eq!(config.graphql_url, "http://localhost:4000/graphql");
        assert!(config.enable_indexer_wait);

        let policy = config.confirm_policy();
        assert!(policy.wait_for_indexer);
        assert_eq!(policy.poll_interval, Duration::from_millis(500));
        assert_eq!(policy.max_attempts, 5);
    }
}
