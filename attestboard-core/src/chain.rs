//! Chain configuration.
//!
//! Exactly one chain configuration is active per process lifetime, selected
//! once at startup from the environment. Selection never fails: an
//! unsupported chain id degrades to the testnet configuration with a
//! diagnostic log line.

use serde::{Deserialize, Serialize};

/// Rootstock mainnet chain id.
pub const ROOTSTOCK_MAINNET_CHAIN_ID: u64 = 30;
/// Rootstock testnet chain id.
pub const ROOTSTOCK_TESTNET_CHAIN_ID: u64 = 31;

/// Supported network identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl Network {
    /// Get the EVM chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => ROOTSTOCK_MAINNET_CHAIN_ID,
            Network::Testnet => ROOTSTOCK_TESTNET_CHAIN_ID,
        }
    }

    /// Get the string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Human-readable network name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Rootstock",
            Network::Testnet => "Rootstock Testnet",
        }
    }

    /// Match a chain id against the supported networks.
    pub fn from_chain_id(chain_id: u64) -> Option<Network> {
        match chain_id {
            ROOTSTOCK_MAINNET_CHAIN_ID => Some(Network::Mainnet),
            ROOTSTOCK_TESTNET_CHAIN_ID => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Resolve a raw environment value to a network.
    ///
    /// Any unsupported value (unknown id, non-numeric, empty) logs a
    /// diagnostic and returns the testnet default.
    pub fn from_env_value(raw: &str) -> Network {
        match raw.trim().parse::<u64>().ok().and_then(Network::from_chain_id) {
            Some(network) => network,
            None => {
                tracing::warn!(
                    "invalid chain id {:?}, returning default configuration",
                    raw
                );
                Network::Testnet
            }
        }
    }
}

/// The active chain configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Network identifier.
    pub network: Network,
    /// EVM chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub display_name: String,
    /// RPC transport URL.
    pub rpc_url: String,
}

impl ChainConfig {
    /// Build the configuration for `network`, picking the matching RPC URL.
    pub fn for_network(network: Network, mainnet_rpc: &str, testnet_rpc: &str) -> Self {
        let rpc_url = match network {
            Network::Mainnet => mainnet_rpc,
            Network::Testnet => testnet_rpc,
        };
        Self {
            network,
            chain_id: network.chain_id(),
            display_name: network.display_name().to_string(),
            rpc_url: rpc_url.to_string(),
        }
    }

    /// Select the active configuration from a raw chain-id value.
    pub fn select(raw_chain_id: &str, mainnet_rpc: &str, testnet_rpc: &str) -> Self {
        Self::for_network(Network::from_env_value(raw_chain_id), mainnet_rpc, testnet_rpc)
    }
}
