//! Wallet session adapter.
//!
//! Converts an active wallet session (chain + transport + account) into
//! ethers provider/signer objects for the write path. No transaction is
//! constructed or signed here; callers treat a missing session as "not
//! ready" rather than an error.

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider, Quorum, QuorumProvider, WeightedProvider},
    signers::{LocalWallet, Signer},
};
use url::Url;

use crate::{chain::ChainConfig, error::AttestboardError, types::WalletAddress};

/// Signer type produced by the adapter.
pub type EvmSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// RPC transport carried by a wallet session.
#[derive(Clone, Debug)]
pub enum RpcTransport {
    /// Single direct endpoint.
    Single(String),
    /// Fallback-aggregated endpoint set, in priority order.
    Fallback(Vec<String>),
}

impl RpcTransport {
    /// Highest-priority endpoint, if any.
    pub fn primary_url(&self) -> Option<&str> {
        match self {
            RpcTransport::Single(url) => Some(url),
            RpcTransport::Fallback(urls) => urls.first().map(String::as_str),
        }
    }
}

/// An active wallet connection: account, chain and transport.
#[derive(Clone, Debug)]
pub struct WalletSession {
    /// Chain the wallet is connected to.
    pub chain: ChainConfig,
    /// RPC transport(s) backing the session.
    pub transport: RpcTransport,
    /// Connected account address.
    pub account: WalletAddress,
    /// Hex-encoded signing key, when the session can sign.
    pub signing_key: Option<String>,
}

/// Read-only provider over the session transport.
#[derive(Debug)]
pub enum ReadProvider {
    /// One endpoint, one connection.
    Direct(Provider<Http>),
    /// Each endpoint wrapped individually, combined under a quorum policy.
    Fallback(Provider<QuorumProvider<Http>>),
}

/// Convert a wallet session into a read-only provider.
///
/// A one-element fallback set degrades to a direct provider.
pub fn provider_from_session(session: &WalletSession) -> Result<ReadProvider, AttestboardError> {
    match &session.transport {
        RpcTransport::Single(url) => Ok(ReadProvider::Direct(http_provider(url)?)),
        RpcTransport::Fallback(urls) => {
            if urls.is_empty() {
                return Err(AttestboardError::Wallet(
                    "fallback transport has no endpoints".to_string(),
                ));
            }
            if urls.len() == 1 {
                return Ok(ReadProvider::Direct(http_provider(&urls[0])?));
            }

            let mut builder = QuorumProvider::builder().quorum(Quorum::Majority);
            for url in urls {
                let parsed = Url::parse(url).map_err(|e| {
                    AttestboardError::Wallet(format!("invalid rpc url {}: {}", url, e))
                })?;
                builder = builder.add_provider(WeightedProvider::new(Http::new(parsed)));
            }

            Ok(ReadProvider::Fallback(Provider::new(builder.build())))
        }
    }
}

/// Convert a wallet session into a signer bound to the session chain.
pub fn signer_from_session(session: &WalletSession) -> Result<EvmSigner, AttestboardError> {
    let url = session
        .transport
        .primary_url()
        .ok_or_else(|| AttestboardError::Wallet("session has no rpc endpoint".to_string()))?;
    let provider = http_provider(url)?;

    let key = session
        .signing_key
        .as_deref()
        .ok_or_else(|| AttestboardError::Wallet("session has no signing key".to_string()))?;
    let wallet = key
        .parse::<LocalWallet>()
        .map_err(|e| AttestboardError::Wallet(format!("invalid signing key: {}", e)))?
        .with_chain_id(session.chain.chain_id);

    let derived = format!("{:#x}", wallet.address());
    if !derived.eq_ignore_ascii_case(session.account.as_str()) {
        tracing::warn!(
            account = %session.account,
            derived = %derived,
            "signer address does not match session account"
        );
    }

    Ok(SignerMiddleware::new(provider, wallet))
}

/// Provider for the current session; `None` when no session is active.
pub fn current_provider(session: Option<&WalletSession>) -> Option<ReadProvider> {
    let session = session?;
    match provider_from_session(session) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::warn!("provider unavailable: {}", e);
            None
        }
    }
}

/// Signer for the current session; `None` when not connected or unable to sign.
pub fn current_signer(session: Option<&WalletSession>) -> Option<EvmSigner> {
    let session = session?;
    match signer_from_session(session) {
        Ok(signer) => Some(signer),
        Err(e) => {
            tracing::warn!("signer unavailable: {}", e);
            None
        }
    }
}

fn http_provider(url: &str) -> Result<Provider<Http>, AttestboardError> {
    Provider::<Http>::try_from(url)
        .map_err(|e| AttestboardError::Wallet(format!("invalid rpc url {}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainConfig, Network};

    // Throwaway key, never funded.
    const TEST_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn test_session(transport: RpcTransport, signing_key: Option<String>) -> WalletSession {
        WalletSession {
            chain: ChainConfig::for_network(
                Network::Testnet,
                "http://localhost:4444",
                "http://localhost:4444",
            ),
            transport,
            account: WalletAddress::new("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23"),
            signing_key,
        }
    }

    #[test]
    fn single_transport_yields_direct_provider() {
        let session = test_session(
            RpcTransport::Single("http://localhost:4444".to_string()),
            None,
        );
        assert!(matches!(
            provider_from_session(&session).unwrap(),
            ReadProvider::Direct(_)
        ));
    }

    #[test]
    fn one_element_fallback_degrades_to_direct() {
        let session = test_session(
            RpcTransport::Fallback(vec!["http://localhost:4444".to_string()]),
            None,
        );
        assert!(matches!(
            provider_from_session(&session).unwrap(),
            ReadProvider::Direct(_)
        ));
    }

    #[test]
    fn multi_element_fallback_yields_quorum_provider() {
        let session = test_session(
            RpcTransport::Fallback(vec![
                "http://localhost:4444".to_string(),
                "http://localhost:4445".to_string(),
            ]),
            None,
        );
        assert!(matches!(
            provider_from_session(&session).unwrap(),
            ReadProvider::Fallback(_)
        ));
    }

    #[test]
    fn empty_fallback_is_an_error() {
        let session = test_session(RpcTransport::Fallback(vec![]), None);
        assert!(provider_from_session(&session).is_err());
    }

    #[test]
    fn no_session_means_not_ready() {
        assert!(current_provider(None).is_none());
        assert!(current_signer(None).is_none());
    }

    #[test]
    fn signer_requires_a_key() {
        let session = test_session(
            RpcTransport::Single("http://localhost:4444".to_string()),
            None,
        );
        assert!(signer_from_session(&session).is_err());
        assert!(current_signer(Some(&session)).is_none());
    }

    #[test]
    fn signer_binds_session_chain_id() {
        let session = test_session(
            RpcTransport::Single("http://localhost:4444".to_string()),
            Some(TEST_KEY.to_string()),
        );
        let signer = signer_from_session(&session).unwrap();
        assert_eq!(signer.signer().chain_id(), 31);
    }
}
