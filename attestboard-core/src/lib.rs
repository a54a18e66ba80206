//! attestboard-core
//!
//! Core library for the Rootstock EAS attestation dashboard:
//!
//! - chain selection (Rootstock mainnet/testnet, testnet fallback)
//! - process configuration resolved once at startup
//! - typed GraphQL indexer client for attestation queries
//! - schema-creation confirmation poll (bounded, cancellable)
//! - wallet session to ethers provider/signer adapter
//! - presentation models for the dashboard view

pub mod chain;
pub mod config;
pub mod confirm;
pub mod error;
pub mod indexer;
pub mod types;
pub mod view;
pub mod wallet;

pub use chain::{ChainConfig, Network};
pub use config::{AppConfig, AppMetadata};
pub use confirm::{
    ConfirmError, ConfirmPolicy, Confirmation, SchemaConfirmer, SchemaLookup,
};
pub use error::AttestboardError;
pub use indexer::IndexerClient;
pub use types::{Attestation, Route, Schema, SchemaUid, WalletAddress};
pub use view::{Dashboard, PageItem, QueryState, SchemaRow, StatCard};
pub use wallet::{
    current_provider, current_signer, EvmSigner, ReadProvider, RpcTransport, WalletSession,
};
