//! Domain types: wallet addresses, schema uids, schemas and attestations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// EVM wallet address (0x-prefixed, 20 bytes of hex).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Create a new wallet address from a hex string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the address format (basic check).
    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
            None => false,
        }
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Schema UID as issued by the registry (0x-prefixed, 32 bytes of hex).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaUid(pub String);

impl SchemaUid {
    /// Create a new schema uid from a hex string.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Get the raw uid string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the uid format (basic check).
    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(body) => body.len() == 64 && hex::decode(body).is_ok(),
            None => false,
        }
    }
}

impl fmt::Display for SchemaUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-side navigation route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route(pub String);

impl Route {
    /// Detail view for a schema, reached after creation.
    pub fn schema_view(uid: &SchemaUid) -> Self {
        Route(format!("/schema/view/{}", uid.as_str()))
    }

    /// Get the route path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user-defined attestation template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schema {
    /// Registry UID.
    pub uid: SchemaUid,
    /// Display ordinal assigned by the indexer.
    pub index: String,
    /// Raw comma-separated field-type declaration.
    pub raw_fields: String,
    /// Attestation count as reported by the indexer.
    pub attestation_count: u64,
    /// Attestations belonging to this schema.
    pub attestations: Vec<Attestation>,
}

impl Schema {
    /// Split the raw declaration into the individual field types.
    pub fn field_types(&self) -> Vec<&str> {
        self.raw_fields
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect()
    }

    /// Whether the reported count matches the fetched collection.
    pub fn count_is_consistent(&self) -> bool {
        self.attestation_count == self.attestations.len() as u64
    }
}

/// A single attestation conforming to a schema.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attestation {
    /// On-chain vs off-chain origin.
    pub is_offchain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_address_validation() {
        let valid = WalletAddress::new("0x1b7047a499b5e3c2c0a98ae67f0a85c713a704d7");
        assert!(valid.is_valid());

        assert!(!WalletAddress::new("1b7047a499b5e3c2c0a98ae67f0a85c713a704d7").is_valid());
        assert!(!WalletAddress::new("0x1b7047").is_valid());
        assert!(!WalletAddress::new("0xzz7047a499b5e3c2c0a98ae67f0a85c713a704d7").is_valid());
    }

    #[test]
    fn schema_uid_validation() {
        let valid = SchemaUid::new(format!("0x{}", "ab".repeat(32)));
        assert!(valid.is_valid());
        assert!(!SchemaUid::new("abc123").is_valid());
    }

    #[test]
    fn schema_view_route() {
        let uid = SchemaUid::new("abc123");
        assert_eq!(Route::schema_view(&uid).as_str(), "/schema/view/abc123");
    }

    #[test]
    fn field_types_split_on_commas() {
        let schema = Schema {
            uid: SchemaUid::new("0x01"),
            index: "1".to_string(),
            raw_fields: "uint256 amount, address recipient,bool active".to_string(),
            attestation_count: 0,
            attestations: vec![],
        };
        assert_eq!(
            schema.field_types(),
            vec!["uint256 amount", "address recipient", "bool active"]
        );
    }

    #[test]
    fn count_consistency() {
        let schema = Schema {
            uid: SchemaUid::new("0x01"),
            index: "1".to_string(),
            raw_fields: "bool flag".to_string(),
            attestation_count: 2,
            attestations: vec![
                Attestation { is_offchain: true },
                Attestation { is_offchain: false },
            ],
        };
        assert!(schema.count_is_consistent());
    }
}
