//! GraphQL indexer client.
//!
//! Typed client for the attestation indexer. Responses are decoded into
//! explicit contracts at the I/O boundary: a GraphQL `errors` array or a
//! missing `data` field is an error, never a silently-ignored shape.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    confirm::SchemaLookup,
    error::AttestboardError,
    types::{Attestation, Schema, SchemaUid, WalletAddress},
};

/// Query returning the schemas a wallet created, with attestation counts.
const ATTESTATIONS_BY_WALLET_QUERY: &str = r#"
    query GetAttestationsByWalletId($where: SchemaWhereInput!) {
        schemata(where: $where) {
            id
            index
            schema
            _count {
                attestations
            }
            attestations {
                isOffchain
            }
        }
    }
"#;

/// Lookup for a single schema by id, used by the confirmation poll.
const GET_SCHEMA_QUERY: &str = r#"
    query GetSchema($where: SchemaWhereUniqueInput!) {
        getSchema(where: $where) {
            id
        }
    }
"#;

/// Attestation indexer client.
#[derive(Clone, Debug)]
pub struct IndexerClient {
    /// HTTP client.
    client: reqwest::Client,
    /// GraphQL endpoint URL.
    endpoint: String,
}

impl IndexerClient {
    /// Create a new client for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the schemas created by `creator`, with nested attestations.
    pub async fn schemata_by_creator(
        &self,
        creator: &WalletAddress,
    ) -> Result<Vec<Schema>, AttestboardError> {
        let variables = serde_json::json!({
            "where": {
                "creator": {
                    "equals": creator.as_str()
                }
            }
        });

        let response = self
            .execute_query(ATTESTATIONS_BY_WALLET_QUERY, Some(variables))
            .await?;
        let data: SchemataData = decode_data(response)?;

        Ok(data
            .schemata
            .into_iter()
            .map(SchemaRecord::into_domain)
            .collect())
    }

    /// Look up a schema by uid. `None` until the indexer has seen it.
    pub async fn get_schema(
        &self,
        uid: &SchemaUid,
    ) -> Result<Option<SchemaUid>, AttestboardError> {
        let variables = serde_json::json!({
            "where": {
                "id": uid.as_str()
            }
        });

        let response = self.execute_query(GET_SCHEMA_QUERY, Some(variables)).await?;
        let data: GetSchemaData = decode_data(response)?;

        Ok(data.get_schema.map(|schema| SchemaUid::new(schema.id)))
    }

    /// Execute a GraphQL query.
    async fn execute_query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, AttestboardError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or(serde_json::json!({}))
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttestboardError::Indexer(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AttestboardError::Indexer(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AttestboardError::Indexer(format!("failed to parse JSON: {}", e)))
    }
}

#[async_trait]
impl SchemaLookup for IndexerClient {
    async fn lookup_schema(
        &self,
        uid: &SchemaUid,
    ) -> Result<Option<SchemaUid>, AttestboardError> {
        self.get_schema(uid).await
    }
}

/// Unwrap a GraphQL envelope, surfacing server-side errors.
fn decode_data<T: serde::de::DeserializeOwned>(
    response: serde_json::Value,
) -> Result<T, AttestboardError> {
    let envelope: Envelope = serde_json::from_value(response)
        .map_err(|e| AttestboardError::Decode(format!("malformed envelope: {}", e)))?;

    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(AttestboardError::Indexer(messages.join("; ")));
        }
    }

    let data = envelope
        .data
        .ok_or_else(|| AttestboardError::Decode("response has no data field".to_string()))?;

    serde_json::from_value(data)
        .map_err(|e| AttestboardError::Decode(format!("failed to parse response: {}", e)))
}

// === Response types ===

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQLErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorEntry {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SchemataData {
    schemata: Vec<SchemaRecord>,
}

#[derive(Debug, Deserialize)]
struct SchemaRecord {
    id: String,
    index: String,
    schema: String,
    #[serde(rename = "_count")]
    count: SchemaCount,
    #[serde(default)]
    attestations: Vec<AttestationRecord>,
}

#[derive(Debug, Deserialize)]
struct SchemaCount {
    attestations: u64,
}

#[derive(Debug, Deserialize)]
struct AttestationRecord {
    #[serde(rename = "isOffchain")]
    is_offchain: bool,
}

impl SchemaRecord {
    fn into_domain(self) -> Schema {
        let schema = Schema {
            uid: SchemaUid::new(self.id),
            index: self.index,
            raw_fields: self.schema,
            attestation_count: self.count.attestations,
            attestations: self
                .attestations
                .into_iter()
                .map(|a| Attestation {
                    is_offchain: a.is_offchain,
                })
                .collect(),
        };

        if !schema.count_is_consistent() {
            tracing::warn!(
                uid = %schema.uid,
                reported = schema.attestation_count,
                fetched = schema.attestations.len(),
                "attestation count does not match fetched collection"
            );
        }

        schema
    }
}

#[derive(Debug, Deserialize)]
struct GetSchemaData {
    #[serde(rename = "getSchema")]
    get_schema: Option<SchemaRef>,
}

#[derive(Debug, Deserialize)]
struct SchemaRef {
    id: String,
}
