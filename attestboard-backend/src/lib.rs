//! attestboard-backend library
//!
//! Axum-based HTTP service for the attestation dashboard.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use attestboard_core::{
    config::AppConfig,
    confirm::{ConfirmError, SchemaConfirmer},
    indexer::IndexerClient,
    types::{SchemaUid, WalletAddress},
    view::{Dashboard, QueryState, DEFAULT_PAGE_SIZE},
};

/// Application state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub attestations: IndexerClient,
    pub confirmer: SchemaConfirmer,
}

impl AppState {
    /// Wire the clients from the resolved configuration.
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        let attestations = IndexerClient::new(config.graphql_url.clone());
        let confirm_indexer = IndexerClient::new(config.indexer_url.clone());
        let confirmer = SchemaConfirmer::new(Arc::new(confirm_indexer), config.confirm_policy());

        Self {
            config,
            attestations,
            confirmer,
        }
    }
}

/// Build the router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/dashboard/:address", get(dashboard))
        .route("/schema/created", post(schema_created))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Active configuration summary.
async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let chain = &state.config.chain;
    Json(serde_json::json!({
        "network": chain.network.as_str(),
        "chain_id": chain.chain_id,
        "display_name": chain.display_name,
        "rpc_url": chain.rpc_url,
        "graphql_url": state.config.graphql_url,
        "indexer_url": state.config.indexer_url,
        "indexer_wait": state.config.enable_indexer_wait,
    }))
}

#[derive(Debug, Deserialize)]
struct DashboardParams {
    page: Option<usize>,
}

/// Dashboard view for one wallet: stat cards, schema table, pagination.
///
/// An indexer failure renders the error view inline rather than an HTTP
/// error; the data fields are absent from that response.
async fn dashboard(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<DashboardParams>,
) -> impl IntoResponse {
    let creator = WalletAddress::new(address);
    if !creator.is_valid() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid wallet address" })),
        )
            .into_response();
    }

    let page = params.page.unwrap_or(1);
    let view: QueryState<Dashboard> = state
        .attestations
        .schemata_by_creator(&creator)
        .await
        .map(|schemata| Dashboard::for_page(&schemata, page, DEFAULT_PAGE_SIZE))
        .into();

    Json(view).into_response()
}

#[derive(Debug, Deserialize)]
struct SchemaCreatedRequest {
    #[serde(rename = "schemaId")]
    schema_id: String,
}

/// Completion callback from the schema-creation widget.
///
/// Confirms the schema against the indexer (subject to the wait flag) and
/// returns the detail route to navigate to.
async fn schema_created(
    State(state): State<AppState>,
    Json(request): Json<SchemaCreatedRequest>,
) -> impl IntoResponse {
    let uid = SchemaUid::new(request.schema_id.trim());
    if uid.as_str().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "empty schema id" })),
        )
            .into_response();
    }

    match state.confirmer.confirm(uid, CancellationToken::new()).await {
        Ok(confirmation) => Json(serde_json::json!({
            "route": confirmation.route.as_str(),
            "polls": confirmation.polls,
            "confirmed": confirmation.confirmed,
        }))
        .into_response(),
        Err(e @ ConfirmError::Exhausted { .. }) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
