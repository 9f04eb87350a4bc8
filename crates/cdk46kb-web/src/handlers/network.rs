//! Global co-occurrence network.

use axum::{extract::State, Json};
use cdk46kb_common::ApiError;
use serde_json::Value;

use crate::handlers::read_json;
use crate::state::SharedState;

/// GET /api/network/full
pub async fn api_network_full(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let doc = read_json(&state.paths.network_dir().join("network_full.cyjs")).await?;
    Ok(Json(doc))
}
