//! Organic framework network.

use axum::{extract::State, Json};
use cdk46kb_common::ApiError;
use serde_json::{json, Value};

use crate::handlers::{read_json, read_table, records};
use crate::state::SharedState;

/// GET /api/organic/elements
pub async fn api_organic_elements(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let mut doc = read_json(&state.paths.organic_dir().join("organic_full.cyjs")).await?;
    let elements = doc
        .get_mut("elements")
        .map(Value::take)
        .ok_or_else(|| ApiError::Internal("organic_full.cyjs has no 'elements'".to_string()))?;
    Ok(Json(json!({ "elements": elements })))
}

/// GET /api/organic/style
pub async fn api_organic_style(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(read_json(&state.paths.organic_dir().join("organic_style.json")).await?))
}

/// GET /api/organic/nodes
pub async fn api_organic_nodes(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let table = read_table(&state.paths.organic_dir().join("organic_nodes.csv")).await?;
    Ok(Json(json!({ "nodes": records(&table) })))
}

/// GET /api/organic/edges
pub async fn api_organic_edges(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let table = read_table(&state.paths.organic_dir().join("organic_edges.csv")).await?;
    Ok(Json(json!({ "edges": records(&table) })))
}
