//! Knowledge map: the outline hierarchy and its jsMind rendering.

use axum::{extract::State, Json};
use cdk46kb_common::{hierarchy::parse_outline, ApiError};
use serde_json::{json, Value};

use crate::handlers::{read_json, read_text};
use crate::state::SharedState;

/// GET /api/knowledge-map: coded outline lines with depth and parent
pub async fn api_knowledge_map(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let text = read_text(&state.paths.mindmap_dir().join("knowledge_map.txt")).await?;
    Ok(Json(json!({ "nodes": parse_outline(&text) })))
}

/// GET /api/mindmap
pub async fn api_mindmap(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(read_json(&state.paths.mindmap_dir().join("cdk46_mindmap.json")).await?))
}
