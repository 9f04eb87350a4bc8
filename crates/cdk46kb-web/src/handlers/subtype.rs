//! Breast-cancer subtype networks.

use axum::{
    extract::{Path, State},
    Json,
};
use cdk46kb_common::{ApiError, SubtypeTag};
use serde_json::{json, Value};

use crate::handlers::{file_stems, read_json, read_table, records};
use crate::state::SharedState;

fn parse_tag(tag: &str) -> Result<SubtypeTag, ApiError> {
    tag.parse()
        .map_err(|_| ApiError::NotFound(format!("no subtype network '{}'", tag)))
}

/// GET /api/subtype: tags with a built layout
pub async fn api_subtypes(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let tags = file_stems(&state.paths.subtype_dir(), "cyjs").await?;
    Ok(Json(json!({ "subtypes": tags })))
}

/// GET /api/subtype/{tag}
pub async fn api_subtype_layout(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tag = parse_tag(&tag)?;
    Ok(Json(read_json(&state.paths.subtype_dir().join(tag.layout_file())).await?))
}

/// GET /api/subtype/{tag}/elements: `[]` when the layout carries none
pub async fn api_subtype_elements(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tag = parse_tag(&tag)?;
    let mut doc = read_json(&state.paths.subtype_dir().join(tag.layout_file())).await?;
    let elements = doc
        .get_mut("elements")
        .map(Value::take)
        .unwrap_or_else(|| json!([]));
    Ok(Json(json!({ "elements": elements })))
}

/// GET /api/subtype/{tag}/style
pub async fn api_subtype_style(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tag = parse_tag(&tag)?;
    Ok(Json(read_json(&state.paths.subtype_dir().join(tag.style_file())).await?))
}

/// GET /api/subtype/{tag}/nodes
pub async fn api_subtype_nodes(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tag = parse_tag(&tag)?;
    let table = read_table(&state.paths.subtype_dir().join(tag.nodes_file())).await?;
    Ok(Json(json!({ "nodes": records(&table) })))
}

/// GET /api/subtype/{tag}/edges
pub async fn api_subtype_edges(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tag = parse_tag(&tag)?;
    let table = read_table(&state.paths.subtype_dir().join(tag.edges_file())).await?;
    Ok(Json(json!({ "edges": records(&table) })))
}
