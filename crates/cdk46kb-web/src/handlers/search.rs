//! Knowledge-base search with an on-the-fly subnetwork.

use axum::{
    extract::{Query, State},
    Json,
};
use cdk46kb_common::search::{build_subnetwork, filter_by_node, filter_rows};
use cdk46kb_common::ApiError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::handlers::stats::STATS_FILE;
use crate::handlers::{read_table, records};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub column: Option<String>,
    pub term: Option<String>,
    /// Narrow the matching rows to those mentioning this subnetwork node.
    pub node: Option<String>,
}

/// GET /api/search?column=&term=&node=
///
/// `elements` is the subnetwork of every row matching `term`; `records` are
/// those rows, narrowed to the ones mentioning `node` when it is given.
pub async fn api_search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let column = params
        .column
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing query parameter 'column'".to_string()))?;
    let term = params.term.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::BadRequest("term must not be empty".to_string()));
    }

    let table = read_table(&state.paths.stats_dir().join(STATS_FILE)).await?;
    let hits = filter_rows(&table, column, term).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if hits.is_empty() {
        return Err(ApiError::NotFound(format!("no rows where '{}' contains '{}'", column, term)));
    }
    let subnet = build_subnetwork(&hits);

    let node = params.node.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let rows = match node {
        Some(node) => {
            let narrowed = filter_by_node(&hits, node);
            if narrowed.is_empty() {
                return Err(ApiError::NotFound(format!("no matching rows mention '{}'", node)));
            }
            narrowed
        }
        None => hits,
    };
    debug!(column, term, rows = rows.len(), nodes = subnet.nodes.len(), "search");

    Ok(Json(json!({
        "column": column,
        "term": term,
        "node": node,
        "records": records(&rows),
        "elements": subnet.to_elements(),
    })))
}
