//! Statistics table.

use axum::{
    extract::{Query, State},
    Json,
};
use cdk46kb_common::{hierarchy::HierarchyCode, ApiError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::{read_table, records};
use crate::state::SharedState;

pub const STATS_FILE: &str = "cdk4_6_kb.csv";

#[derive(Debug, Deserialize)]
pub struct StatsFilter {
    /// Knowledge-map code, e.g. `1.2.1`
    pub node: Option<String>,
}

/// GET /api/stats: every row, or the rows tagged with one hierarchy code
pub async fn api_stats(
    State(state): State<SharedState>,
    Query(filter): Query<StatsFilter>,
) -> Result<Json<Value>, ApiError> {
    let table = read_table(&state.paths.stats_dir().join(STATS_FILE)).await?;

    let table = match filter.node.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        None => table,
        Some(node) => {
            let code = HierarchyCode::parse(node)
                .ok_or_else(|| ApiError::BadRequest(format!("'{}' is not a hierarchy code", node)))?;
            let column = code.label_column().ok_or_else(|| {
                ApiError::BadRequest(format!("hierarchy code '{}' is deeper than the label columns", code))
            })?;
            let idx = table
                .column_index(column)
                .ok_or_else(|| ApiError::Internal(format!("statistics table has no '{}' column", column)))?;
            table.filter(|row| row[idx].trim() == code.as_str())
        }
    };

    Ok(Json(json!({ "records": records(&table) })))
}
