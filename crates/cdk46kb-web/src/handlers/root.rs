//! Service banner and endpoint catalogue.

use axum::Json;
use cdk46kb_common::SubtypeTag;
use serde_json::{json, Map, Value};

const ENDPOINTS: [(&str, &str); 16] = [
    ("/api/stats", "knowledge-base statistics table (?node=<code> filters by hierarchy code)"),
    ("/api/network/full", "global co-occurrence network, Cytoscape.js JSON"),
    ("/api/centrality", "available centrality metrics"),
    ("/api/centrality/{metric}?top=N", "first N rows of one centrality ranking"),
    ("/api/organic/elements", "organic framework elements"),
    ("/api/organic/style", "organic framework stylesheet"),
    ("/api/organic/nodes", "organic framework node table"),
    ("/api/organic/edges", "organic framework edge table"),
    ("/api/subtype", "available subtype networks"),
    ("/api/subtype/{tag}", "subtype network, Cytoscape.js JSON"),
    ("/api/subtype/{tag}/elements", "subtype network elements"),
    ("/api/subtype/{tag}/style", "subtype network stylesheet"),
    ("/api/subtype/{tag}/nodes", "subtype node table (also /edges)"),
    ("/api/search?column=&term=&node=", "search the statistics table and build a subnetwork"),
    ("/api/knowledge-map", "knowledge-map hierarchy"),
    ("/api/mindmap", "knowledge map as a jsMind document"),
];

/// GET /: banner plus the endpoint catalogue
pub async fn root() -> Json<Value> {
    let endpoints: Map<String, Value> = ENDPOINTS
        .iter()
        .map(|(path, what)| (path.to_string(), Value::from(*what)))
        .collect();
    let subtypes: Map<String, Value> = SubtypeTag::ALL
        .iter()
        .map(|tag| (tag.to_string(), Value::from(tag.title())))
        .collect();

    Json(json!({
        "message": "CDK4/6 Knowledge-Base REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
        "subtypes": subtypes,
    }))
}
