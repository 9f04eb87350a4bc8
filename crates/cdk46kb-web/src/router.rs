//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    centrality::{api_centrality_metric, api_centrality_metrics},
    mindmap::{api_knowledge_map, api_mindmap},
    network::api_network_full,
    organic::{api_organic_edges, api_organic_elements, api_organic_nodes, api_organic_style},
    root::root,
    search::api_search,
    stats::api_stats,
    subtype::{
        api_subtype_edges, api_subtype_elements, api_subtype_layout, api_subtype_nodes,
        api_subtype_style, api_subtypes,
    },
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",                               get(root))
        .route("/api/stats",                      get(api_stats))
        .route("/api/network/full",               get(api_network_full))
        .route("/api/centrality",                 get(api_centrality_metrics))
        .route("/api/centrality/{metric}",        get(api_centrality_metric))
        .route("/api/organic/elements",           get(api_organic_elements))
        .route("/api/organic/style",              get(api_organic_style))
        .route("/api/organic/nodes",              get(api_organic_nodes))
        .route("/api/organic/edges",              get(api_organic_edges))
        .route("/api/subtype",                    get(api_subtypes))
        .route("/api/subtype/{tag}",              get(api_subtype_layout))
        .route("/api/subtype/{tag}/elements",     get(api_subtype_elements))
        .route("/api/subtype/{tag}/style",        get(api_subtype_style))
        .route("/api/subtype/{tag}/nodes",        get(api_subtype_nodes))
        .route("/api/subtype/{tag}/edges",        get(api_subtype_edges))
        .route("/api/search",                     get(api_search))
        .route("/api/knowledge-map",              get(api_knowledge_map))
        .route("/api/mindmap",                    get(api_mindmap))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
