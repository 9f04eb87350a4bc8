//! cdk46kb-build: Offline assembly of the knowledge-base data directory.
//!
//! Stages raw inputs into `data/`:
//!   - statistics table, global network, centrality rankings, organic framework
//!   - subtype network assets, and merged augmented subtype networks
//!   - Cytoscape.js styles, the knowledge-map mind map, the statistics archive
//!
//! Everything runs sequentially in one pass. A missing or malformed input
//! skips the item it feeds; only an unwritable output stops the build.

pub mod error;
pub mod report;
pub mod output;
pub mod merge;
pub mod subtype;
pub mod assets;
pub mod styles;
pub mod mindmap;
pub mod archive;
pub mod pipeline;

pub use error::BuildError;
pub use pipeline::{run_all, BuildSummary};
pub use subtype::{SubtypeNetworkBuilder, SubtypeOutcome, SubtypeStatus};
