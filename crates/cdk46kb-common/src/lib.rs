//! cdk46kb-common: Shared types, errors, and table handling used across all CDK4/6 KB crates.

pub mod error;
pub mod table;
pub mod subtype;
pub mod hierarchy;
pub mod search;

// Re-export commonly used types
pub use error::{ApiError, TableError};
pub use subtype::SubtypeTag;
pub use table::Table;
