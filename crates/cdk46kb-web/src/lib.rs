//! cdk46kb-web: REST facade over the built knowledge-base data directory.
//!
//! Read-only: every request re-reads the file it serves, so a rebuild of
//! `data/` is picked up without a restart.

pub mod state;
pub mod router;
pub mod handlers;
