//! Subtype network builder.
//!
//! For each augmented subtype, unions the authored edge table with the
//! inferred one and writes `<tag>_edges.csv` plus a derived `<tag>_nodes.csv`.

use std::fmt;
use std::path::Path;

use cdk46kb_common::{SubtypeTag, Table};
use cdk46kb_config::{EdgeIdentity, SubtypePlan};
use tracing::{info, instrument, warn};

use crate::error::{BuildError, Result};
use crate::merge::{merge_edge_tables, prepare_edge_table};
use crate::output::write_tables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub original_rows: usize,
    pub augmented_rows: usize,
    pub duplicates: usize,
    pub edges: usize,
    pub nodes: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merged {} nodes, {} edges", self.nodes, self.edges)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtypeStatus {
    Merged(MergeStats),
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtypeOutcome {
    pub tag: SubtypeTag,
    pub status: SubtypeStatus,
}

impl SubtypeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self.status, SubtypeStatus::Merged(_))
    }
}

impl fmt::Display for SubtypeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SubtypeStatus::Merged(stats) => write!(f, "{}: {}", self.tag, stats),
            SubtypeStatus::Skipped { reason } => write!(f, "{}: skipped: {}", self.tag, reason),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubtypeNetworkBuilder {
    identity: EdgeIdentity,
}

impl SubtypeNetworkBuilder {
    pub fn new(identity: EdgeIdentity) -> Self {
        Self { identity }
    }

    /// Merge one subtype and replace its output files.
    #[instrument(skip(self, plan), fields(tag = %plan.tag))]
    pub fn build(&self, plan: &SubtypePlan) -> Result<MergeStats> {
        let original = read_edge_table(&plan.original_edges)?;
        let augmented = read_edge_table(&plan.augmented_edges)?;

        let merged = merge_edge_tables(original, augmented, self.identity)
            .map_err(|e| BuildError::parse(&plan.augmented_edges, e))?;

        write_tables(&[
            (plan.edges_out.as_path(), &merged.edges),
            (plan.nodes_out.as_path(), &merged.nodes),
        ])?;

        let stats = MergeStats {
            original_rows: merged.original_rows,
            augmented_rows: merged.augmented_rows,
            duplicates: merged.duplicates,
            edges: merged.edges.len(),
            nodes: merged.nodes.len(),
        };
        info!(
            edges_out = %plan.edges_out.display(),
            duplicates = stats.duplicates,
            "{}", stats
        );
        Ok(stats)
    }

    /// Build every plan in order. Missing or malformed sources skip their
    /// subtype; a write failure stops the run.
    pub fn build_all(&self, plans: &[SubtypePlan]) -> Result<Vec<SubtypeOutcome>> {
        let mut outcomes = Vec::with_capacity(plans.len());
        for plan in plans {
            let status = match self.build(plan) {
                Ok(stats) => SubtypeStatus::Merged(stats),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        tag = %plan.tag,
                        path = %e.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        "subtype skipped: {}", e
                    );
                    SubtypeStatus::Skipped { reason: e.to_string() }
                }
            };
            outcomes.push(SubtypeOutcome { tag: plan.tag, status });
        }
        Ok(outcomes)
    }
}

fn read_edge_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(BuildError::MissingSource { path: path.to_path_buf() });
    }
    let table = Table::read_csv(path).map_err(|e| {
        if e.is_not_found() {
            BuildError::MissingSource { path: path.to_path_buf() }
        } else {
            BuildError::parse(path, e)
        }
    })?;
    prepare_edge_table(table).map_err(|e| BuildError::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn plan(dir: &Path, tag: SubtypeTag) -> SubtypePlan {
        SubtypePlan {
            tag,
            original_edges: dir.join(format!("{}_orig.csv", tag)),
            augmented_edges: dir.join(format!("{}_aug.csv", tag)),
            edges_out: dir.join("out").join(tag.edges_file()),
            nodes_out: dir.join("out").join(tag.nodes_file()),
        }
    }

    #[test]
    fn test_build_writes_edges_and_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let p = plan(dir.path(), SubtypeTag::LuminalAug);
        std::fs::write(&p.original_edges, "Source,Target\nA,B\n").unwrap();
        std::fs::write(&p.augmented_edges, "source,target\nA,B\nC,D\n").unwrap();

        let stats = SubtypeNetworkBuilder::default().build(&p).unwrap();
        assert_eq!(stats.to_string(), "merged 4 nodes, 2 edges");
        assert_eq!(std::fs::read_to_string(&p.edges_out).unwrap(), "source,target\nA,B\nC,D\n");
        assert_eq!(std::fs::read_to_string(&p.nodes_out).unwrap(), "id\nA\nB\nC\nD\n");
    }

    #[test]
    fn test_missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let p = plan(dir.path(), SubtypeTag::TnbcAug);
        std::fs::write(&p.augmented_edges, "source,target\nA,B\n").unwrap();

        let err = SubtypeNetworkBuilder::default().build(&p).unwrap_err();
        assert!(matches!(&err, BuildError::MissingSource { path } if path == &p.original_edges));
        assert!(!p.edges_out.exists());
    }

    #[test]
    fn test_single_column_source_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let p = plan(dir.path(), SubtypeTag::TnbcAug);
        std::fs::write(&p.original_edges, "source\nA\n").unwrap();
        std::fs::write(&p.augmented_edges, "source,target\nA,B\n").unwrap();

        let err = SubtypeNetworkBuilder::default().build(&p).unwrap_err();
        assert!(matches!(err, BuildError::ParseFailure { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_build_all_continues_past_skipped_subtype() {
        let dir = tempfile::tempdir().unwrap();
        let luminal = plan(dir.path(), SubtypeTag::LuminalAug);
        let tnbc = plan(dir.path(), SubtypeTag::TnbcAug);
        std::fs::write(&tnbc.original_edges, "source,target\nX,Y\n").unwrap();
        std::fs::write(&tnbc.augmented_edges, "source,target\nY,Z\n").unwrap();

        let outcomes = SubtypeNetworkBuilder::default()
            .build_all(&[luminal.clone(), tnbc.clone()])
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_merged());
        assert!(outcomes[0].to_string().starts_with("luminal_aug: skipped: missing source file"));
        assert_eq!(outcomes[1].to_string(), "tnbc_aug: merged 3 nodes, 2 edges");
        assert!(tnbc.nodes_out.exists());
        assert!(!luminal.edges_out.exists());
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = plan(dir.path(), SubtypeTag::LuminalAug);
        std::fs::write(&p.original_edges, "source,target\nA,B\n").unwrap();
        std::fs::write(&p.augmented_edges, "source,target\nC,D\n").unwrap();
        // a regular file where the output directory should be
        let blocker: PathBuf = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        p.edges_out = blocker.join("luminal_aug_edges.csv");
        p.nodes_out = blocker.join("luminal_aug_nodes.csv");

        let err = SubtypeNetworkBuilder::default().build_all(&[p]).unwrap_err();
        assert!(err.is_fatal());
    }
}
