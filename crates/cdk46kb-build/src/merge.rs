//! Union of an original and an augmented edge table.
//!
//! Rows are concatenated (original first), aligned by lowercase column name,
//! and de-duplicated keeping the first occurrence. The node table is the set
//! of endpoint values in first-appearance order.

use std::collections::HashSet;

use cdk46kb_common::{Table, TableError};
use cdk46kb_config::EdgeIdentity;

/// Column of the derived node table.
pub const NODE_ID_COLUMN: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedNetwork {
    pub edges: Table,
    pub nodes: Table,
    pub original_rows: usize,
    pub augmented_rows: usize,
    /// Rows dropped as repeats of an earlier row.
    pub duplicates: usize,
}

/// Lowercase the header and check the edge-table contract: at least two
/// columns, no column name repeated after lowercasing.
pub fn prepare_edge_table(mut table: Table) -> Result<Table, TableError> {
    table.lowercase_headers();
    if table.headers().len() < 2 {
        return Err(TableError::Schema(format!(
            "edge table needs at least two columns, found {}",
            table.headers().len()
        )));
    }
    let dups = table.duplicate_headers();
    if !dups.is_empty() {
        return Err(TableError::Schema(format!(
            "duplicate column names after lowercasing: {}",
            dups.join(", ")
        )));
    }
    Ok(table)
}

/// Indices of the two endpoint columns: `source`/`target` when both exist,
/// otherwise the first two columns.
pub fn endpoint_columns(table: &Table) -> (usize, usize) {
    match (table.column_index("source"), table.column_index("target")) {
        (Some(s), Some(t)) => (s, t),
        _ => (0, 1),
    }
}

fn identity_key(row: &[String], endpoints: (usize, usize), identity: EdgeIdentity) -> Vec<String> {
    let mut key = row.to_vec();
    if identity == EdgeIdentity::Undirected {
        let (s, t) = endpoints;
        if key[s] > key[t] {
            key.swap(s, t);
        }
    }
    key
}

pub fn merge_edge_tables(
    original: Table,
    augmented: Table,
    identity: EdgeIdentity,
) -> Result<MergedNetwork, TableError> {
    let original = prepare_edge_table(original)?;
    let augmented = prepare_edge_table(augmented)?;

    let mut headers: Vec<String> = original.headers().to_vec();
    for h in augmented.headers() {
        if !headers.contains(h) {
            headers.push(h.clone());
        }
    }

    // merged column -> column of each source, if it has one
    let orig_map: Vec<Option<usize>> = headers.iter().map(|h| original.column_index(h)).collect();
    let aug_map: Vec<Option<usize>> = headers.iter().map(|h| augmented.column_index(h)).collect();

    let mut edges = Table::new(headers);
    let endpoints = endpoint_columns(&edges);
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut duplicates = 0;

    let sources = [(&original, &orig_map), (&augmented, &aug_map)];
    for (table, map) in sources {
        for row in table.rows() {
            let aligned: Vec<String> = map
                .iter()
                .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                .collect();
            if seen.insert(identity_key(&aligned, endpoints, identity)) {
                edges.push_row(aligned)?;
            } else {
                duplicates += 1;
            }
        }
    }

    let nodes = derive_nodes(&edges);
    tracing::debug!(
        original = original.len(),
        augmented = augmented.len(),
        duplicates,
        edges = edges.len(),
        nodes = nodes.len(),
        "merged edge tables"
    );

    Ok(MergedNetwork {
        edges,
        nodes,
        original_rows: original.len(),
        augmented_rows: augmented.len(),
        duplicates,
    })
}

/// Distinct endpoint values, scanning rows in order and, within a row,
/// source before target. Empty cells are not identifiers.
pub fn derive_nodes(edges: &Table) -> Table {
    if edges.headers().len() < 2 {
        return Table::new([NODE_ID_COLUMN]);
    }
    let (s, t) = endpoint_columns(edges);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids: Vec<&str> = Vec::new();
    for row in edges.rows() {
        for value in [row[s].as_str(), row[t].as_str()] {
            if !value.is_empty() && seen.insert(value) {
                ids.push(value);
            }
        }
    }
    Table::from_column(NODE_ID_COLUMN, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    fn ids(nodes: &Table) -> Vec<&str> {
        nodes.rows().iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn test_union_keeps_first_occurrence() {
        let merged = merge_edge_tables(
            table("source,target\nA,B\n"),
            table("Source,Target\nA,B\nC,D\n"),
            EdgeIdentity::Exact,
        )
        .unwrap();

        assert_eq!(merged.edges.to_csv_string().unwrap(), "source,target\nA,B\nC,D\n");
        assert_eq!(ids(&merged.nodes), vec!["A", "B", "C", "D"]);
        assert_eq!(merged.duplicates, 1);
    }

    #[test]
    fn test_row_count_accounts_for_duplicates() {
        let merged = merge_edge_tables(
            table("source,target,weight\nA,B,1\nA,B,1\nB,C,2\n"),
            table("source,target,weight\nB,C,2\nC,D,3\nA,B,9\n"),
            EdgeIdentity::Exact,
        )
        .unwrap();
        assert_eq!(
            merged.edges.len(),
            merged.original_rows + merged.augmented_rows - merged.duplicates
        );
        assert_eq!(merged.edges.len(), 4);
    }

    #[test]
    fn test_exact_identity_keeps_reversed_pair() {
        let merged = merge_edge_tables(
            table("source,target\nA,B\n"),
            table("source,target\nB,A\n"),
            EdgeIdentity::Exact,
        )
        .unwrap();
        assert_eq!(merged.edges.len(), 2);
    }

    #[test]
    fn test_undirected_identity_drops_reversed_pair() {
        let merged = merge_edge_tables(
            table("source,target\nA,B\n"),
            table("source,target\nB,A\nB,C\n"),
            EdgeIdentity::Undirected,
        )
        .unwrap();
        assert_eq!(merged.edges.to_csv_string().unwrap(), "source,target\nA,B\nB,C\n");
    }

    #[test]
    fn test_header_only_augmented_is_identity() {
        let original = table("source,target,weight\nA,B,0.5\nC,D,0.7\n");
        let merged = merge_edge_tables(original.clone(), table("source,target,weight\n"), EdgeIdentity::Exact)
            .unwrap();
        assert_eq!(merged.edges, original);
    }

    #[test]
    fn test_columns_aligned_by_name() {
        let merged = merge_edge_tables(
            table("source,target,weight\nA,B,1\n"),
            table("TARGET,Source,evidence\nD,C,inferred\n"),
            EdgeIdentity::Exact,
        )
        .unwrap();
        assert_eq!(
            merged.edges.to_csv_string().unwrap(),
            "source,target,weight,evidence\nA,B,1,\nC,D,,inferred\n"
        );
    }

    #[test]
    fn test_positional_endpoints_without_source_target() {
        let edges = table("from,to,w\nX,Y,1\nY,Z,2\n");
        assert_eq!(ids(&derive_nodes(&edges)), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_empty_endpoints_are_not_nodes() {
        let edges = table("source,target\nA,\n,B\nA,B\n");
        assert_eq!(ids(&derive_nodes(&edges)), vec!["A", "B"]);
    }

    #[test]
    fn test_node_set_equals_endpoint_set() {
        let merged = merge_edge_tables(
            table("source,target\nA,B\nB,C\n"),
            table("source,target\nC,A\nD,E\n"),
            EdgeIdentity::Exact,
        )
        .unwrap();
        let mut endpoints: Vec<&str> = merged
            .edges
            .rows()
            .iter()
            .flat_map(|r| [r[0].as_str(), r[1].as_str()])
            .collect();
        endpoints.sort();
        endpoints.dedup();
        let mut nodes = ids(&merged.nodes);
        nodes.sort();
        assert_eq!(nodes, endpoints);
    }

    #[test]
    fn test_schema_violations() {
        let err = merge_edge_tables(table("source\nA\n"), table("source,target\n"), EdgeIdentity::Exact)
            .unwrap_err();
        assert!(err.to_string().contains("at least two columns"));

        let err = merge_edge_tables(
            table("source,target\n"),
            table("Source,SOURCE,target\nA,B,C\n"),
            EdgeIdentity::Exact,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }
}
