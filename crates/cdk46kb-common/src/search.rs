//! Knowledge-base search and on-the-fly subnetworks.
//!
//! Rows of the statistics table link a gene, a cell type, a disease, a drug
//! and a pathway. Filtering the table and pairing the entities of each
//! matching row yields a small co-occurrence network in Cytoscape.js form.

use std::collections::{BTreeSet, HashMap};

use serde_json::{json, Value};

use crate::error::TableError;
use crate::table::Table;

/// Entity columns of the statistics table, in scan order.
pub const ENTITY_COLUMNS: [&str; 5] = ["Gene Symbol", "Cell type", "Disease", "Drugs", "Pathway"];

/// Placeholder the curators use for "no value".
const EMPTY_MARKER: &str = "-";

/// Rows whose `column` contains `term`, case-insensitively.
pub fn filter_rows(table: &Table, column: &str, term: &str) -> Result<Table, TableError> {
    if !ENTITY_COLUMNS.contains(&column) {
        return Err(TableError::Schema(format!(
            "'{}' is not a searchable column (expected one of: {})",
            column,
            ENTITY_COLUMNS.join(", ")
        )));
    }
    let idx = table
        .column_index(column)
        .ok_or_else(|| TableError::Schema(format!("table has no '{}' column", column)))?;
    let needle = term.trim().to_lowercase();
    Ok(table.filter(|row| row[idx].to_lowercase().contains(&needle)))
}

/// Rows where any entity column contains `node`, case-insensitively.
pub fn filter_by_node(table: &Table, node: &str) -> Table {
    let needle = node.trim().to_lowercase();
    let cols = entity_indices(table);
    table.filter(|row| {
        cols.iter()
            .any(|(_, i)| row[*i].to_lowercase().contains(&needle))
    })
}

/// A node of the on-the-fly subnetwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetNode {
    pub id: String,
    /// Entity column the value was last seen in.
    pub kind: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subnetwork {
    pub nodes: Vec<SubnetNode>,
    /// Undirected pairs, stored sorted (`a <= b`).
    pub edges: BTreeSet<(String, String)>,
}

impl Subnetwork {
    /// Cytoscape.js `elements` array: nodes first, then edges.
    pub fn to_elements(&self) -> Vec<Value> {
        let nodes = self.nodes.iter().map(|n| {
            json!({ "data": { "id": n.id, "label": n.id, "type": n.kind } })
        });
        let edges = self
            .edges
            .iter()
            .map(|(s, t)| json!({ "data": { "source": s, "target": t } }));
        nodes.chain(edges).collect()
    }
}

fn entity_indices(table: &Table) -> Vec<(&'static str, usize)> {
    ENTITY_COLUMNS
        .iter()
        .filter_map(|c| table.column_index(c).map(|i| (*c, i)))
        .collect()
}

fn keep_value(raw: &str) -> Option<&str> {
    let v = raw.trim();
    (!v.is_empty() && v != EMPTY_MARKER).then_some(v)
}

/// Pair up the entities of every row.
pub fn build_subnetwork(rows: &Table) -> Subnetwork {
    let cols = entity_indices(rows);

    let mut order: Vec<String> = Vec::new();
    let mut kinds: HashMap<String, &'static str> = HashMap::new();
    for (kind, idx) in &cols {
        for row in rows.rows() {
            if let Some(v) = keep_value(&row[*idx]) {
                if kinds.insert(v.to_string(), *kind).is_none() {
                    order.push(v.to_string());
                }
            }
        }
    }

    let mut edges = BTreeSet::new();
    for row in rows.rows() {
        let vals: Vec<&str> = cols.iter().filter_map(|(_, i)| keep_value(&row[*i])).collect();
        for i in 0..vals.len() {
            for j in (i + 1)..vals.len() {
                let (a, b) = if vals[i] <= vals[j] { (vals[i], vals[j]) } else { (vals[j], vals[i]) };
                if a != b {
                    edges.insert((a.to_string(), b.to_string()));
                }
            }
        }
    }

    let nodes = order
        .into_iter()
        .map(|id| {
            let kind = kinds[&id];
            SubnetNode { id, kind }
        })
        .collect();

    Subnetwork { nodes, edges }
}
