//! Shared testing utilities for the CDK4/6 knowledge-base workspace.
//!
//! [`RawLayout`] lays out a miniature `raw_data/` tree in a temporary
//! directory together with a [`Config`] that points at it.

use std::path::{Path, PathBuf};

use cdk46kb_common::{SubtypeTag, Table};
use cdk46kb_config::{Config, PathsConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Write a CSV file, creating parent directories.
pub fn write_csv(path: impl AsRef<Path>, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
    let path = path.as_ref();
    let mut table = Table::new(headers.iter().copied());
    for row in rows {
        table.push_row(row.iter().copied()).expect("row width matches headers");
    }
    write_file(path, table.to_csv_string().expect("table serialises"));
    path.to_path_buf()
}

/// Write a single-sheet `.xlsx` workbook. Cells that parse as numbers are
/// stored as numbers, empty cells are left blank.
pub fn write_xlsx(path: impl AsRef<Path>, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).expect("write header cell");
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(n) => sheet.write_number(r, col, n).expect("write number cell"),
                Err(_) => sheet.write_string(r, col, *cell).expect("write text cell"),
            };
        }
    }
    workbook.save(path).expect("save workbook");
    path.to_path_buf()
}

pub fn write_json(path: impl AsRef<Path>, value: &Value) -> PathBuf {
    let path = path.as_ref();
    write_file(path, serde_json::to_string_pretty(value).expect("json serialises"));
    path.to_path_buf()
}

pub fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write fixture file");
    path.to_path_buf()
}

pub const STATS_HEADERS: [&str; 9] = [
    "Gene Symbol", "Cell type", "Disease", "Drugs", "Pathway",
    "一级标签", "二级标签", "三级标签", "四级标签",
];

pub const STATS_ROWS: [[&str; 9]; 3] = [
    ["CDK4", "MCF-7", "Breast cancer", "Palbociclib", "Cell cycle", "1", "1.1", "1.1.1", "1.1.1.1"],
    ["CDK6", "T47D", "Breast cancer", "Ribociclib", "Cell cycle", "1", "1.1", "1.1.1", "1.1.1.2"],
    ["CCND1", "-", "Mantle cell lymphoma", "Abemaciclib", "PI3K-AKT", "1", "1.2", "1.2.1", "1.2.1.1"],
];

pub const KNOWLEDGE_MAP: &str = "1 CDK4/6 inhibitors\n  1.1 Mechanism\n    1.1.1 Cell cycle arrest\n  1.2 Resistance\n";

/// A small Cytoscape.js document with two nodes and one edge.
pub fn sample_cyjs(a: &str, b: &str) -> Value {
    json!({
        "format_version": "1.0",
        "elements": {
            "nodes": [{"data": {"id": a}}, {"data": {"id": b}}],
            "edges": [{"data": {"source": a, "target": b}}]
        }
    })
}

/// Cytoscape desktop style export with one thousands-separated selector.
pub fn sample_desktop_styles() -> Value {
    json!([{
        "title": "default",
        "style": [
            {"selector": "node", "css": {"background-color": "#89D0F5"}},
            {"selector": "edge[weight > 1,000]", "css": {"width": 4}}
        ]
    }])
}

/// A temporary raw/data directory pair plus a config pointing at it.
pub struct RawLayout {
    dir: TempDir,
    config: Config,
}

impl RawLayout {
    /// Empty `raw_data/` and `data/` under a fresh temporary directory,
    /// with the stock subtype layout.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config {
            paths: PathsConfig {
                raw_dir: dir.path().join("raw_data"),
                data_dir: dir.path().join("data"),
            },
            ..Config::default()
        };
        std::fs::create_dir_all(&config.paths.raw_dir).expect("create raw dir");
        Self { dir, config }
    }

    /// Every raw input the build reads, with small but realistic contents.
    pub fn populated() -> Self {
        let layout = Self::new();
        layout.write_stats();
        layout.write_network();
        layout.write_centrality();
        layout.write_organic();
        for tag in SubtypeTag::ALL {
            layout.write_subtype_assets(tag);
        }
        layout.write_subtype_sources(
            SubtypeTag::LuminalAug,
            "Source,Target\nCDK4,CCND1\nCDK6,CCND1\n",
            "source,target\nCDK4,CCND1\nCDK4,RB1\n",
        );
        layout.write_subtype_sources(
            SubtypeTag::TnbcAug,
            "Source,Target\nCDK6,CDKN2A\n",
            "source,target\nCDKN2A,RB1\nCDK6,CDKN2A\n",
        );
        layout.write_raw("knowledge_map.txt", KNOWLEDGE_MAP);
        layout
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn raw_dir(&self) -> &Path {
        &self.config.paths.raw_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.paths.data_dir
    }

    pub fn raw_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.raw_dir().join(rel)
    }

    pub fn data_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.data_dir().join(rel)
    }

    pub fn write_raw(&self, rel: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> PathBuf {
        write_file(self.raw_path(rel), contents)
    }

    pub fn write_stats(&self) {
        let rows: Vec<&[&str]> = STATS_ROWS.iter().map(|r| r.as_slice()).collect();
        write_csv(self.raw_path("1.stats/cdk4_6_kb.csv"), &STATS_HEADERS, &rows);
    }

    pub fn write_network(&self) {
        write_csv(self.raw_path("2.network/gene_nodes_simple.csv"), &["id"], &[&["CDK4"], &["CDK6"]]);
        write_csv(
            self.raw_path("2.network/gene_cooccurrence_edges.csv"),
            &["source", "target", "weight"],
            &[&["CDK4", "CDK6", "1,873"]],
        );
        write_json(self.raw_path("2.network/network_full.cyjs"), &sample_cyjs("CDK4", "CDK6"));
        write_json(self.raw_path("2.network/styles.json"), &sample_desktop_styles());
    }

    pub fn write_centrality(&self) {
        write_csv(
            self.raw_path("3.centrality/Degree(Weight)top32.csv"),
            &["Gene", "Degree"],
            &[&["CDK4", "12"], &["CDK6", "9"], &["CCND1", "7"]],
        );
        write_xlsx(
            self.raw_path("3.centrality/Betweenness(Weight)top32.xlsx"),
            &["Gene", "Betweenness"],
            &[&["CDK6", "0.35"], &["CDK4", "0.2"]],
        );
    }

    pub fn write_organic(&self) {
        let dir = "4.Organic framework";
        write_json(self.raw_path(format!("{}/organic_framework.cyjs", dir)), &sample_cyjs("Palbociclib", "CDK4"));
        write_json(self.raw_path(format!("{}/styles.json", dir)), &json!([{"selector": "node", "style": {}}]));
        write_csv(self.raw_path(format!("{}/organic_nodes.csv", dir)), &["id", "type"], &[&["CDK4", "gene"]]);
        write_csv(
            self.raw_path(format!("{}/organic_edges.csv", dir)),
            &["source", "target"],
            &[&["Palbociclib", "CDK4"]],
        );
    }

    /// Layout and style for one subtype; original subtypes also get their
    /// node and edge tables.
    pub fn write_subtype_assets(&self, tag: SubtypeTag) {
        let folder = self.subtype_folder(tag);
        write_json(folder.join(tag.layout_file()), &sample_cyjs("CDK4", "CCND1"));
        write_json(folder.join("subtype_style.json"), &json!([{"selector": "node", "style": {"label": "data(id)"}}]));
        if !tag.is_augmented() {
            write_csv(folder.join(tag.nodes_file()), &["id"], &[&["CDK4"], &["CCND1"]]);
            write_csv(folder.join(tag.edges_file()), &["source", "target"], &[&["CDK4", "CCND1"]]);
        }
    }

    /// Raw folder of a subtype under this layout's config.
    pub fn subtype_folder(&self, tag: SubtypeTag) -> PathBuf {
        let layout = self.config.subtype_layout(tag).expect("stock layout has every tag");
        self.raw_path(&layout.folder)
    }

    /// Write the original and augmented edge tables a merge plan reads.
    pub fn write_subtype_sources(&self, tag: SubtypeTag, original: &str, augmented: &str) {
        let plans = self.config.subtype_plans().expect("valid config");
        let plan = plans.iter().find(|p| p.tag == tag).expect("augmented tag");
        write_file(&plan.original_edges, original);
        write_file(&plan.augmented_edges, augmented);
    }
}

impl Default for RawLayout {
    fn default() -> Self {
        Self::new()
    }
}
