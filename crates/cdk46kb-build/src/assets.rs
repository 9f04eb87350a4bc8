//! Staging of raw assets into the data directory.
//!
//! Each stage copies (or re-serialises) the files of one raw folder and
//! returns one [`StepReport`] per item. Missing inputs only skip their item.

use std::path::{Path, PathBuf};

use cdk46kb_common::Table;
use cdk46kb_config::{Config, PathsConfig};

use crate::error::Result;
use crate::output::{write_bytes, write_table, write_tables};
use crate::report::StepReport;

pub const STATS_FOLDER: &str = "1.stats";
pub const NETWORK_FOLDER: &str = "2.network";
pub const CENTRALITY_FOLDER: &str = "3.centrality";
pub const ORGANIC_FOLDER: &str = "4.Organic framework";

pub const STATS_TABLE: &str = "cdk4_6_kb.csv";
const STATS_OPTIONAL: [&str; 2] = ["cdk4_6_kb.xlsx", "CDK46知识库统计表 英文版.xlsx"];
const NETWORK_FILES: [&str; 4] = [
    "gene_nodes_simple.csv",
    "gene_cooccurrence_edges.csv",
    "network_full.cyjs",
    "styles.json",
];

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Copy `src` to `dest`. An absent optional source produces no report.
fn copy_asset(stage: &'static str, src: &Path, dest: &Path, required: bool) -> Result<Option<StepReport>> {
    let item = file_label(dest);
    if !src.is_file() {
        return Ok(required.then(|| StepReport::skipped(stage, item, format!("missing {}", src.display()))));
    }
    let bytes = match std::fs::read(src) {
        Ok(b) => b,
        Err(e) => {
            return Ok(Some(StepReport::skipped(stage, item, format!("cannot read {}: {}", src.display(), e))));
        }
    };
    write_bytes(dest, &bytes)?;
    Ok(Some(StepReport::done(stage, item, format!("copied from {}", src.display()))))
}

fn missing_folder(stage: &'static str, folder: &Path) -> StepReport {
    StepReport::skipped(stage, file_label(folder), format!("missing folder {}", folder.display()))
}

/// Copy a nodes/edges CSV pair when both halves exist, otherwise convert
/// the matching `.xlsx` pair.
fn copy_pair(
    stage: &'static str,
    folder: &Path,
    names: (&str, &str),
    out_dir: &Path,
    out_names: (&str, &str),
) -> Result<Vec<StepReport>> {
    let (nodes, edges) = (folder.join(names.0), folder.join(names.1));
    if nodes.is_file() && edges.is_file() {
        let mut reports = Vec::new();
        reports.extend(copy_asset(stage, &nodes, &out_dir.join(out_names.0), true)?);
        reports.extend(copy_asset(stage, &edges, &out_dir.join(out_names.1), true)?);
        return Ok(reports);
    }

    let item = format!("{} & {}", out_names.0, out_names.1);
    let (nodes, edges) = (nodes.with_extension("xlsx"), edges.with_extension("xlsx"));
    if !(nodes.is_file() && edges.is_file()) {
        let reason = format!("missing {} or {} (or their .xlsx) in {}", names.0, names.1, folder.display());
        return Ok(vec![StepReport::skipped(stage, item, reason)]);
    }

    let tables = Table::read_xlsx(&nodes).and_then(|n| Ok((n, Table::read_xlsx(&edges)?)));
    match tables {
        Ok((node_table, edge_table)) => {
            let (nodes_out, edges_out) = (out_dir.join(out_names.0), out_dir.join(out_names.1));
            write_tables(&[(nodes_out.as_path(), &node_table), (edges_out.as_path(), &edge_table)])?;
            let detail = format!("converted {} & {}", file_label(&nodes), file_label(&edges));
            Ok(vec![StepReport::done(stage, item, detail)])
        }
        Err(e) => Ok(vec![StepReport::skipped(stage, item, format!("cannot convert spreadsheets: {}", e))]),
    }
}

// ── Stages ──────────────────────────────────────────────────────────────────

pub fn stage_stats(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let src = paths.raw_dir.join(STATS_FOLDER);
    let out = paths.stats_dir();
    let mut reports = Vec::new();
    reports.extend(copy_asset("stats", &src.join(STATS_TABLE), &out.join(STATS_TABLE), true)?);
    for name in STATS_OPTIONAL {
        reports.extend(copy_asset("stats", &src.join(name), &out.join(name), false)?);
    }
    Ok(reports)
}

pub fn stage_network(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let src = paths.raw_dir.join(NETWORK_FOLDER);
    let out = paths.network_dir();
    let mut reports = Vec::new();
    for name in NETWORK_FILES {
        reports.extend(copy_asset("network", &src.join(name), &out.join(name), true)?);
    }
    Ok(reports)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingFormat {
    Csv,
    Spreadsheet,
}

/// Metric name of a centrality ranking file, e.g.
/// `Betweenness(Weight)top32.csv` → `betweenness`.
pub fn centrality_metric(file_name: &str) -> Option<(String, RankingFormat)> {
    let path = Path::new(file_name);
    let format = match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "csv" => RankingFormat::Csv,
        "xlsx" => RankingFormat::Spreadsheet,
        _ => return None,
    };
    let stem = path.file_stem()?.to_str()?;
    // ASCII lowercasing keeps byte offsets, so indices found in `lower`
    // are valid in `stem`.
    let lower = stem.to_ascii_lowercase();
    let base = &stem[..lower.strip_suffix("top32")?.len()];
    let name = match lower[..base.len()].find("(weight)") {
        Some(at) => format!("{}{}", &base[..at], &base[at + "(weight)".len()..]),
        None => base.to_string(),
    };
    let metric = name.trim().to_lowercase();
    (!metric.is_empty()).then_some((metric, format))
}

pub fn stage_centrality(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let folder = paths.raw_dir.join(CENTRALITY_FOLDER);
    if !folder.is_dir() {
        return Ok(vec![missing_folder("centrality", &folder)]);
    }
    let out = paths.centrality_dir();
    let mut reports = Vec::new();
    for src in sorted_entries(&folder) {
        let name = file_label(&src);
        let Some((metric, format)) = centrality_metric(&name) else { continue };
        let dest = out.join(format!("{}.csv", metric));
        let item = file_label(&dest);
        let table = match format {
            RankingFormat::Csv => Table::read_csv(&src),
            RankingFormat::Spreadsheet => Table::read_xlsx(&src),
        };
        match table {
            Ok(table) => {
                write_table(&dest, &table)?;
                reports.push(StepReport::done("centrality", item, format!("converted {} ({} rows)", name, table.len())));
            }
            Err(e) => reports.push(StepReport::skipped("centrality", item, format!("cannot parse {}: {}", name, e))),
        }
    }
    if reports.is_empty() {
        reports.push(StepReport::skipped("centrality", file_label(&folder), "no *top32 ranking files"));
    }
    Ok(reports)
}

pub fn stage_organic(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let folder = paths.raw_dir.join(ORGANIC_FOLDER);
    if !folder.is_dir() {
        return Ok(vec![missing_folder("organic", &folder)]);
    }
    let out = paths.organic_dir();
    let mut reports = Vec::new();
    reports.extend(copy_asset("organic", &folder.join("organic_framework.cyjs"), &out.join("organic_full.cyjs"), true)?);
    reports.extend(copy_asset("organic", &folder.join("styles.json"), &out.join("organic_style.json"), true)?);
    reports.extend(copy_pair(
        "organic",
        &folder,
        ("organic_nodes.csv", "organic_edges.csv"),
        &out,
        ("organic_nodes.csv", "organic_edges.csv"),
    )?);
    Ok(reports)
}

/// Layout, style and (for original subtypes) node/edge tables of every subtype.
pub fn stage_subtype_assets(config: &Config) -> Result<Vec<StepReport>> {
    let out = config.paths.subtype_dir();
    let mut reports = Vec::new();
    for (tag, folder) in config.subtype_folders()? {
        if !folder.is_dir() {
            reports.push(missing_folder("subtype", &folder));
            continue;
        }
        reports.extend(copy_asset("subtype", &folder.join(tag.layout_file()), &out.join(tag.layout_file()), true)?);

        match first_style_file(&folder) {
            Some(style) => reports.extend(copy_asset("subtype", &style, &out.join(tag.style_file()), true)?),
            None => reports.push(StepReport::skipped(
                "subtype",
                tag.style_file(),
                format!("no *.json style in {}", folder.display()),
            )),
        }

        if !tag.is_augmented() {
            let (nodes, edges) = (tag.nodes_file(), tag.edges_file());
            reports.extend(copy_pair("subtype", &folder, (nodes.as_str(), edges.as_str()), &out, (nodes.as_str(), edges.as_str()))?);
        }
    }
    Ok(reports)
}

fn sorted_entries(folder: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(folder)
        .map(|rd| rd.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| p.is_file()).collect())
        .unwrap_or_default();
    entries.sort();
    entries
}

/// First `*.json` file of the folder by name.
fn first_style_file(folder: &Path) -> Option<PathBuf> {
    sorted_entries(folder)
        .into_iter()
        .find(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_centrality_metric_names() {
        assert_eq!(
            centrality_metric("Betweenness(Weight)top32.csv"),
            Some(("betweenness".to_string(), RankingFormat::Csv))
        );
        assert_eq!(
            centrality_metric("Degree top32.XLSX"),
            Some(("degree".to_string(), RankingFormat::Spreadsheet))
        );
        assert_eq!(centrality_metric("Closeness(weight)TOP32.csv").unwrap().0, "closeness");
        assert_eq!(centrality_metric("betweenness.csv"), None);
        assert_eq!(centrality_metric("top32.csv"), None);
        assert_eq!(centrality_metric("Degree top32.txt"), None);
    }

    #[test]
    fn test_optional_stats_files_are_silent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig { raw_dir: dir.path().join("raw"), data_dir: dir.path().join("data") };
        let reports = stage_stats(&paths).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].is_done());
    }

    #[test]
    fn test_first_style_file_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_style.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a_style.json"), "[]").unwrap();
        std::fs::write(dir.path().join("layout.cyjs"), "{}").unwrap();
        assert_eq!(first_style_file(dir.path()).unwrap(), dir.path().join("a_style.json"));
    }

    #[test]
    fn test_spreadsheet_ranking_is_converted() {
        let layout = cdk46kb_test_utils::RawLayout::new();
        cdk46kb_test_utils::write_xlsx(
            layout.raw_path("3.centrality/Closeness(Weight)top32.xlsx"),
            &["Gene", "Closeness"],
            &[&["CDK4", "0.61"], &["CCNE1", ""]],
        );

        let reports = stage_centrality(&layout.config().paths).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_done(), "{}", reports[0]);
        assert_eq!(
            std::fs::read_to_string(layout.data_path("centrality/closeness.csv")).unwrap(),
            "Gene,Closeness\nCDK4,0.61\nCCNE1,\n"
        );
    }

    #[test]
    fn test_broken_spreadsheet_ranking_is_skipped() {
        let layout = cdk46kb_test_utils::RawLayout::new();
        layout.write_raw("3.centrality/Degree top32.xlsx", b"PK\x03\x04");

        let reports = stage_centrality(&layout.config().paths).unwrap();
        assert!(!reports[0].is_done());
        assert!(!layout.data_path("centrality/degree.csv").exists());
    }

    #[test]
    fn test_pair_falls_back_to_spreadsheets() {
        let layout = cdk46kb_test_utils::RawLayout::new();
        let dir = layout.raw_path(ORGANIC_FOLDER);
        cdk46kb_test_utils::write_xlsx(dir.join("organic_nodes.xlsx"), &["id", "type"], &[&["CDK4", "gene"]]);
        cdk46kb_test_utils::write_xlsx(dir.join("organic_edges.xlsx"), &["source", "target"], &[&["Palbociclib", "CDK4"]]);

        let out = layout.data_path("organic");
        let reports = copy_pair(
            "organic",
            &dir,
            ("organic_nodes.csv", "organic_edges.csv"),
            &out,
            ("organic_nodes.csv", "organic_edges.csv"),
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_done(), "{}", reports[0]);
        assert_eq!(std::fs::read_to_string(out.join("organic_nodes.csv")).unwrap(), "id,type\nCDK4,gene\n");
        assert_eq!(
            std::fs::read_to_string(out.join("organic_edges.csv")).unwrap(),
            "source,target\nPalbociclib,CDK4\n"
        );
    }

    #[test]
    fn test_pair_with_one_spreadsheet_is_skipped() {
        let layout = cdk46kb_test_utils::RawLayout::new();
        let dir = layout.raw_path(ORGANIC_FOLDER);
        cdk46kb_test_utils::write_xlsx(dir.join("organic_nodes.xlsx"), &["id"], &[&["CDK4"]]);

        let out = layout.data_path("organic");
        let reports = copy_pair("organic", &dir, ("organic_nodes.csv", "organic_edges.csv"), &out, ("organic_nodes.csv", "organic_edges.csv"))
            .unwrap();
        assert!(!reports[0].is_done());
        assert!(!out.join("organic_nodes.csv").exists());
    }
}
