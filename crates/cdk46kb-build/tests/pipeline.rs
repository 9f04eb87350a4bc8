use std::fs;
use std::io::Read;

use cdk46kb_build::pipeline::{run_all, run_subtypes};
use cdk46kb_build::SubtypeStatus;
use cdk46kb_common::SubtypeTag;
use cdk46kb_config::EdgeIdentity;
use cdk46kb_test_utils::{write_xlsx, RawLayout};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn read(layout: &RawLayout, rel: &str) -> String {
    fs::read_to_string(layout.data_path(rel)).unwrap()
}

#[test]
fn test_full_build_stages_every_asset() {
    let layout = RawLayout::populated();
    let summary = run_all(layout.config()).unwrap();

    assert_eq!(summary.skipped(), 0, "{}", summary);

    assert!(read(&layout, "stats/cdk4_6_kb.csv").starts_with("Gene Symbol,Cell type"));
    assert_eq!(read(&layout, "centrality/degree.csv"), "Gene,Degree\nCDK4,12\nCDK6,9\nCCND1,7\n");
    assert_eq!(read(&layout, "centrality/betweenness.csv"), "Gene,Betweenness\nCDK6,0.35\nCDK4,0.2\n");
    assert!(layout.data_path("organic/organic_full.cyjs").exists());
    assert!(layout.data_path("organic/organic_style.json").exists());
    assert!(layout.data_path("organic/organic_edges.csv").exists());

    for tag in SubtypeTag::ALL {
        assert!(layout.data_path(format!("subtype/{}", tag.layout_file())).exists(), "{}", tag);
        assert!(layout.data_path(format!("subtype/{}", tag.style_file())).exists(), "{}", tag);
        assert!(layout.data_path(format!("subtype/{}", tag.edges_file())).exists(), "{}", tag);
    }

    let style: Value = serde_json::from_str(&read(&layout, "network/style.json")).unwrap();
    assert_eq!(style[1]["selector"], "edge[weight > 1000]");

    let mindmap: Value = serde_json::from_str(&read(&layout, "mindmap/cdk46_mindmap.json")).unwrap();
    assert_eq!(mindmap["format"], "node_tree");
    assert_eq!(mindmap["data"].as_array().unwrap().len(), 4);
    assert!(layout.data_path("mindmap/knowledge_map.txt").exists());

    let zip_file = fs::File::open(layout.data_path("stats/cdk4_6_kb_full.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(zip_file).unwrap();
    let mut body = String::new();
    archive.by_name("cdk4_6_kb.csv").unwrap().read_to_string(&mut body).unwrap();
    assert_eq!(body, read(&layout, "stats/cdk4_6_kb.csv"));
}

#[test]
fn test_original_subtype_tables_from_spreadsheets() {
    let layout = RawLayout::populated();
    let folder = layout.subtype_folder(SubtypeTag::TnbcOriginal);
    fs::remove_file(folder.join("tnbc_original_nodes.csv")).unwrap();
    fs::remove_file(folder.join("tnbc_original_edges.csv")).unwrap();
    write_xlsx(folder.join("tnbc_original_nodes.xlsx"), &["id"], &[&["CDK6"], &["CDKN2A"]]);
    write_xlsx(folder.join("tnbc_original_edges.xlsx"), &["source", "target", "weight"], &[&["CDK6", "CDKN2A", "3"]]);

    let summary = run_all(layout.config()).unwrap();
    assert_eq!(summary.skipped(), 0, "{}", summary);
    assert_eq!(read(&layout, "subtype/tnbc_original_nodes.csv"), "id\nCDK6\nCDKN2A\n");
    assert_eq!(read(&layout, "subtype/tnbc_original_edges.csv"), "source,target,weight\nCDK6,CDKN2A,3\n");
}

#[test]
fn test_augmented_networks_are_merged() {
    let layout = RawLayout::populated();
    let outcomes = run_subtypes(layout.config()).unwrap();

    let lines: Vec<String> = outcomes.iter().map(|o| o.to_string()).collect();
    assert_eq!(
        lines,
        vec!["luminal_aug: merged 4 nodes, 3 edges", "tnbc_aug: merged 3 nodes, 2 edges"]
    );
    assert_eq!(
        read(&layout, "subtype/luminal_aug_edges.csv"),
        "source,target\nCDK4,CCND1\nCDK6,CCND1\nCDK4,RB1\n"
    );
    assert_eq!(read(&layout, "subtype/luminal_aug_nodes.csv"), "id\nCDK4\nCCND1\nCDK6\nRB1\n");
}

#[test]
fn test_missing_original_only_skips_that_subtype() {
    let layout = RawLayout::populated();
    let plans = layout.config().subtype_plans().unwrap();
    fs::remove_file(&plans[0].original_edges).unwrap();

    let summary = run_all(layout.config()).unwrap();
    assert!(matches!(summary.subtypes[0].status, SubtypeStatus::Skipped { .. }));
    assert_eq!(summary.subtypes[1].tag, SubtypeTag::TnbcAug);
    assert!(summary.subtypes[1].is_merged());
    assert!(!layout.data_path("subtype/luminal_aug_edges.csv").exists());
    assert!(layout.data_path("subtype/tnbc_aug_edges.csv").exists());
}

#[test]
fn test_rebuild_is_byte_identical() {
    let layout = RawLayout::populated();
    run_subtypes(layout.config()).unwrap();
    let edges = fs::read(layout.data_path("subtype/tnbc_aug_edges.csv")).unwrap();
    let nodes = fs::read(layout.data_path("subtype/tnbc_aug_nodes.csv")).unwrap();

    run_subtypes(layout.config()).unwrap();
    assert_eq!(fs::read(layout.data_path("subtype/tnbc_aug_edges.csv")).unwrap(), edges);
    assert_eq!(fs::read(layout.data_path("subtype/tnbc_aug_nodes.csv")).unwrap(), nodes);
}

#[test]
fn test_header_only_augmented_reproduces_original() {
    let layout = RawLayout::new();
    layout.write_subtype_sources(SubtypeTag::TnbcAug, "Source,Target,Weight\nCDK6,CDKN2A,0.4\n", "source,target,weight\n");

    let outcomes = run_subtypes(layout.config()).unwrap();
    assert!(outcomes[1].is_merged());
    assert_eq!(read(&layout, "subtype/tnbc_aug_edges.csv"), "source,target,weight\nCDK6,CDKN2A,0.4\n");
}

#[test]
fn test_undirected_identity_from_config() {
    let mut layout = RawLayout::new();
    layout.config_mut().build.edge_identity = EdgeIdentity::Undirected;
    layout.write_subtype_sources(SubtypeTag::LuminalAug, "source,target\nA,B\n", "source,target\nB,A\nC,D\n");

    let outcomes = run_subtypes(layout.config()).unwrap();
    assert_eq!(outcomes[0].to_string(), "luminal_aug: merged 4 nodes, 2 edges");
}

#[test]
fn test_unwritable_data_dir_aborts() {
    let mut layout = RawLayout::populated();
    let blocker = layout.root().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    layout.config_mut().paths.data_dir = blocker;

    let err = run_all(layout.config()).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_empty_raw_tree_reports_without_failing() {
    let layout = RawLayout::new();
    let summary = run_all(layout.config()).unwrap();
    assert!(summary.skipped() > 0);
    assert!(summary.subtypes.iter().all(|s| !s.is_merged()));
    assert!(summary.to_string().contains("skipped: missing"));
}
