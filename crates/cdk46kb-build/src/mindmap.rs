//! Knowledge map outline → jsMind `node_tree` document.
//!
//! Two spaces of indentation make one level. A line hangs off the nearest
//! preceding line with a smaller level; lines with no such ancestor are roots.

use serde::Serialize;

use cdk46kb_config::PathsConfig;

use crate::error::Result;
use crate::output::write_bytes;
use crate::report::StepReport;

pub const OUTLINE_FILE: &str = "knowledge_map.txt";
pub const MINDMAP_FILE: &str = "cdk46_mindmap.json";

const INDENT_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapMeta {
    pub name: String,
    pub author: String,
    pub version: String,
}

impl Default for MindMapMeta {
    fn default() -> Self {
        Self {
            name: "CDK4/6-KG".to_string(),
            author: "cdk46kb".to_string(),
            version: "1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapNode {
    pub id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub isroot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parentid: Option<String>,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMap {
    pub meta: MindMapMeta,
    pub format: &'static str,
    pub data: Vec<MindMapNode>,
}

pub fn parse_outline_tree(text: &str) -> MindMap {
    let mut data = Vec::new();
    // (level, id) of the open ancestors
    let mut stack: Vec<(usize, String)> = Vec::new();

    for line in text.lines() {
        let topic = line.trim();
        if topic.is_empty() {
            continue;
        }
        let level = (line.len() - line.trim_start_matches(' ').len()) / INDENT_WIDTH;
        let id = format!("n{}", data.len());

        while stack.last().is_some_and(|(l, _)| *l >= level) {
            stack.pop();
        }
        let parentid = stack.last().map(|(_, id)| id.clone());
        data.push(MindMapNode {
            id: id.clone(),
            isroot: parentid.is_none(),
            parentid,
            topic: topic.to_string(),
        });
        stack.push((level, id));
    }

    MindMap { meta: MindMapMeta::default(), format: "node_tree", data }
}

pub fn stage_mindmap(paths: &PathsConfig) -> Result<Vec<StepReport>> {
    let src = paths.raw_dir.join(OUTLINE_FILE);
    let out = paths.mindmap_dir();

    let text = match std::fs::read_to_string(&src) {
        Ok(t) => t,
        Err(e) => {
            return Ok(vec![StepReport::skipped("mindmap", MINDMAP_FILE, format!("cannot read {}: {}", src.display(), e))]);
        }
    };

    let map = parse_outline_tree(&text);
    let body = serde_json::to_string_pretty(&map).unwrap_or_default();
    write_bytes(&out.join(MINDMAP_FILE), body.as_bytes())?;
    write_bytes(&out.join(OUTLINE_FILE), text.as_bytes())?;

    Ok(vec![
        StepReport::done("mindmap", MINDMAP_FILE, format!("{} nodes", map.data.len())),
        StepReport::done("mindmap", OUTLINE_FILE, format!("copied from {}", src.display())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_indentation_builds_tree() {
        let text = "1 CDK4/6\n  1.1 Mechanism\n    1.1.1 Cell cycle\n\n  1.2 Resistance\n2 Clinical\n";
        let map = parse_outline_tree(text);
        let parents: Vec<(&str, Option<&str>)> = map
            .data
            .iter()
            .map(|n| (n.id.as_str(), n.parentid.as_deref()))
            .collect();
        assert_eq!(
            parents,
            vec![("n0", None), ("n1", Some("n0")), ("n2", Some("n1")), ("n3", Some("n0")), ("n4", None)]
        );
        assert!(map.data[4].isroot);
        assert_eq!(map.data[2].topic, "1.1.1 Cell cycle");
    }

    #[test]
    fn test_serialised_shape() {
        let map = parse_outline_tree("root\n  child\n");
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(
            value,
            json!({
                "meta": {"name": "CDK4/6-KG", "author": "cdk46kb", "version": "1.0"},
                "format": "node_tree",
                "data": [
                    {"id": "n0", "isroot": true, "topic": "root"},
                    {"id": "n1", "parentid": "n0", "topic": "child"}
                ]
            })
        );
    }

    #[test]
    fn test_odd_indent_rounds_down() {
        let map = parse_outline_tree("a\n   b\n c\n");
        // "   b" is level 1, " c" is level 0
        assert_eq!(map.data[1].parentid.as_deref(), Some("n0"));
        assert!(map.data[2].isroot);
    }
}
