//! Knowledge-map hierarchy codes.
//!
//! The knowledge map is an outline whose lines start with a dotted code
//! (`1`, `1.2`, `1.2.3`, …). The depth of a code picks the label column of the
//! statistics table that holds it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Label columns of the statistics table, by depth.
pub const LABEL_COLUMNS: [&str; 4] = ["一级标签", "二级标签", "三级标签", "四级标签"];

/// A dotted numeric code such as `1.2.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyCode(String);

impl HierarchyCode {
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        let valid = !code.is_empty()
            && code
                .split('.')
                .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()));
        valid.then(|| Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }

    pub fn parent(&self) -> Option<HierarchyCode> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| HierarchyCode(parent.to_string()))
    }

    /// Statistics-table column holding labels at this depth.
    pub fn label_column(&self) -> Option<&'static str> {
        LABEL_COLUMNS.get(self.depth().checked_sub(1)?).copied()
    }
}

impl fmt::Display for HierarchyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One node of the knowledge map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub code: String,
    pub label: String,
    pub depth: usize,
    pub parent: Option<String>,
}

fn outline_regex() -> &'static Regex {
    static OUTLINE: OnceLock<Regex> = OnceLock::new();
    OUTLINE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)*)(?:[\. ]+\s*(.+))?$").expect("outline pattern is valid")
    })
}

/// Split `1.2.3 Description` into its code and description.
pub fn parse_outline_line(line: &str) -> Option<(HierarchyCode, String)> {
    let caps = outline_regex().captures(line.trim())?;
    let code = HierarchyCode::parse(caps.get(1)?.as_str())?;
    let desc = caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
    Some((code, desc))
}

/// Parse a whole knowledge map. Lines without a leading code are ignored.
pub fn parse_outline(text: &str) -> Vec<OutlineNode> {
    text.lines()
        .filter_map(parse_outline_line)
        .map(|(code, desc)| {
            let label = if desc.is_empty() {
                code.to_string()
            } else {
                format!("{} {}", code, desc)
            };
            OutlineNode {
                depth: code.depth(),
                parent: code.parent().map(|p| p.to_string()),
                code: code.to_string(),
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_and_column() {
        let code = HierarchyCode::parse("1.2.3").unwrap();
        assert_eq!(code.depth(), 3);
        assert_eq!(code.label_column(), Some("三级标签"));
        assert_eq!(code.parent().unwrap().as_str(), "1.2");
        assert_eq!(HierarchyCode::parse("1.2.3.4.5").unwrap().label_column(), None);
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!(HierarchyCode::parse("1..2").is_none());
        assert!(HierarchyCode::parse("a.1").is_none());
        assert!(HierarchyCode::parse("").is_none());
    }

    #[test]
    fn test_outline_line_variants() {
        let (code, desc) = parse_outline_line("2.1. Cell cycle").unwrap();
        assert_eq!(code.as_str(), "2.1");
        assert_eq!(desc, "Cell cycle");

        let (code, desc) = parse_outline_line("  3").unwrap();
        assert_eq!(code.as_str(), "3");
        assert!(desc.is_empty());

        assert!(parse_outline_line("Preface").is_none());
    }

    #[test]
    fn test_parse_outline_links_parents() {
        let nodes = parse_outline("1 CDK4/6\n1.1 Genes\n\nnotes\n1.1.1 CCND1\n");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[2].parent.as_deref(), Some("1.1"));
        assert_eq!(nodes[2].label, "1.1.1 CCND1");
    }
}
