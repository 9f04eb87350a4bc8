//! Breast-cancer subtype network tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four subtype networks the knowledge base ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeTag {
    LuminalOriginal,
    LuminalAug,
    TnbcOriginal,
    TnbcAug,
}

impl SubtypeTag {
    pub const ALL: [SubtypeTag; 4] = [
        SubtypeTag::LuminalOriginal,
        SubtypeTag::LuminalAug,
        SubtypeTag::TnbcOriginal,
        SubtypeTag::TnbcAug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtypeTag::LuminalOriginal => "luminal_original",
            SubtypeTag::LuminalAug => "luminal_aug",
            SubtypeTag::TnbcOriginal => "tnbc_original",
            SubtypeTag::TnbcAug => "tnbc_aug",
        }
    }

    /// Augmented networks are original ∪ inferred and get built by merging.
    pub fn is_augmented(&self) -> bool {
        matches!(self, SubtypeTag::LuminalAug | SubtypeTag::TnbcAug)
    }

    /// The authored network an augmented tag extends.
    pub fn original(&self) -> SubtypeTag {
        match self {
            SubtypeTag::LuminalAug => SubtypeTag::LuminalOriginal,
            SubtypeTag::TnbcAug => SubtypeTag::TnbcOriginal,
            other => *other,
        }
    }

    /// Human-readable title used on listings.
    pub fn title(&self) -> &'static str {
        match self {
            SubtypeTag::LuminalOriginal => "Luminal B1 Original",
            SubtypeTag::LuminalAug => "Luminal B1 Augmented",
            SubtypeTag::TnbcOriginal => "TNBC Original",
            SubtypeTag::TnbcAug => "TNBC Augmented",
        }
    }

    pub fn edges_file(&self) -> String {
        format!("{}_edges.csv", self.as_str())
    }

    pub fn nodes_file(&self) -> String {
        format!("{}_nodes.csv", self.as_str())
    }

    pub fn layout_file(&self) -> String {
        format!("{}.cyjs", self.as_str())
    }

    pub fn style_file(&self) -> String {
        format!("{}_style.json", self.as_str())
    }
}

impl fmt::Display for SubtypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubtype(pub String);

impl fmt::Display for UnknownSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown subtype tag: {}", self.0)
    }
}

impl std::error::Error for UnknownSubtype {}

impl FromStr for SubtypeTag {
    type Err = UnknownSubtype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubtypeTag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownSubtype(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_agree() {
        for tag in SubtypeTag::ALL {
            assert_eq!(tag.to_string().parse::<SubtypeTag>().unwrap(), tag);
        }
        assert!("luminal".parse::<SubtypeTag>().is_err());
        assert!("../etc/passwd".parse::<SubtypeTag>().is_err());
    }

    #[test]
    fn test_augmented_tags_point_at_their_original() {
        assert!(SubtypeTag::TnbcAug.is_augmented());
        assert!(!SubtypeTag::TnbcOriginal.is_augmented());
        assert_eq!(SubtypeTag::LuminalAug.original(), SubtypeTag::LuminalOriginal);
        assert_eq!(SubtypeTag::LuminalAug.edges_file(), "luminal_aug_edges.csv");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&SubtypeTag::TnbcAug).unwrap();
        assert_eq!(json, "\"tnbc_aug\"");
    }
}
