//! Configuration loading for the CDK4/6 knowledge base.
//! Reads cdk46kb.toml from the current directory or the path in the CDK46KB_CONFIG env var.
//!
//! The raw-data layout of the subtype networks is spelled out here as an
//! explicit mapping and validated before any build step touches the disk.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use cdk46kb_common::SubtypeTag;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const CONFIG_ENV: &str = "CDK46KB_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cdk46kb.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub build: BuildConfig,
    /// Keyed by subtype tag; missing tags fall back to the stock layout.
    #[serde(default)]
    pub subtypes: BTreeMap<String, SubtypeLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_raw_dir()  -> PathBuf { PathBuf::from("raw_data") }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self { raw_dir: default_raw_dir(), data_dir: default_data_dir() }
    }
}

impl PathsConfig {
    pub fn stats_dir(&self)      -> PathBuf { self.data_dir.join("stats") }
    pub fn network_dir(&self)    -> PathBuf { self.data_dir.join("network") }
    pub fn centrality_dir(&self) -> PathBuf { self.data_dir.join("centrality") }
    pub fn organic_dir(&self)    -> PathBuf { self.data_dir.join("organic") }
    pub fn subtype_dir(&self)    -> PathBuf { self.data_dir.join("subtype") }
    pub fn mindmap_dir(&self)    -> PathBuf { self.data_dir.join("mindmap") }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 8000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// How two edge rows are recognised as the same edge when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeIdentity {
    /// All cells equal, in column order. `A,B` and `B,A` are different edges.
    #[default]
    Exact,
    /// Endpoints compared as an unordered pair, remaining cells exactly.
    Undirected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub edge_identity: EdgeIdentity,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

fn default_archive_name() -> String { "cdk4_6_kb_full.zip".to_string() }

impl Default for BuildConfig {
    fn default() -> Self {
        Self { edge_identity: EdgeIdentity::default(), archive_name: default_archive_name() }
    }
}

/// Where one subtype's raw files live, relative to `paths.raw_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeLayout {
    pub folder: PathBuf,
    /// Authored edges of the network being augmented (aug tags only).
    #[serde(default)]
    pub original_edges: Option<PathBuf>,
    /// Inferred edges to union in (aug tags only).
    #[serde(default)]
    pub augmented_edges: Option<PathBuf>,
}

/// Stock raw-data layout, one folder per subtype.
pub fn default_subtypes() -> BTreeMap<String, SubtypeLayout> {
    let luminal = "5.Luminal figure";
    let luminal_aug = "6.luminal figure after knowledge map augmentation";
    let tnbc = "7.TNBC figure";
    let tnbc_aug = "8.TNBC figure after knowledge map augmentation";

    let mut map = BTreeMap::new();
    map.insert(SubtypeTag::LuminalOriginal.to_string(), SubtypeLayout {
        folder: luminal.into(),
        original_edges: None,
        augmented_edges: None,
    });
    map.insert(SubtypeTag::LuminalAug.to_string(), SubtypeLayout {
        folder: luminal_aug.into(),
        original_edges: Some(Path::new(luminal).join("luminal_original_edges.csv")),
        augmented_edges: Some(Path::new(luminal_aug).join("Common_High-Ranked_Gene_Links5%_import.xlsx.csv")),
    });
    map.insert(SubtypeTag::TnbcOriginal.to_string(), SubtypeLayout {
        folder: tnbc.into(),
        original_edges: None,
        augmented_edges: None,
    });
    map.insert(SubtypeTag::TnbcAug.to_string(), SubtypeLayout {
        folder: tnbc_aug.into(),
        original_edges: Some(Path::new(tnbc).join("TNBC_original_edges.csv")),
        augmented_edges: Some(Path::new(tnbc_aug).join("TNBC_Common_High-Ranked_Gene_Links_import50.csv")),
    });
    map
}

/// A fully resolved merge job for one augmented subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtypePlan {
    pub tag: SubtypeTag,
    pub original_edges: PathBuf,
    pub augmented_edges: PathBuf,
    pub edges_out: PathBuf,
    pub nodes_out: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            server: ServerConfig::default(),
            build: BuildConfig::default(),
            subtypes: default_subtypes(),
        }
    }
}


impl Config {
    /// Load configuration from cdk46kb.toml.
    /// Checks CDK46KB_CONFIG env var first, then the current directory.
    /// A missing default file yields the stock configuration; a missing file
    /// named by the env var is an error.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from(path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from(DEFAULT_CONFIG_FILE),
            Err(_) => {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                let config = Config::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse, fill in stock subtype entries, and validate.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        for (tag, layout) in default_subtypes() {
            config.subtypes.entry(tag).or_insert(layout);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::new();
        for (key, layout) in &self.subtypes {
            let tag: SubtypeTag = key
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{}", e)))?;
            seen.push(tag);

            check_relative(&format!("subtypes.{}.folder", key), &layout.folder)?;

            match (tag.is_augmented(), &layout.original_edges, &layout.augmented_edges) {
                (true, Some(orig), Some(aug)) => {
                    check_relative(&format!("subtypes.{}.original_edges", key), orig)?;
                    check_relative(&format!("subtypes.{}.augmented_edges", key), aug)?;
                }
                (true, _, _) => {
                    return Err(ConfigError::Invalid(format!(
                        "subtypes.{}: augmented subtypes need both original_edges and augmented_edges",
                        key
                    )));
                }
                (false, None, None) => {}
                (false, _, _) => {
                    return Err(ConfigError::Invalid(format!(
                        "subtypes.{}: only augmented subtypes take merge sources",
                        key
                    )));
                }
            }
        }

        if let Some(missing) = SubtypeTag::ALL.iter().find(|t| !seen.contains(t)) {
            return Err(ConfigError::Invalid(format!("subtypes.{} is not configured", missing)));
        }

        let archive = &self.build.archive_name;
        if !archive.ends_with(".zip") || archive.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "build.archive_name must be a plain *.zip file name, got '{}'",
                archive
            )));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host is empty".to_string()));
        }

        Ok(())
    }

    /// Layout of one subtype. Only fails on a config that skipped `validate`.
    pub fn subtype_layout(&self, tag: SubtypeTag) -> Result<&SubtypeLayout> {
        self.subtypes
            .get(tag.as_str())
            .ok_or_else(|| ConfigError::Invalid(format!("subtypes.{} is not configured", tag)))
    }

    /// Raw folder of every subtype, in tag order.
    pub fn subtype_folders(&self) -> Result<Vec<(SubtypeTag, PathBuf)>> {
        SubtypeTag::ALL
            .iter()
            .map(|tag| Ok((*tag, self.paths.raw_dir.join(&self.subtype_layout(*tag)?.folder))))
            .collect()
    }

    /// Merge jobs for the augmented subtypes, in tag order.
    pub fn subtype_plans(&self) -> Result<Vec<SubtypePlan>> {
        let out_dir = self.paths.subtype_dir();
        let mut plans = Vec::new();
        for tag in SubtypeTag::ALL.iter().filter(|t| t.is_augmented()) {
            let layout = self.subtype_layout(*tag)?;
            let (Some(orig), Some(aug)) = (&layout.original_edges, &layout.augmented_edges) else {
                return Err(ConfigError::Invalid(format!("subtypes.{} has no merge sources", tag)));
            };
            plans.push(SubtypePlan {
                tag: *tag,
                original_edges: self.paths.raw_dir.join(orig),
                augmented_edges: self.paths.raw_dir.join(aug),
                edges_out: out_dir.join(tag.edges_file()),
                nodes_out: out_dir.join(tag.nodes_file()),
            });
        }
        Ok(plans)
    }
}

fn check_relative(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{} is empty", field)));
    }
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(ConfigError::Invalid(format!(
            "{} must be relative to paths.raw_dir, got {}",
            field,
            path.display()
        )));
    }
    Ok(())
}
