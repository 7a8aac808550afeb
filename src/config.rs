//! Corpus layout configuration.
//!
//! A corpus root may carry a `lore.toml` overriding where each record kind lives. Every key is
//! optional; anything left out keeps the conventional layout.

use crate::{codec::RecordKind, error::LoreError};
use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

/// Name of the optional configuration file at the corpus root.
pub const CONFIG_NAME: &str = "lore.toml";

/// Directory and file locations, relative to the corpus root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub characters_dir: PathBuf,
    pub locations_dir: PathBuf,
    pub maps_dir: PathBuf,
    pub links_file: PathBuf,
    pub relations_file: PathBuf,
    pub schemas_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            characters_dir: PathBuf::from("characters"),
            locations_dir: PathBuf::from("locations"),
            maps_dir: PathBuf::from("maps"),
            links_file: PathBuf::from("links").join("character_locations.yml"),
            relations_file: PathBuf::from("relations").join("graph.yml"),
            schemas_dir: PathBuf::from("schemas"),
            output_dir: PathBuf::from("site").join("data"),
        }
    }
}

impl ProjectConfig {
    /// Schema file name for a record kind, inside [`ProjectConfig::schemas_dir`].
    pub fn schema_file(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Character => "character.schema.json",
            RecordKind::Location => "location.schema.json",
            RecordKind::Map => "map.schema.json",
            RecordKind::Links => "links.schema.json",
        }
    }
}

/// A [`ProjectConfig`] anchored at a corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    pub fn new<P: AsRef<Path>>(root: P, config: ProjectConfig) -> Self {
        Project {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    /// Read `lore.toml` under `root` if present, falling back to the default layout.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, LoreError> {
        let path = root.as_ref().join(CONFIG_NAME);
        tracing::debug!("Attempting to read project config from: {:?}", &path);
        if !path.exists() {
            tracing::debug!("Config file not found, using default layout.");
            return Ok(Project::new(root, ProjectConfig::default()));
        }
        let content = read_to_string(&path)?;
        let config: ProjectConfig = toml::from_str(&content)?;
        Ok(Project::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Directory holding records of `kind`. `None` for the links kind, which is a single file.
    pub fn record_dir(&self, kind: RecordKind) -> Option<PathBuf> {
        match kind {
            RecordKind::Character => Some(self.root.join(&self.config.characters_dir)),
            RecordKind::Location => Some(self.root.join(&self.config.locations_dir)),
            RecordKind::Map => Some(self.root.join(&self.config.maps_dir)),
            RecordKind::Links => None,
        }
    }

    pub fn links_path(&self) -> PathBuf {
        self.root.join(&self.config.links_file)
    }

    pub fn relations_path(&self) -> PathBuf {
        self.root.join(&self.config.relations_file)
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.root.join(&self.config.schemas_dir).join("vocab.yml")
    }

    pub fn schema_path(&self, kind: RecordKind) -> PathBuf {
        self.root
            .join(&self.config.schemas_dir)
            .join(ProjectConfig::schema_file(kind))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// Path of `path` relative to the corpus root, for diagnostics. Paths outside the root are
    /// returned unchanged.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| path.to_string_lossy().to_string())
    }
}
