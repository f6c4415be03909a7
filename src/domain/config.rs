use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the `pathway` tool.
///
/// Read from [`Config::FILE_NAME`] at the workspace root. Every field has a
/// default, so the file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Location of the taxonomy file.
    ///
    /// Relative paths are resolved against the workspace root.
    taxonomy: PathBuf,

    /// Default number of rows printed by listing commands.
    pub limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: default_taxonomy(),
            limit: default_limit(),
        }
    }
}

impl Config {
    /// Name of the configuration file within the workspace root.
    pub const FILE_NAME: &'static str = "pathway.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `pathway.toml` from `root`, falling back to the defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(root: &Path) -> Result<Self, String> {
        let path = root.join(Self::FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The configured taxonomy path, as written.
    #[must_use]
    pub fn taxonomy(&self) -> &Path {
        &self.taxonomy
    }

    /// Overrides the taxonomy path.
    pub fn set_taxonomy(&mut self, path: impl Into<PathBuf>) {
        self.taxonomy = path.into();
    }

    /// The taxonomy path resolved against `root`.
    #[must_use]
    pub fn taxonomy_path(&self, root: &Path) -> PathBuf {
        root.join(&self.taxonomy)
    }
}

fn default_taxonomy() -> PathBuf {
    PathBuf::from("taxonomy.yaml")
}

const fn default_limit() -> usize {
    20
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_taxonomy")]
        taxonomy: PathBuf,

        #[serde(default = "default_limit")]
        limit: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { taxonomy, limit } => Self { taxonomy, limit },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            taxonomy: config.taxonomy,
            limit: config.limit,
        }
    }
}
