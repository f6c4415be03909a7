use std::{
    io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::{Catalog, CatalogError, Domain};

/// Errors that can occur while loading a taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read taxonomy file {}: {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file extension is not one of `.yaml`, `.yml` or `.json`.
    #[error("unsupported taxonomy format for {}: expected .yaml, .yml or .json", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The document is not valid taxonomy YAML.
    #[error("invalid taxonomy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid taxonomy JSON.
    #[error("invalid taxonomy JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but breaks a catalog invariant.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A taxonomy document: either a bare list of domains or a `domains` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped { domains: Vec<Domain> },
    Bare(Vec<Domain>),
}

impl Document {
    fn into_domains(self) -> Vec<Domain> {
        match self {
            Self::Wrapped { domains } | Self::Bare(domains) => domains,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Catalog {
    /// Builds a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the domains break a
    /// catalog invariant.
    pub fn from_yaml_str(source: &str) -> Result<Self, LoadError> {
        let document: Document = serde_yaml::from_str(source)?;
        Ok(Self::new(document.into_domains())?)
    }

    /// Builds a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the domains break a
    /// catalog invariant.
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        let document: Document = serde_json::from_str(source)?;
        Ok(Self::new(document.into_domains())?)
    }
}

/// Loads a catalog from a `.yaml`, `.yml` or `.json` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported extension,
/// cannot be parsed, or breaks a catalog invariant.
#[instrument(level = "debug")]
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = match format {
        Format::Yaml => Catalog::from_yaml_str(&source)?,
        Format::Json => Catalog::from_json_str(&source)?,
    };

    debug!(domains = catalog.len(), "loaded taxonomy");
    Ok(catalog)
}
