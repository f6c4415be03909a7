//! Reading taxonomy files from disk.
//!
//! The engine itself never touches the filesystem; this module turns a YAML
//! or JSON document into a [`Catalog`](crate::Catalog) once, at startup.

mod loader;

pub use loader::{load_catalog, LoadError};
