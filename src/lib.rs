//! Career domain exploration.
//!
//! A curated taxonomy of career domains is loaded once and then searched,
//! matched against a user's skills and interests, and used to check that a
//! chosen career path hangs together.

pub mod domain;
pub use domain::{
    AssessmentForm, Catalog, CatalogError, Config, DomainRecommendation, DomainSelection, Domain,
    ExperienceLevel, SearchFilters, SearchResponse, Skill, ValidationResult,
};

/// Loading taxonomies from disk.
pub mod storage;
pub use storage::{LoadError, load_catalog};
