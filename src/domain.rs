//! The career-pathway engine.
//!
//! Everything here is pure and synchronous: an immutable [`Catalog`] is built
//! once and then searched, scored against user profiles, and used to validate
//! selections. Nothing in this module performs I/O.

mod catalog;
pub use catalog::{Catalog, CatalogError, MAX_JOB_ROLES};

mod config;
pub use config::Config;

/// Taxonomy records.
pub mod taxonomy;
pub use taxonomy::{
    CareerExample, Competitiveness, Demand, Domain, ExperienceLevel, ExperienceLevelInfo,
    IndustryTrends, InternshipOpportunity, ParseLevelError, SalaryRange, Subfield,
    WorkEnvironment,
};

mod matching;

pub mod relevance;

mod skill;
pub use skill::{Skill, normalize_skills};

/// Filtered, ranked search.
pub mod search;
pub use search::{ResultKind, SearchFilters, SearchResponse, SearchResult};

/// Profile-based domain recommendations.
pub mod recommend;
pub use recommend::DomainRecommendation;

/// Selection validation.
pub mod validate;
pub use validate::{
    DomainSelection, ErrorCode, ValidationError, ValidationResult, ValidationWarning,
};

/// Assessment-form validation.
pub mod assessment;
pub use assessment::{Age, AssessmentForm, EducationLevel, ParseEducationError};

#[cfg(test)]
pub(crate) mod fixtures;
