//! The immutable taxonomy snapshot every query runs against.
//!
//! A [`Catalog`] is built once from a list of [`Domain`] records and never
//! changes afterwards. It holds no interior mutability, so a single instance
//! can be shared across threads (e.g. behind an `Arc`) and queried
//! concurrently without locking.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{instrument, warn};

use super::{
    matching::{contains_ci, dedup_case_insensitive},
    taxonomy::{CareerExample, Demand, Domain, InternshipOpportunity},
};

/// Maximum number of entries returned by [`Catalog::search_job_roles`].
pub const MAX_JOB_ROLES: usize = 10;

/// Errors raised when a set of domains violates the catalog invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two domains share an id.
    #[error("duplicate domain id '{0}'")]
    DuplicateDomain(String),

    /// A career example or internship names a subfield its domain does not
    /// have.
    #[error("'{entry}' in domain '{domain}' references unknown subfield '{subfield}'")]
    UnknownSubfield {
        /// Owning domain.
        domain: String,
        /// The offending career example or internship.
        entry: String,
        /// The subfield id that failed to resolve.
        subfield: String,
    },
}

/// An immutable, indexed collection of domains.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Domains in curated order. This order is the discovery order used for
    /// tie-breaking in search results.
    domains: Vec<Domain>,

    /// Position of each domain in `domains`, keyed by id.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, checking the structural invariants.
    ///
    /// Duplicate experience-level descriptions and dangling related-domain
    /// ids are tolerated and only logged.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateDomain`] if two domains share an id
    /// - [`CatalogError::UnknownSubfield`] if a career example or internship
    ///   points at a subfield outside its own domain
    #[instrument(level = "debug", skip_all, fields(domains = domains.len()))]
    pub fn new(domains: Vec<Domain>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(domains.len());

        for (position, domain) in domains.iter().enumerate() {
            if index.insert(domain.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateDomain(domain.id.clone()));
            }
            check_subfield_references(domain)?;
            warn_on_duplicate_levels(domain);
        }

        for domain in &domains {
            for related in &domain.related_domains {
                if !index.contains_key(related) {
                    warn!(
                        domain = %domain.id,
                        related = %related,
                        "related domain does not exist"
                    );
                }
            }
        }

        Ok(Self { domains, index })
    }

    /// All domains, in curated order.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Looks up a domain by id.
    #[must_use]
    pub fn domain(&self, id: &str) -> Option<&Domain> {
        self.index.get(id).map(|&position| &self.domains[position])
    }

    /// Number of domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether the catalog holds no domains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// The domains `id` declares as related, in declared order.
    ///
    /// Ids that do not resolve are skipped. An unknown `id` yields nothing.
    #[must_use]
    pub fn related_domains(&self, id: &str) -> Vec<&Domain> {
        self.domain(id)
            .map(|domain| {
                domain
                    .related_domains
                    .iter()
                    .filter_map(|related| self.domain(related))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// High-demand domains, fastest-growing first.
    ///
    /// Domains with equal growth keep their curated order.
    #[must_use]
    pub fn trending_domains(&self, limit: usize) -> Vec<&Domain> {
        let mut trending: Vec<&Domain> = self
            .domains
            .iter()
            .filter(|domain| domain.industry_trends.demand == Demand::High)
            .collect();
        trending.sort_by(|a, b| {
            b.industry_trends
                .growth_rate
                .total_cmp(&a.industry_trends.growth_rate)
        });
        trending.truncate(limit);
        trending
    }

    /// Career examples of a domain, optionally restricted to one subfield.
    #[must_use]
    pub fn careers_for(&self, domain_id: &str, subfield_id: Option<&str>) -> Vec<&CareerExample> {
        self.domain(domain_id)
            .map(|domain| {
                domain
                    .career_examples
                    .iter()
                    .filter(|career| subfield_id.is_none_or(|id| career.subfield_id == id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Internships of a domain, optionally restricted to one subfield.
    #[must_use]
    pub fn internships_for(
        &self,
        domain_id: &str,
        subfield_id: Option<&str>,
    ) -> Vec<&InternshipOpportunity> {
        self.domain(domain_id)
            .map(|domain| {
                domain
                    .internships
                    .iter()
                    .filter(|internship| subfield_id.is_none_or(|id| internship.subfield_id == id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every skill mentioned anywhere in the catalog, sorted
    /// case-insensitively, without case-insensitive duplicates.
    #[must_use]
    pub fn all_skills(&self) -> Vec<String> {
        let skills = self.domains.iter().flat_map(|domain| {
            let subfields = domain
                .subfields
                .iter()
                .flat_map(|subfield| &subfield.required_skills);
            let careers = domain
                .career_examples
                .iter()
                .flat_map(CareerExample::skills);
            let internships = domain
                .internships
                .iter()
                .flat_map(|internship| &internship.required_skills);
            let levels = domain
                .experience_levels
                .iter()
                .flat_map(|info| &info.required_skills);
            subfields.chain(careers).chain(internships).chain(levels)
        });

        let mut skills: Vec<String> = dedup_case_insensitive(skills.map(String::as_str))
            .into_iter()
            .map(str::to_string)
            .collect();
        skills.sort_by_key(|skill| skill.to_lowercase());
        skills
    }

    /// Job roles containing `query` (case-insensitive), in discovery order,
    /// without duplicates, at most [`MAX_JOB_ROLES`] of them.
    #[must_use]
    pub fn search_job_roles(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        let mut seen = HashSet::new();
        self.domains
            .iter()
            .flat_map(|domain| &domain.subfields)
            .flat_map(|subfield| &subfield.job_roles)
            .filter(|role| contains_ci(role, query))
            .filter(|role| seen.insert(role.to_lowercase()))
            .take(MAX_JOB_ROLES)
            .cloned()
            .collect()
    }
}

fn check_subfield_references(domain: &Domain) -> Result<(), CatalogError> {
    let careers = domain
        .career_examples
        .iter()
        .map(|career| (&career.id, &career.subfield_id));
    let internships = domain
        .internships
        .iter()
        .map(|internship| (&internship.id, &internship.subfield_id));

    for (entry, subfield) in careers.chain(internships) {
        if domain.subfield(subfield).is_none() {
            return Err(CatalogError::UnknownSubfield {
                domain: domain.id.clone(),
                entry: entry.clone(),
                subfield: subfield.clone(),
            });
        }
    }
    Ok(())
}

fn warn_on_duplicate_levels(domain: &Domain) {
    let mut seen = HashSet::new();
    for info in &domain.experience_levels {
        if !seen.insert(info.level) {
            warn!(
                domain = %domain.id,
                level = %info.level,
                "experience level described more than once; the first entry is used"
            );
        }
    }
}
