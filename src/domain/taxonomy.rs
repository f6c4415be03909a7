//! Taxonomy records: domains and everything a domain owns.
//!
//! These types mirror the curated catalog one-to-one and are (de)serialised
//! with camelCase field names so the same file can feed other tooling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::matching::{dedup_case_insensitive, overlaps};

/// Career stage, ordered by seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// Student or trainee placement.
    Internship,
    /// First full-time role.
    Entry,
    /// Established individual contributor.
    Mid,
    /// Senior or lead practitioner.
    Senior,
    /// Director level and above.
    Executive,
}

impl ExperienceLevel {
    /// All levels, most junior first.
    pub const ALL: [Self; 5] = [
        Self::Internship,
        Self::Entry,
        Self::Mid,
        Self::Senior,
        Self::Executive,
    ];

    /// Returns the lowercase wire name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internship => "internship",
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Executive => "executive",
        }
    }

    /// Whether this level is at the very start of a career.
    #[must_use]
    pub const fn is_early_career(self) -> bool {
        matches!(self, Self::Internship | Self::Entry)
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name an [`ExperienceLevel`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid experience level '{0}': expected one of internship, entry, mid, senior, executive")]
pub struct ParseLevelError(String);

impl FromStr for ExperienceLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// How sought-after professionals in a domain currently are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Demand {
    /// Strong hiring demand.
    High,
    /// Steady demand.
    #[default]
    Medium,
    /// Shrinking or saturated market.
    Low,
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// How hard it is to break into a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Competitiveness {
    /// Many applicants per role.
    High,
    /// Balanced market.
    #[default]
    Medium,
    /// Few applicants per role.
    Low,
}

impl fmt::Display for Competitiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// Market outlook for a domain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryTrends {
    /// Current hiring demand.
    pub demand: Demand,
    /// Projected growth, in percent.
    pub growth_rate: f64,
    /// Barrier to entry.
    pub competitiveness: Competitiveness,
    /// Job titles that are appearing in the domain.
    pub emerging_roles: Vec<String>,
}

/// A yearly pay band, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl SalaryRange {
    /// Creates a range in the default currency.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            currency: default_currency(),
        }
    }

    /// Whether `other` lies entirely within this range.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.min >= self.min && other.max <= self.max
    }
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Where a role is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEnvironment {
    /// Fully remote.
    pub remote: bool,
    /// Split between home and office.
    pub hybrid: bool,
    /// On premises.
    pub onsite: bool,
}

impl WorkEnvironment {
    /// Whether every flag requested here is also offered by `offered`.
    ///
    /// Flags left `false` in the request are not constraints.
    #[must_use]
    pub const fn satisfied_by(&self, offered: &Self) -> bool {
        (!self.remote || offered.remote)
            && (!self.hybrid || offered.hybrid)
            && (!self.onsite || offered.onsite)
    }
}

/// A specialisation within a [`Domain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subfield {
    /// Identifier, unique within the owning domain.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Skills a practitioner is expected to have.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Typical pay band.
    #[serde(default)]
    pub average_salary: SalaryRange,
    /// Job titles found in this subfield.
    #[serde(default)]
    pub job_roles: Vec<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A concrete job within a [`Subfield`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerExample {
    /// Identifier, unique within the owning domain.
    pub id: String,
    /// Job title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Subfield of the same domain this career belongs to.
    pub subfield_id: String,
    /// Career stage of the role.
    pub experience_level: ExperienceLevel,
    /// Pay band.
    #[serde(default)]
    pub salary_range: SalaryRange,
    /// Skills the role requires.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Skills that help but are not required.
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    /// Where the role is performed.
    #[serde(default)]
    pub work_environment: WorkEnvironment,
    /// Titles this role typically progresses through.
    #[serde(default)]
    pub career_path: Vec<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CareerExample {
    /// Required followed by preferred skills.
    pub fn skills(&self) -> impl Iterator<Item = &String> + Clone {
        self.required_skills.iter().chain(&self.preferred_skills)
    }
}

/// A time-bounded placement within a [`Subfield`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipOpportunity {
    /// Identifier, unique within the owning domain.
    pub id: String,
    /// Placement title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Subfield of the same domain this placement belongs to.
    pub subfield_id: String,
    /// Human-readable length, e.g. `"3 months"`.
    #[serde(default)]
    pub duration: String,
    /// Stipend band.
    #[serde(default)]
    pub stipend: SalaryRange,
    /// Skills expected up front.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// What the intern takes away.
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    /// Where the placement is performed.
    #[serde(default)]
    pub work_environment: WorkEnvironment,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// What a given career stage looks like within a [`Domain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceLevelInfo {
    /// The stage described.
    pub level: ExperienceLevel,
    /// Display title, e.g. `"Junior Developer"`.
    #[serde(default)]
    pub title: String,
    /// Typical years of experience, free text.
    #[serde(default)]
    pub years_experience: String,
    /// Pay band at this stage.
    #[serde(default)]
    pub salary_range: SalaryRange,
    /// Typical responsibilities.
    #[serde(default)]
    pub responsibilities: Vec<String>,
    /// Skills expected at this stage.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Labels for the next steps up.
    #[serde(default)]
    pub progression: Vec<String>,
}

/// A top-level career category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Globally unique, stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Display-only icon, passed through untouched.
    #[serde(default)]
    pub icon: String,
    /// Display-only colour, passed through untouched.
    #[serde(default)]
    pub color: String,
    /// Specialisations, in curated order.
    #[serde(default)]
    pub subfields: Vec<Subfield>,
    /// Example jobs, in curated order.
    #[serde(default)]
    pub career_examples: Vec<CareerExample>,
    /// Example placements, in curated order.
    #[serde(default)]
    pub internships: Vec<InternshipOpportunity>,
    /// Career stages described for this domain.
    #[serde(default)]
    pub experience_levels: Vec<ExperienceLevelInfo>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Market outlook.
    #[serde(default)]
    pub industry_trends: IndustryTrends,
    /// Ids of related domains. Not guaranteed to resolve.
    #[serde(default)]
    pub related_domains: Vec<String>,
}

impl Domain {
    /// Finds a subfield of this domain by id.
    #[must_use]
    pub fn subfield(&self, id: &str) -> Option<&Subfield> {
        self.subfields.iter().find(|subfield| subfield.id == id)
    }

    /// Finds a career example of this domain by id.
    #[must_use]
    pub fn career(&self, id: &str) -> Option<&CareerExample> {
        self.career_examples.iter().find(|career| career.id == id)
    }

    /// Finds an internship of this domain by id.
    #[must_use]
    pub fn internship(&self, id: &str) -> Option<&InternshipOpportunity> {
        self.internships.iter().find(|internship| internship.id == id)
    }

    /// Returns the first stage description for `level`, if any.
    #[must_use]
    pub fn level_info(&self, level: ExperienceLevel) -> Option<&ExperienceLevelInfo> {
        self.experience_levels
            .iter()
            .find(|info| info.level == level)
    }

    /// Whether any career example sits at `level`.
    #[must_use]
    pub fn has_career_at(&self, level: ExperienceLevel) -> bool {
        self.career_examples
            .iter()
            .any(|career| career.experience_level == level)
    }

    /// Whether the domain describes `level` at all, through a career example
    /// or a stage description.
    #[must_use]
    pub fn offers_level(&self, level: ExperienceLevel) -> bool {
        self.has_career_at(level) || self.level_info(level).is_some()
    }

    /// Every skill the domain asks for: subfield requirements followed by
    /// career requirements and preferences.
    ///
    /// Duplicates are removed case-insensitively, keeping the first spelling.
    #[must_use]
    pub fn skill_pool(&self) -> Vec<&str> {
        let subfield_skills = self
            .subfields
            .iter()
            .flat_map(|subfield| &subfield.required_skills);
        let career_skills = self.career_examples.iter().flat_map(CareerExample::skills);

        dedup_case_insensitive(subfield_skills.chain(career_skills).map(String::as_str))
    }

    /// The subset of `skills` that overlaps the domain's skill pool.
    #[must_use]
    pub fn matching_skills<'s>(&self, skills: &'s [String]) -> Vec<&'s str> {
        let pool = self.skill_pool();
        skills
            .iter()
            .map(String::as_str)
            .filter(|skill| pool.iter().any(|known| overlaps(known, skill)))
            .collect()
    }
}
