//! One-shot validation of the onboarding assessment form.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{
    Catalog,
    skill::{Skill, normalize_skills},
    validate::{
        ErrorCode, Report, ValidationResult, present, resolve_domain, resolve_level,
        skill_alignment_warning,
    },
};

/// Youngest accepted age.
pub const MIN_AGE: i64 = 16;
/// Oldest accepted age.
pub const MAX_AGE: i64 = 100;
/// Minimum number of characters in a name.
pub const MIN_NAME_LEN: usize = 2;

/// Highest completed level of education.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
    Other,
}

impl EducationLevel {
    /// Every level, in ascending order.
    pub const ALL: [Self; 6] = [
        Self::HighSchool,
        Self::Associate,
        Self::Bachelor,
        Self::Master,
        Self::Doctorate,
        Self::Other,
    ];

    /// The wire name, e.g. `"high_school"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::Associate => "associate",
            Self::Bachelor => "bachelor",
            Self::Master => "master",
            Self::Doctorate => "doctorate",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name an [`EducationLevel`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid education level '{0}': expected one of high_school, associate, bachelor, master, doctorate, other"
)]
pub struct ParseEducationError(String);

impl FromStr for EducationLevel {
    type Err = ParseEducationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ParseEducationError(s.to_string()))
    }
}

/// An age as entered: a number, or text from a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    /// Whole years.
    Years(i64),
    /// A number with a fractional part. Never a valid age.
    Fractional(f64),
    /// Free text, e.g. `"25"`.
    Text(String),
}

impl Age {
    /// Whole years, if the input reads as a whole number.
    #[must_use]
    pub fn years(&self) -> Option<i64> {
        match self {
            Self::Years(years) => Some(*years),
            Self::Fractional(_) => None,
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<i64> for Age {
    fn from(years: i64) -> Self {
        Self::Years(years)
    }
}

/// The assessment form as submitted. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentForm {
    /// Full name.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<Age>,
    /// Highest education completed, as entered.
    pub education_level: Option<String>,
    /// The domain the user is aiming for.
    pub domain_id: Option<String>,
    /// Current or desired job title.
    pub job_role: Option<String>,
    /// Career stage, as entered.
    pub experience_level: Option<String>,
    /// Skills the user has.
    pub skills: Vec<Skill>,
}

impl Catalog {
    /// Validates an assessment form.
    ///
    /// Unlike [`Catalog::validate_selection`] every rule runs, so all problems
    /// are reported together.
    #[instrument(level = "debug", skip_all)]
    pub fn validate_assessment(&self, form: &AssessmentForm) -> ValidationResult {
        let mut report = Report::default();

        match present(form.name.as_deref()) {
            None => report.error("name", ErrorCode::NameRequired, "Name is required"),
            Some(name) if name.chars().count() < MIN_NAME_LEN => report.error(
                "name",
                ErrorCode::NameTooShort,
                format!("Name must be at least {MIN_NAME_LEN} characters"),
            ),
            Some(_) => {}
        }

        match form.age.as_ref().filter(|age| !age.is_blank()) {
            None => report.error("age", ErrorCode::AgeRequired, "Age is required"),
            Some(age) => {
                let in_range = age
                    .years()
                    .is_some_and(|years| (MIN_AGE..=MAX_AGE).contains(&years));
                if !in_range {
                    report.error(
                        "age",
                        ErrorCode::InvalidAge,
                        format!("Age must be a whole number between {MIN_AGE} and {MAX_AGE}"),
                    );
                }
            }
        }

        match present(form.education_level.as_deref()) {
            None => report.error(
                "educationLevel",
                ErrorCode::EducationLevelRequired,
                "Education level is required",
            ),
            Some(level) => {
                if let Err(error) = level.parse::<EducationLevel>() {
                    report.error(
                        "educationLevel",
                        ErrorCode::InvalidEducationLevel,
                        error.to_string(),
                    );
                }
            }
        }

        let domain = resolve_domain(self, form.domain_id.as_deref(), &mut report);

        if present(form.job_role.as_deref()).is_none() {
            report.error("jobRole", ErrorCode::JobRoleRequired, "Job role is required");
        }

        resolve_level(form.experience_level.as_deref(), &mut report);

        if let Some(domain) = domain {
            let skills = normalize_skills(&form.skills);
            if let Some(warning) = skill_alignment_warning(domain, &skills, "skills") {
                report.warn(warning);
            }
        }

        report.finish()
    }
}
