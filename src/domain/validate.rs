//! Consistency checks for a user's concrete domain selection.
//!
//! Problems come in two strengths. [`ValidationError`]s make a selection
//! unusable and carry a stable [`ErrorCode`]; [`ValidationWarning`]s are
//! advice and never affect [`ValidationResult::is_valid`]. Validation itself
//! never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    Catalog,
    matching::{join_first, overlaps},
    skill::{Skill, normalize_skills},
    taxonomy::{Domain, ExperienceLevel, Subfield},
};

/// Below this share of matching skills the alignment warning is strong.
pub const LOW_ALIGNMENT: f64 = 0.3;

/// Below this share of matching skills a softer alignment warning is given.
pub const PARTIAL_ALIGNMENT: f64 = 0.5;

/// Goal words shorter than this are not matched against domain keywords.
const MIN_GOAL_WORD: usize = 3;

const LISTED_SKILLS: usize = 3;

/// A concrete choice of domain, specialisation, stage and skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSelection {
    /// The chosen domain.
    pub domain_id: Option<String>,
    /// The chosen subfield within the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfield_id: Option<String>,
    /// The chosen career example within the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_example_id: Option<String>,
    /// The requested career stage, as entered.
    pub experience_level: Option<String>,
    /// Skills the user has, as plain names or skill records.
    pub selected_skills: Vec<Skill>,
    /// Free-text goals.
    pub career_goals: Vec<String>,
}

/// Stable, machine-readable identifier of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    DomainRequired,
    DomainNotFound,
    ExperienceLevelRequired,
    InvalidExperienceLevel,
    SkillsRequired,
    SubfieldNotFound,
    CareerExampleNotFound,
    NameRequired,
    NameTooShort,
    AgeRequired,
    InvalidAge,
    EducationLevelRequired,
    InvalidEducationLevel,
    JobRoleRequired,
}

impl ErrorCode {
    /// The wire form of the code, e.g. `"DOMAIN_NOT_FOUND"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomainRequired => "DOMAIN_REQUIRED",
            Self::DomainNotFound => "DOMAIN_NOT_FOUND",
            Self::ExperienceLevelRequired => "EXPERIENCE_LEVEL_REQUIRED",
            Self::InvalidExperienceLevel => "INVALID_EXPERIENCE_LEVEL",
            Self::SkillsRequired => "SKILLS_REQUIRED",
            Self::SubfieldNotFound => "SUBFIELD_NOT_FOUND",
            Self::CareerExampleNotFound => "CAREER_EXAMPLE_NOT_FOUND",
            Self::NameRequired => "NAME_REQUIRED",
            Self::NameTooShort => "NAME_TOO_SHORT",
            Self::AgeRequired => "AGE_REQUIRED",
            Self::InvalidAge => "INVALID_AGE",
            Self::EducationLevelRequired => "EDUCATION_LEVEL_REQUIRED",
            Self::InvalidEducationLevel => "INVALID_EDUCATION_LEVEL",
            Self::JobRoleRequired => "JOB_ROLE_REQUIRED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem that makes the input unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Input field at fault, by its camelCase name.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
    /// Stable identifier.
    pub code: ErrorCode,
}

/// Advice about the input that does not invalidate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Input field concerned, by its camelCase name.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
    /// What the user could do about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    fn new(field: &str, message: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            suggestion,
        }
    }
}

/// Outcome of validating a selection or form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` exactly when `errors` is empty.
    pub is_valid: bool,
    /// Hard problems, in the order they were found.
    pub errors: Vec<ValidationError>,
    /// Advice, in the order it was found.
    pub warnings: Vec<ValidationWarning>,
}

/// Collects problems while a validation pass runs.
#[derive(Debug, Default)]
pub(crate) struct Report {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl Report {
    pub(crate) fn error(&mut self, field: &str, code: ErrorCode, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
            code,
        });
    }

    pub(crate) fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn finish(self) -> ValidationResult {
        debug!(
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            "validation complete"
        );
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Trims an optional input, treating blank as absent.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Resolves the domain id or records why it could not be resolved.
pub(crate) fn resolve_domain<'a>(
    catalog: &'a Catalog,
    domain_id: Option<&str>,
    report: &mut Report,
) -> Option<&'a Domain> {
    let Some(id) = present(domain_id) else {
        report.error("domainId", ErrorCode::DomainRequired, "Domain is required");
        return None;
    };
    let domain = catalog.domain(id);
    if domain.is_none() {
        report.error(
            "domainId",
            ErrorCode::DomainNotFound,
            format!("Domain '{id}' does not exist"),
        );
    }
    domain
}

/// Parses the experience level or records why it could not be parsed.
pub(crate) fn resolve_level(level: Option<&str>, report: &mut Report) -> Option<ExperienceLevel> {
    let Some(level) = present(level) else {
        report.error(
            "experienceLevel",
            ErrorCode::ExperienceLevelRequired,
            "Experience level is required",
        );
        return None;
    };
    match level.parse() {
        Ok(level) => Some(level),
        Err(error) => {
            report.error(
                "experienceLevel",
                ErrorCode::InvalidExperienceLevel,
                error.to_string(),
            );
            None
        }
    }
}

/// Warns when too few of `skills` appear in the domain's skill pool.
///
/// Returns `None` for an empty skill list, a domain that names no skills, or
/// a well-aligned list.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn skill_alignment_warning(
    domain: &Domain,
    skills: &[String],
    field: &str,
) -> Option<ValidationWarning> {
    let pool = domain.skill_pool();
    if skills.is_empty() || pool.is_empty() {
        return None;
    }

    let matched = domain.matching_skills(skills).len();
    let ratio = matched as f64 / skills.len() as f64;
    let missing: Vec<&str> = pool
        .iter()
        .copied()
        .filter(|known| !skills.iter().any(|skill| overlaps(known, skill)))
        .collect();
    // every pool skill may already be covered by a long, mostly unrelated list
    let examples = (!missing.is_empty()).then(|| join_first(&missing, LISTED_SKILLS));

    if ratio < LOW_ALIGNMENT {
        Some(ValidationWarning::new(
            field,
            format!(
                "Only {:.0}% of your skills match what {} asks for",
                ratio * 100.0,
                domain.name
            ),
            examples.map(|examples| format!("Consider developing skills such as {examples}")),
        ))
    } else if ratio < PARTIAL_ALIGNMENT {
        Some(ValidationWarning::new(
            field,
            format!("Some of your skills do not match what {} asks for", domain.name),
            examples.map(|examples| {
                format!("Adding skills like {examples} would strengthen your profile")
            }),
        ))
    } else {
        None
    }
}

impl Catalog {
    /// Checks a selection for referential consistency and skill alignment.
    ///
    /// A missing or unknown domain skips every check that needs it. The
    /// experience level and the skill list are still checked.
    #[instrument(level = "debug", skip_all, fields(domain = selection.domain_id.as_deref()))]
    pub fn validate_selection(&self, selection: &DomainSelection) -> ValidationResult {
        let mut report = Report::default();

        let domain = resolve_domain(self, selection.domain_id.as_deref(), &mut report);
        let level = resolve_level(selection.experience_level.as_deref(), &mut report);

        let skills = normalize_skills(&selection.selected_skills);
        if skills.is_empty() {
            report.error(
                "selectedSkills",
                ErrorCode::SkillsRequired,
                "At least one skill must be selected",
            );
        }

        let Some(domain) = domain else {
            return report.finish();
        };

        let subfield = present(selection.subfield_id.as_deref()).and_then(|id| {
            let subfield = domain.subfield(id);
            if subfield.is_none() {
                report.error(
                    "subfieldId",
                    ErrorCode::SubfieldNotFound,
                    format!("Subfield '{id}' does not exist in {}", domain.name),
                );
            }
            subfield
        });

        if let Some(id) = present(selection.career_example_id.as_deref()) {
            match domain.career(id) {
                None => report.error(
                    "careerExampleId",
                    ErrorCode::CareerExampleNotFound,
                    format!("Career example '{id}' does not exist in {}", domain.name),
                ),
                Some(career) => {
                    if let Some(subfield) = subfield.filter(|s| s.id != career.subfield_id) {
                        report.warn(ValidationWarning::new(
                            "careerExampleId",
                            format!(
                                "{} belongs to a different subfield than {}",
                                career.title, subfield.name
                            ),
                            Some(
                                "Choose a career example from the selected subfield".to_string(),
                            ),
                        ));
                    }
                }
            }
        }

        if let Some(level) = level {
            warn_on_level(domain, level, &mut report);
        }

        if let Some(warning) = skill_alignment_warning(domain, &skills, "selectedSkills") {
            report.warn(warning);
        }

        if let Some(subfield) = subfield {
            warn_on_subfield_gap(subfield, &skills, &mut report);
        }

        warn_on_goals(domain, &selection.career_goals, &mut report);

        report.finish()
    }
}

fn warn_on_level(domain: &Domain, level: ExperienceLevel, report: &mut Report) {
    if !domain.offers_level(level) {
        report.warn(ValidationWarning::new(
            "experienceLevel",
            format!("{} lists no roles at the {level} level", domain.name),
            Some("Consider a neighbouring experience level".to_string()),
        ));
    }
    if level == ExperienceLevel::Internship && domain.internships.is_empty() {
        report.warn(ValidationWarning::new(
            "experienceLevel",
            format!("{} has no internship opportunities listed", domain.name),
            Some("Look for entry-level roles instead".to_string()),
        ));
    }
}

fn warn_on_subfield_gap(subfield: &Subfield, skills: &[String], report: &mut Report) {
    let missing: Vec<&str> = subfield
        .required_skills
        .iter()
        .map(String::as_str)
        .filter(|required| !skills.iter().any(|skill| overlaps(required, skill)))
        .collect();

    if !missing.is_empty() {
        report.warn(ValidationWarning::new(
            "selectedSkills",
            format!(
                "{} usually requires {}",
                subfield.name,
                join_first(&missing, LISTED_SKILLS)
            ),
            Some("Consider building these skills".to_string()),
        ));
    }
}

fn warn_on_goals(domain: &Domain, goals: &[String], report: &mut Report) {
    let goals: Vec<&str> = goals
        .iter()
        .map(|goal| goal.trim())
        .filter(|goal| !goal.is_empty())
        .collect();

    if goals.is_empty() {
        report.warn(ValidationWarning::new(
            "careerGoals",
            "No career goals given",
            Some("Adding goals helps tailor your pathway".to_string()),
        ));
        return;
    }

    let aligned = goals
        .iter()
        .flat_map(|goal| goal.split(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().count() >= MIN_GOAL_WORD)
        .any(|word| domain.keywords.iter().any(|keyword| overlaps(keyword, word)));

    if !aligned {
        report.warn(ValidationWarning::new(
            "careerGoals",
            format!("Your goals do not mention anything {} covers", domain.name),
            Some("Check that this domain fits what you want to do".to_string()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::fixtures;

    const TECH: &str = "technology-computer-science";

    fn selection(domain: &str, level: &str, skills: &[&str], goals: &[&str]) -> DomainSelection {
        DomainSelection {
            domain_id: Some(domain.to_string()),
            experience_level: Some(level.to_string()),
            selected_skills: skills.iter().copied().map(Skill::from).collect(),
            career_goals: fixtures::strings(goals),
            ..DomainSelection::default()
        }
    }

    fn codes(result: &ValidationResult) -> Vec<ErrorCode> {
        result.errors.iter().map(|error| error.code).collect()
    }

    fn warned(result: &ValidationResult, field: &str) -> usize {
        result
            .warnings
            .iter()
            .filter(|warning| warning.field == field)
            .count()
    }

    #[test]
    fn aligned_selection_is_valid() {
        let catalog = fixtures::catalog();
        let result = catalog.validate_selection(&selection(
            TECH,
            "entry",
            &["JavaScript", "Problem Solving"],
            &["Become a software developer"],
        ));

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unknown_domain_skips_domain_checks() {
        let catalog = fixtures::catalog();
        let mut input = selection("nonexistent-domain", "wizard", &[], &[]);
        input.subfield_id = Some("nowhere".to_string());
        let result = catalog.validate_selection(&input);

        assert!(!result.is_valid);
        assert_eq!(
            codes(&result),
            [
                ErrorCode::DomainNotFound,
                ErrorCode::InvalidExperienceLevel,
                ErrorCode::SkillsRequired
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_domain_still_reports_level_and_skills() {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            domain_id: None,
            ..selection(TECH, "wizard", &[], &[])
        };
        let result = catalog.validate_selection(&input);

        assert_eq!(
            codes(&result),
            [
                ErrorCode::DomainRequired,
                ErrorCode::InvalidExperienceLevel,
                ErrorCode::SkillsRequired
            ]
        );
    }

    #[test_case(None; "absent")]
    #[test_case(Some("  "); "blank")]
    fn missing_domain_is_required(domain: Option<&str>) {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            domain_id: domain.map(str::to_string),
            ..selection(TECH, "entry", &["Git"], &[])
        };
        let result = catalog.validate_selection(&input);
        assert_eq!(codes(&result), [ErrorCode::DomainRequired]);
    }

    #[test]
    fn unrelated_skills_are_flagged() {
        let catalog = fixtures::catalog();
        let result = catalog.validate_selection(&selection(
            TECH,
            "entry",
            &["Cooking", "Dancing"],
            &["Work in tech"],
        ));

        assert!(result.is_valid);
        assert_eq!(warned(&result, "selectedSkills"), 1);
        let warning = &result.warnings[0];
        assert!(warning.message.starts_with("Only 0%"));
        assert_eq!(
            warning.suggestion.as_deref(),
            Some("Consider developing skills such as JavaScript, Python, Git")
        );
        // "tech" overlaps the "technology" keyword
        assert_eq!(warned(&result, "careerGoals"), 0);
    }

    #[test]
    fn domain_without_skills_raises_no_alignment_warning() {
        let mut domain = fixtures::technology();
        domain.subfields.clear();
        domain.career_examples.clear();

        let skills = fixtures::strings(&["Cooking"]);
        assert_eq!(skill_alignment_warning(&domain, &skills, "skills"), None);
    }

    #[test]
    fn covered_pool_leaves_suggestion_empty() {
        let mut domain = fixtures::technology();
        domain.career_examples.clear();
        domain.subfields.truncate(1);
        domain.subfields[0].required_skills = fixtures::strings(&["Python"]);

        // 1 of 4 skills matches, and nothing in the pool is missing
        let skills = fixtures::strings(&["Python", "Cooking", "Dancing", "Singing"]);
        let warning = skill_alignment_warning(&domain, &skills, "skills").unwrap();

        assert!(warning.message.starts_with("Only 25%"));
        assert_eq!(warning.suggestion, None);
    }

    #[test]
    fn partially_aligned_skills_get_softer_warning() {
        let catalog = fixtures::catalog();
        // 1 of 3 skills is a match: above 30%, below 50%
        let result = catalog.validate_selection(&selection(
            TECH,
            "entry",
            &["Python", "Cooking", "Dancing"],
            &["Write software"],
        ));

        let warning = result
            .warnings
            .iter()
            .find(|warning| warning.field == "selectedSkills")
            .unwrap();
        assert!(warning.message.starts_with("Some of your skills"));
    }

    #[test_case(None, ErrorCode::ExperienceLevelRequired; "absent")]
    #[test_case(Some("guru"), ErrorCode::InvalidExperienceLevel; "unknown")]
    fn experience_level_is_checked(level: Option<&str>, expected: ErrorCode) {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            experience_level: level.map(str::to_string),
            ..selection(TECH, "entry", &["Python"], &["software"])
        };
        let result = catalog.validate_selection(&input);
        assert_eq!(codes(&result), [expected]);
    }

    #[test]
    fn experience_level_is_case_insensitive() {
        let catalog = fixtures::catalog();
        let result =
            catalog.validate_selection(&selection(TECH, "Senior", &["Python"], &["software"]));
        assert!(result.is_valid);
    }

    #[test]
    fn skills_are_required() {
        let catalog = fixtures::catalog();
        let result = catalog.validate_selection(&selection(TECH, "entry", &["  "], &["data"]));
        assert_eq!(codes(&result), [ErrorCode::SkillsRequired]);
    }

    #[test]
    fn subfield_and_career_must_exist() {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            subfield_id: Some("astrology".to_string()),
            career_example_id: Some("court-jester".to_string()),
            ..selection(TECH, "entry", &["Python"], &["data"])
        };
        let result = catalog.validate_selection(&input);
        assert_eq!(
            codes(&result),
            [ErrorCode::SubfieldNotFound, ErrorCode::CareerExampleNotFound]
        );
    }

    #[test]
    fn career_outside_subfield_is_a_warning() {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            subfield_id: Some("data-science".to_string()),
            career_example_id: Some("security-analyst".to_string()),
            ..selection(
                TECH,
                "mid",
                &["Python", "Statistics", "Machine Learning", "SQL"],
                &["data"],
            )
        };
        let result = catalog.validate_selection(&input);

        assert!(result.is_valid);
        assert_eq!(warned(&result, "careerExampleId"), 1);
    }

    #[test]
    fn subfield_skill_gap_names_missing_skills() {
        let catalog = fixtures::catalog();
        let input = DomainSelection {
            subfield_id: Some("data-science".to_string()),
            ..selection(TECH, "mid", &["Python"], &["data"])
        };
        let result = catalog.validate_selection(&input);

        assert!(result.warnings.iter().any(|warning| {
            warning.message == "Data Science & Analytics usually requires Statistics, Machine Learning, SQL"
        }));
    }

    #[test]
    fn unsupported_levels_are_warnings() {
        let catalog = fixtures::catalog();
        let result = catalog.validate_selection(&selection(
            "healthcare-medicine",
            "internship",
            &["Patient Care"],
            &["Help patients in a hospital"],
        ));

        assert!(result.is_valid);
        // no internship stage and no internship opportunities
        assert_eq!(warned(&result, "experienceLevel"), 2);
    }

    #[test]
    fn goals_are_encouraged_and_checked() {
        let catalog = fixtures::catalog();

        let none = catalog.validate_selection(&selection(TECH, "entry", &["Python"], &[]));
        assert_eq!(warned(&none, "careerGoals"), 1);

        let off_topic =
            catalog.validate_selection(&selection(TECH, "entry", &["Python"], &["Sail to Fiji"]));
        assert_eq!(warned(&off_topic, "careerGoals"), 1);
    }

    #[test]
    fn skill_records_are_accepted() {
        let catalog = fixtures::catalog();
        let input: DomainSelection = serde_json::from_str(
            r#"{
                "domainId": "technology-computer-science",
                "experienceLevel": "entry",
                "selectedSkills": ["Git", {"id": "js", "name": "JavaScript", "category": "technical"}, {"name": "SQL"}],
                "careerGoals": ["Build web software"]
            }"#,
        )
        .unwrap();

        assert!(catalog.validate_selection(&input).is_valid);
    }

    #[test]
    fn result_serializes_with_stable_codes() {
        let catalog = fixtures::catalog();
        let result = catalog.validate_selection(&selection("nope", "entry", &["Git"], &[]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0]["code"], "DOMAIN_NOT_FOUND");
        assert_eq!(json["errors"][0]["field"], "domainId");
        assert_eq!(ErrorCode::DomainNotFound.to_string(), "DOMAIN_NOT_FOUND");
    }

    #[test]
    fn validate_is_idempotent() {
        let catalog = fixtures::catalog();
        let input = selection(TECH, "entry", &["Cooking", "Dancing"], &["Work in tech"]);
        let first = serde_json::to_string(&catalog.validate_selection(&input)).unwrap();
        let second = serde_json::to_string(&catalog.validate_selection(&input)).unwrap();
        assert_eq!(first, second);
    }
}
