//! Ranks whole domains against a user's skills, interests and career stage.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{
    Catalog,
    matching::{any_overlap, join_first, overlaps},
    taxonomy::{CareerExample, Demand, Domain, ExperienceLevel, Subfield},
};

/// Recommendations at or below this score are discarded.
pub const MIN_MATCH_SCORE: f64 = 0.3;

/// Maximum number of learning-path steps per recommendation.
pub const MAX_LEARNING_STEPS: usize = 5;

const SKILL_WEIGHT: f64 = 0.4;
const INTEREST_WEIGHT: f64 = 0.3;
const EXPERIENCE_WEIGHT: f64 = 0.2;
const DEMAND_WEIGHT: f64 = 0.1;

/// Growth rate, in percent, above which growth is called out as a reason.
const STRONG_GROWTH: f64 = 15.0;

const REASON_SKILLS: usize = 3;
const REASON_INTERESTS: usize = 2;
const AGGREGATE_SKILLS: usize = 3;

/// A domain scored against a user profile, with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecommendation<'a> {
    /// The recommended domain.
    pub domain: &'a Domain,
    /// Overall fit, in `[0, 1]`.
    pub match_score: f64,
    /// Human-readable justifications, strongest signal first.
    pub match_reasons: Vec<String>,
    /// Subfields touching the user's skills or interests.
    pub recommended_subfields: Vec<&'a Subfield>,
    /// Careers at the requested level or touching the user's skills or
    /// interests.
    pub recommended_careers: Vec<&'a CareerExample>,
    /// Suggested next steps, at most [`MAX_LEARNING_STEPS`].
    pub learning_path: Vec<String>,
}

/// A weighted average over the factors that were actually evaluated.
#[derive(Debug, Default, Clone, Copy)]
struct WeightedScore {
    total: f64,
    weights: f64,
}

impl WeightedScore {
    /// Adds a factor with a value in `[0, 1]`.
    fn add(&mut self, weight: f64, value: f64) {
        self.total += weight * value;
        self.weights += weight;
    }

    fn finish(self) -> f64 {
        if self.weights > 0.0 {
            self.total / self.weights
        } else {
            0.0
        }
    }
}

impl Catalog {
    /// Recommends domains for a user, best match first.
    ///
    /// Only domains scoring above [`MIN_MATCH_SCORE`] are returned. Equal
    /// scores keep curated order. Blank skills and interests are ignored.
    #[instrument(level = "debug", skip_all, fields(skills = skills.len(), interests = interests.len(), %level))]
    pub fn recommend<'a>(
        &'a self,
        skills: &[String],
        interests: &[String],
        level: ExperienceLevel,
    ) -> Vec<DomainRecommendation<'a>> {
        let profile = Profile::new(skills, interests, level);

        let mut recommendations: Vec<DomainRecommendation<'a>> = self
            .domains()
            .par_iter()
            .map(|domain| profile.assess(domain))
            .filter(|recommendation| recommendation.match_score > MIN_MATCH_SCORE)
            .collect();
        recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        debug!(recommendations = recommendations.len(), "recommendation complete");
        recommendations
    }
}

#[derive(Debug)]
struct Profile<'p> {
    skills: Vec<&'p str>,
    interests: Vec<&'p str>,
    level: ExperienceLevel,
}

impl<'p> Profile<'p> {
    fn new(skills: &'p [String], interests: &'p [String], level: ExperienceLevel) -> Self {
        let clean = |items: &'p [String]| -> Vec<&'p str> {
            items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .collect()
        };
        Self {
            skills: clean(skills),
            interests: clean(interests),
            level,
        }
    }

    fn assess<'a>(&self, domain: &'a Domain) -> DomainRecommendation<'a> {
        let pool = domain.skill_pool();
        let matched_skills: Vec<&str> = self
            .skills
            .iter()
            .copied()
            .filter(|skill| pool.iter().any(|known| overlaps(known, skill)))
            .collect();
        let matched_interests: Vec<&str> = self
            .interests
            .iter()
            .copied()
            .filter(|interest| {
                domain
                    .keywords
                    .iter()
                    .any(|keyword| overlaps(keyword, interest))
            })
            .collect();

        let mut score = WeightedScore::default();
        score.add(
            SKILL_WEIGHT,
            fraction(matched_skills.len(), self.skills.len()),
        );
        score.add(
            INTEREST_WEIGHT,
            fraction(matched_interests.len(), self.interests.len()),
        );
        score.add(
            EXPERIENCE_WEIGHT,
            if domain.offers_level(self.level) {
                1.0
            } else {
                0.0
            },
        );
        score.add(DEMAND_WEIGHT, demand_value(domain.industry_trends.demand));

        DomainRecommendation {
            domain,
            match_score: score.finish(),
            match_reasons: self.reasons(domain, &matched_skills, &matched_interests),
            recommended_subfields: self.subfields(domain),
            recommended_careers: self.careers(domain),
            learning_path: self.learning_path(domain, &pool),
        }
    }

    fn reasons(
        &self,
        domain: &Domain,
        matched_skills: &[&str],
        matched_interests: &[&str],
    ) -> Vec<String> {
        let mut reasons = Vec::new();
        let trends = &domain.industry_trends;

        if !matched_skills.is_empty() {
            reasons.push(format!(
                "Your skills in {} align with this field",
                join_first(matched_skills, REASON_SKILLS)
            ));
        }
        if !matched_interests.is_empty() {
            reasons.push(format!(
                "Matches your interests in {}",
                join_first(matched_interests, REASON_INTERESTS)
            ));
        }
        if trends.demand == Demand::High {
            reasons.push("High market demand for professionals in this field".to_string());
        }
        if trends.growth_rate > STRONG_GROWTH {
            reasons.push(format!(
                "Strong industry growth of {}%",
                trends.growth_rate
            ));
        }
        if domain.has_career_at(self.level) {
            reasons.push(format!("Good opportunities at the {} level", self.level));
        }

        reasons
    }

    fn subfields<'a>(&self, domain: &'a Domain) -> Vec<&'a Subfield> {
        domain
            .subfields
            .iter()
            .filter(|subfield| {
                any_overlap(self.skills.iter().copied(), as_strs(&subfield.required_skills))
                    || any_overlap(self.interests.iter().copied(), as_strs(&subfield.keywords))
            })
            .collect()
    }

    fn careers<'a>(&self, domain: &'a Domain) -> Vec<&'a CareerExample> {
        domain
            .career_examples
            .iter()
            .filter(|career| {
                career.experience_level == self.level
                    || any_overlap(
                        self.skills.iter().copied(),
                        career.skills().map(String::as_str),
                    )
                    || any_overlap(self.interests.iter().copied(), as_strs(&career.keywords))
            })
            .collect()
    }

    fn learning_path(&self, domain: &Domain, pool: &[&str]) -> Vec<String> {
        let mut steps = Vec::new();

        if let Some(info) = domain.level_info(self.level) {
            steps.extend(
                info.required_skills
                    .iter()
                    .filter(|skill| !self.has_skill(skill))
                    .map(|skill| format!("Learn {skill}")),
            );
        }

        let missing: Vec<&str> = pool
            .iter()
            .copied()
            .filter(|skill| !self.has_skill(skill))
            .collect();
        if !missing.is_empty() {
            steps.push(format!(
                "Develop skills in {}",
                join_first(&missing, AGGREGATE_SKILLS)
            ));
        }

        if self.level.is_early_career() {
            steps.push(format!(
                "Build a portfolio showcasing your {} projects",
                domain.name
            ));
            steps.push(
                "Gain hands-on experience through internships or entry-level roles".to_string(),
            );
        }

        steps.truncate(MAX_LEARNING_STEPS);
        steps
    }

    fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|own| overlaps(own, skill))
    }
}

fn as_strs(items: &[String]) -> impl Iterator<Item = &str> + Clone {
    items.iter().map(String::as_str)
}

#[allow(clippy::cast_precision_loss)]
fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

const fn demand_value(demand: Demand) -> f64 {
    match demand {
        Demand::High => 1.0,
        Demand::Medium => 0.5,
        Demand::Low => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{self, strings};

    const TOLERANCE: f64 = 1e-9;

    fn data_profile(catalog: &Catalog) -> Vec<DomainRecommendation<'_>> {
        catalog.recommend(
            &strings(&["Python", "SQL", "Machine Learning"]),
            &strings(&["data", "programming"]),
            ExperienceLevel::Entry,
        )
    }

    #[test]
    fn ranks_domains_by_fit() {
        let catalog = fixtures::catalog();
        let recommendations = data_profile(&catalog);

        let ids: Vec<&str> = recommendations
            .iter()
            .map(|recommendation| recommendation.domain.id.as_str())
            .collect();
        assert_eq!(ids, ["technology-computer-science", "healthcare-medicine"]);

        assert!((recommendations[0].match_score - 1.0).abs() < TOLERANCE);
        // 0.4 * 2/3 + 0.3 * 1/2 + 0.2 + 0.1
        let expected = 0.4 * 2.0 / 3.0 + 0.15 + 0.2 + 0.1;
        assert!((recommendations[1].match_score - expected).abs() < TOLERANCE);
    }

    #[test]
    fn results_are_sorted_and_above_threshold() {
        let catalog = fixtures::catalog();
        let profiles = [
            (strings(&["Figma", "Typography"]), strings(&["design"])),
            (strings(&["Communication"]), strings(&["marketing", "health"])),
            (strings(&["SQL"]), strings(&[])),
        ];

        for (skills, interests) in &profiles {
            for level in ExperienceLevel::ALL {
                let recommendations = catalog.recommend(skills, interests, level);
                assert!(
                    recommendations
                        .iter()
                        .all(|recommendation| recommendation.match_score > MIN_MATCH_SCORE)
                );
                assert!(
                    recommendations
                        .windows(2)
                        .all(|pair| pair[0].match_score >= pair[1].match_score)
                );
            }
        }
    }

    #[test]
    fn reasons_follow_a_fixed_order() {
        let catalog = fixtures::catalog();
        let recommendations = data_profile(&catalog);

        assert_eq!(
            recommendations[0].match_reasons,
            [
                "Your skills in Python, SQL, Machine Learning align with this field",
                "Matches your interests in data, programming",
                "High market demand for professionals in this field",
                "Strong industry growth of 22%",
                "Good opportunities at the entry level",
            ]
        );
        assert_eq!(
            recommendations[1].match_reasons,
            [
                "Your skills in Python, SQL align with this field",
                "Matches your interests in data",
                "High market demand for professionals in this field",
                "Strong industry growth of 16%",
                "Good opportunities at the entry level",
            ]
        );
    }

    #[test]
    fn recommends_touching_subfields_and_careers() {
        let catalog = fixtures::catalog();
        let recommendations = data_profile(&catalog);
        let tech = &recommendations[0];

        let subfields: Vec<&str> = tech
            .recommended_subfields
            .iter()
            .map(|subfield| subfield.id.as_str())
            .collect();
        assert_eq!(subfields, ["software-development", "data-science"]);

        let careers: Vec<&str> = tech
            .recommended_careers
            .iter()
            .map(|career| career.id.as_str())
            .collect();
        assert_eq!(
            careers,
            [
                "junior-software-developer",
                "data-analyst",
                "machine-learning-engineer"
            ]
        );
    }

    #[test]
    fn early_career_learning_path() {
        let catalog = fixtures::catalog();
        let recommendations = data_profile(&catalog);

        assert_eq!(
            recommendations[0].learning_path,
            [
                "Learn Programming Fundamentals",
                "Learn Version Control",
                "Learn Debugging",
                "Develop skills in JavaScript, Git, Problem Solving",
                "Build a portfolio showcasing your Technology & Computer Science projects",
            ]
        );
    }

    #[test]
    fn senior_learning_path_skips_portfolio_steps() {
        let catalog = fixtures::catalog();
        let recommendations = catalog.recommend(
            &strings(&["Python", "SQL", "Machine Learning"]),
            &strings(&["data", "programming"]),
            ExperienceLevel::Senior,
        );
        let tech = &recommendations[0];

        assert_eq!(
            tech.learning_path,
            [
                "Learn Architecture",
                "Learn Mentoring",
                "Develop skills in JavaScript, Git, Problem Solving",
            ]
        );
        assert!(
            tech.match_reasons
                .contains(&"Good opportunities at the senior level".to_string())
        );
    }

    #[test]
    fn unrelated_profile_gets_nothing() {
        let catalog = fixtures::catalog();
        let recommendations = catalog.recommend(
            &strings(&["Cooking"]),
            &strings(&["Dancing"]),
            ExperienceLevel::Executive,
        );
        assert!(recommendations.is_empty());
    }

    #[test]
    fn blank_entries_are_ignored() {
        let catalog = fixtures::catalog();
        let clean = catalog.recommend(&strings(&["Python"]), &[], ExperienceLevel::Mid);
        let padded = catalog.recommend(
            &strings(&["Python", "   ", ""]),
            &strings(&[" "]),
            ExperienceLevel::Mid,
        );
        assert_eq!(clean, padded);
    }

    #[test]
    fn score_divides_by_applied_weights() {
        let mut score = WeightedScore::default();
        assert!(score.finish().abs() < TOLERANCE);

        score.add(SKILL_WEIGHT, 1.0);
        assert!((score.finish() - 1.0).abs() < TOLERANCE);

        score.add(DEMAND_WEIGHT, 0.0);
        assert!((score.finish() - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn recommend_is_idempotent() {
        let catalog = fixtures::catalog();
        let first = serde_json::to_string(&data_profile(&catalog)).unwrap();
        let second = serde_json::to_string(&data_profile(&catalog)).unwrap();
        assert_eq!(first, second);
    }
}
