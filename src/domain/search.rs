//! Filtered, relevance-ranked search across every entry in a [`Catalog`].
//!
//! Domains, subfields, career examples and internships are each tested
//! against the filters on their own: a subfield can match while its domain
//! does not, and the other way round. Survivors are merged into one list and
//! ranked by [`relevance::score`].

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    Catalog,
    matching::{any_overlap, contains_ci, dedup_case_insensitive},
    relevance,
    taxonomy::{
        CareerExample, Domain, ExperienceLevel, InternshipOpportunity, SalaryRange, Subfield,
        WorkEnvironment,
    },
};

/// Result count below which query suggestions are generated.
pub const SUGGESTION_THRESHOLD: usize = 5;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Suggested when nothing in the catalog resembles the query.
pub const POPULAR_SEARCHES: [&str; MAX_SUGGESTIONS] = [
    "Software Developer",
    "Data Scientist",
    "Product Manager",
    "UX Designer",
    "Marketing Manager",
];

/// Relevance given to entries that matched the query only through
/// descriptive text (descriptions, skills, job roles, learning outcomes).
///
/// It sits below the weakest title or keyword hit, so such entries rank last
/// but never score zero.
pub const TEXT_MATCH_FLOOR: f64 = 0.1;

/// Filters for [`Catalog::search`]. Every field is optional; an empty list
/// or `None` means the filter is not applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Free text, matched case-insensitively as a substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Only entries belonging to these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_ids: Vec<String>,
    /// Only subfields with these ids, and careers/internships within them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subfield_ids: Vec<String>,
    /// Only career examples at one of these levels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub experience_levels: Vec<ExperienceLevel>,
    /// Only career examples whose pay band lies entirely within this range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
    /// Only career examples offering every flag set here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_environment: Option<WorkEnvironment>,
    /// Only subfields, careers and internships asking for at least one of
    /// these skills.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    /// Only entries with at least one overlapping keyword.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl SearchFilters {
    /// Filters with just a free-text query.
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// The kind of catalog entry a [`SearchResult`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// A [`Domain`].
    Domain,
    /// A [`Subfield`].
    Subfield,
    /// A [`CareerExample`].
    Career,
    /// An [`InternshipOpportunity`].
    Internship,
}

/// One ranked match, borrowing from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    /// What kind of entry matched.
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Id of the entry.
    pub id: &'a str,
    /// Name or title of the entry.
    pub title: &'a str,
    /// Description of the entry.
    pub description: &'a str,
    /// Textual relevance to the query, in `[0, 1]`.
    pub relevance_score: f64,
    /// The entry's keywords that overlap the query.
    pub matched_keywords: Vec<&'a str>,
    /// Owning domain, for everything but domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_domain: Option<&'a str>,
    /// Owning subfield, for careers and internships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_subfield: Option<&'a str>,
}

/// The outcome of a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<'a> {
    /// Matches, most relevant first.
    pub results: Vec<SearchResult<'a>>,
    /// Number of matches.
    pub total_count: usize,
    /// The filters that produced these results.
    pub filters: SearchFilters,
    /// Alternative search terms, offered when results are sparse.
    pub suggestions: Vec<String>,
}

impl Catalog {
    /// Searches every domain, subfield, career example and internship.
    ///
    /// Results are sorted by descending relevance; ties keep discovery order
    /// (each domain, then its subfields, careers and internships). Finding
    /// nothing is not an error.
    #[instrument(level = "debug", skip_all, fields(query = filters.query.as_deref()))]
    pub fn search(&self, filters: &SearchFilters) -> SearchResponse<'_> {
        let criteria = Criteria::new(filters);

        let mut results: Vec<SearchResult<'_>> = self
            .domains()
            .par_iter()
            .flat_map_iter(|domain| criteria.matches_in(domain))
            .collect();
        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        let suggestions = match &criteria.query {
            Some(query) if results.len() < SUGGESTION_THRESHOLD => self.suggestions(query),
            _ => Vec::new(),
        };

        debug!(
            results = results.len(),
            suggestions = suggestions.len(),
            "search complete"
        );

        SearchResponse {
            total_count: results.len(),
            results,
            filters: filters.clone(),
            suggestions,
        }
    }

    /// Names, keywords and job roles that contain `query` without being it,
    /// or the popular searches if there are none.
    fn suggestions(&self, query: &str) -> Vec<String> {
        let terms = self.domains().iter().flat_map(|domain| {
            let subfield_terms = domain.subfields.iter().flat_map(|subfield| {
                std::iter::once(&subfield.name)
                    .chain(&subfield.keywords)
                    .chain(&subfield.job_roles)
            });
            std::iter::once(&domain.name)
                .chain(&domain.keywords)
                .chain(subfield_terms)
        });

        let candidates = terms
            .map(String::as_str)
            .filter(|term| contains_ci(term, query) && !term.eq_ignore_ascii_case(query));

        let suggestions: Vec<String> = dedup_case_insensitive(candidates)
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect();

        if suggestions.is_empty() {
            POPULAR_SEARCHES.iter().map(ToString::to_string).collect()
        } else {
            suggestions
        }
    }
}

/// Filters normalised once per search.
#[derive(Debug)]
struct Criteria<'f> {
    query: Option<String>,
    domain_ids: &'f [String],
    subfield_ids: &'f [String],
    levels: &'f [ExperienceLevel],
    salary: Option<&'f SalaryRange>,
    environment: Option<&'f WorkEnvironment>,
    skills: &'f [String],
    keywords: &'f [String],
}

impl<'f> Criteria<'f> {
    fn new(filters: &'f SearchFilters) -> Self {
        let query = filters
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);

        Self {
            query,
            domain_ids: &filters.domain_ids,
            subfield_ids: &filters.subfield_ids,
            levels: &filters.experience_levels,
            salary: filters.salary_range.as_ref(),
            environment: filters.work_environment.as_ref(),
            skills: &filters.skills,
            keywords: &filters.keywords,
        }
    }

    fn matches_in<'a>(&self, domain: &'a Domain) -> Vec<SearchResult<'a>> {
        let mut found = Vec::new();

        if self.domain_matches(domain) {
            found.push(self.result(
                ResultKind::Domain,
                &domain.id,
                &domain.name,
                &domain.description,
                &domain.keywords,
                None,
                None,
            ));
        }

        for subfield in &domain.subfields {
            if self.subfield_matches(domain, subfield) {
                found.push(self.result(
                    ResultKind::Subfield,
                    &subfield.id,
                    &subfield.name,
                    &subfield.description,
                    &subfield.keywords,
                    Some(&domain.id),
                    None,
                ));
            }
        }

        for career in &domain.career_examples {
            if self.career_matches(domain, career) {
                found.push(self.result(
                    ResultKind::Career,
                    &career.id,
                    &career.title,
                    &career.description,
                    &career.keywords,
                    Some(&domain.id),
                    Some(&career.subfield_id),
                ));
            }
        }

        for internship in &domain.internships {
            if self.internship_matches(domain, internship) {
                found.push(self.result(
                    ResultKind::Internship,
                    &internship.id,
                    &internship.title,
                    &internship.description,
                    &internship.keywords,
                    Some(&domain.id),
                    Some(&internship.subfield_id),
                ));
            }
        }

        found
    }

    fn domain_matches(&self, domain: &Domain) -> bool {
        self.allows_domain(&domain.id)
            && self.text_matches(
                [&domain.name, &domain.description]
                    .into_iter()
                    .chain(&domain.keywords),
            )
            && self.keywords_match(&domain.keywords)
    }

    fn subfield_matches(&self, domain: &Domain, subfield: &Subfield) -> bool {
        self.allows_domain(&domain.id)
            && self.allows_subfield(&subfield.id)
            && self.text_matches(
                [&subfield.name, &subfield.description]
                    .into_iter()
                    .chain(&subfield.keywords)
                    .chain(&subfield.job_roles),
            )
            && self.keywords_match(&subfield.keywords)
            && self.skills_match(&subfield.required_skills)
    }

    fn career_matches(&self, domain: &Domain, career: &CareerExample) -> bool {
        let level_ok = self.levels.is_empty() || self.levels.contains(&career.experience_level);
        let salary_ok = self
            .salary
            .is_none_or(|bounds| bounds.contains(&career.salary_range));
        let environment_ok = self
            .environment
            .is_none_or(|wanted| wanted.satisfied_by(&career.work_environment));
        let skills: Vec<&String> = career.skills().collect();

        self.allows_domain(&domain.id)
            && self.allows_subfield(&career.subfield_id)
            && level_ok
            && salary_ok
            && environment_ok
            && self.text_matches(
                [&career.title, &career.description]
                    .into_iter()
                    .chain(&career.keywords)
                    .chain(skills.iter().copied()),
            )
            && self.keywords_match(&career.keywords)
            && self.skills_match(skills.iter().copied())
    }

    fn internship_matches(&self, domain: &Domain, internship: &InternshipOpportunity) -> bool {
        self.allows_domain(&domain.id)
            && self.allows_subfield(&internship.subfield_id)
            && self.text_matches(
                [&internship.title, &internship.description]
                    .into_iter()
                    .chain(&internship.keywords)
                    .chain(&internship.learning_outcomes)
                    .chain(&internship.required_skills),
            )
            && self.keywords_match(&internship.keywords)
            && self.skills_match(&internship.required_skills)
    }

    fn allows_domain(&self, id: &str) -> bool {
        self.domain_ids.is_empty() || self.domain_ids.iter().any(|allowed| allowed == id)
    }

    fn allows_subfield(&self, id: &str) -> bool {
        self.subfield_ids.is_empty() || self.subfield_ids.iter().any(|allowed| allowed == id)
    }

    fn text_matches<'s>(&self, parts: impl IntoIterator<Item = &'s String>) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let haystack = parts
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        haystack.contains(query.as_str())
    }

    fn keywords_match(&self, keywords: &[String]) -> bool {
        self.keywords.is_empty()
            || any_overlap(
                self.keywords.iter().map(String::as_str),
                keywords.iter().map(String::as_str),
            )
    }

    fn skills_match<'s>(&self, skills: impl IntoIterator<Item = &'s String>) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        let skills: Vec<&str> = skills.into_iter().map(String::as_str).collect();
        any_overlap(
            self.skills.iter().map(String::as_str),
            skills.iter().copied(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn result<'a>(
        &self,
        kind: ResultKind,
        id: &'a str,
        title: &'a str,
        description: &'a str,
        keywords: &'a [String],
        parent_domain: Option<&'a str>,
        parent_subfield: Option<&'a str>,
    ) -> SearchResult<'a> {
        let query = self.query.as_deref().unwrap_or_default();
        let mut relevance_score = relevance::score(title, keywords, query);
        if self.query.is_some() && relevance_score <= 0.0 {
            relevance_score = TEXT_MATCH_FLOOR;
        }

        SearchResult {
            kind,
            id,
            title,
            description,
            relevance_score,
            matched_keywords: relevance::matched_keywords(keywords, query),
            parent_domain,
            parent_subfield,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::fixtures::{self, strings};

    fn ids_of_kind<'a>(response: &SearchResponse<'a>, kind: ResultKind) -> Vec<&'a str> {
        response
            .results
            .iter()
            .filter(|result| result.kind == kind)
            .map(|result| result.id)
            .collect()
    }

    #[test]
    fn domain_id_filter_yields_that_domain_once() {
        let catalog = fixtures::catalog();
        for domain in catalog.domains() {
            let filters = SearchFilters {
                domain_ids: vec![domain.id.clone()],
                ..SearchFilters::default()
            };
            let response = catalog.search(&filters);

            assert_eq!(
                ids_of_kind(&response, ResultKind::Domain),
                vec![domain.id.as_str()]
            );
            assert!(
                response
                    .results
                    .iter()
                    .filter(|result| result.kind != ResultKind::Domain)
                    .all(|result| result.parent_domain == Some(domain.id.as_str()))
            );
        }
    }

    #[test_case("developer"; "job title")]
    #[test_case("data"; "keyword")]
    #[test_case("penetration tester"; "job role only")]
    #[test_case("patients"; "description only")]
    #[test_case("Figma"; "skill only")]
    fn every_queried_result_scores_above_zero(query: &str) {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query(query));

        assert!(!response.results.is_empty());
        assert!(
            response
                .results
                .iter()
                .all(|result| result.relevance_score > 0.0 && result.relevance_score <= 1.0)
        );
    }

    #[test]
    fn unknown_query_falls_back_to_popular_searches() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("nonexistentcareerxyz"));

        assert!(response.results.is_empty());
        assert_eq!(response.total_count, 0);
        assert_eq!(response.suggestions, POPULAR_SEARCHES);
    }

    #[test]
    fn sparse_results_suggest_related_terms() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("nurs"));

        assert!(response.results.len() < SUGGESTION_THRESHOLD);
        assert!(!response.suggestions.is_empty());
        assert!(response.suggestions.len() <= MAX_SUGGESTIONS);
        assert!(
            response
                .suggestions
                .iter()
                .all(|term| term.to_lowercase().contains("nurs"))
        );
        assert!(response.suggestions.contains(&"Registered Nurse".to_string()));

        let mut lowered: Vec<String> = response
            .suggestions
            .iter()
            .map(|term| term.to_lowercase())
            .collect();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), response.suggestions.len());
    }

    #[test]
    fn exact_terms_are_not_suggested() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("nursing"));
        assert!(
            response
                .suggestions
                .iter()
                .all(|term| !term.eq_ignore_ascii_case("nursing"))
        );
    }

    #[test]
    fn plentiful_results_carry_no_suggestions() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("data"));
        assert!(response.results.len() >= SUGGESTION_THRESHOLD);
        assert!(response.suggestions.is_empty());

        let unfiltered = catalog.search(&SearchFilters::default());
        assert!(unfiltered.suggestions.is_empty());
    }

    #[test]
    fn results_are_ranked_by_relevance() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("data"));

        assert!(
            response
                .results
                .windows(2)
                .all(|pair| pair[0].relevance_score >= pair[1].relevance_score)
        );
        assert_eq!(response.total_count, response.results.len());
    }

    #[test]
    fn ties_keep_discovery_order() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::default());
        let tech = catalog.domain("technology-computer-science").unwrap();

        let expected: Vec<&str> = std::iter::once(tech.id.as_str())
            .chain(tech.subfields.iter().map(|s| s.id.as_str()))
            .chain(tech.career_examples.iter().map(|c| c.id.as_str()))
            .chain(tech.internships.iter().map(|i| i.id.as_str()))
            .collect();
        let actual: Vec<&str> = response
            .results
            .iter()
            .take(expected.len())
            .map(|result| result.id)
            .collect();

        assert_eq!(actual, expected);
        assert!(
            response
                .results
                .iter()
                .all(|result| (result.relevance_score - relevance::NEUTRAL_SCORE).abs() < 1e-9)
        );
        assert_eq!(
            response.results[expected.len()].id,
            catalog.domains()[1].id.as_str()
        );
    }

    #[test]
    fn experience_levels_only_constrain_careers() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            experience_levels: vec![ExperienceLevel::Entry],
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);

        let careers = ids_of_kind(&response, ResultKind::Career);
        assert!(!careers.is_empty());
        for id in careers {
            let career = catalog
                .domains()
                .iter()
                .find_map(|domain| domain.career(id))
                .unwrap();
            assert_eq!(career.experience_level, ExperienceLevel::Entry);
        }
        assert!(!ids_of_kind(&response, ResultKind::Internship).is_empty());
        assert_eq!(
            ids_of_kind(&response, ResultKind::Domain).len(),
            catalog.len()
        );
    }

    #[test]
    fn salary_range_must_contain_career_band() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            salary_range: Some(SalaryRange::new(50_000, 90_000)),
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);
        let careers = ids_of_kind(&response, ResultKind::Career);

        assert!(careers.contains(&"junior-software-developer"));
        assert!(careers.contains(&"registered-nurse"));
        // 45k floor sits below the requested minimum
        assert!(!careers.contains(&"marketing-coordinator"));
        assert!(!careers.contains(&"senior-software-engineer"));

        // stipends are far below the band but internships ignore salary
        let internships = ids_of_kind(&response, ResultKind::Internship);
        assert!(internships.contains(&"software-engineering-intern"));
        assert!(internships.contains(&"design-intern"));
    }

    #[test]
    fn requested_work_environment_is_required() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            work_environment: Some(WorkEnvironment {
                remote: true,
                ..WorkEnvironment::default()
            }),
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);
        let careers = ids_of_kind(&response, ResultKind::Career);

        assert!(careers.contains(&"machine-learning-engineer"));
        assert!(!careers.contains(&"security-analyst"));
        assert!(!careers.contains(&"registered-nurse"));

        let internships = ids_of_kind(&response, ResultKind::Internship);
        assert!(internships.contains(&"software-engineering-intern"));
        assert!(internships.contains(&"marketing-intern"));
    }

    #[test]
    fn keyword_filter_uses_substring_overlap() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            keywords: strings(&["Security"]),
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);

        assert!(ids_of_kind(&response, ResultKind::Domain).is_empty());
        assert_eq!(
            ids_of_kind(&response, ResultKind::Subfield),
            vec!["cybersecurity"]
        );
        assert_eq!(
            ids_of_kind(&response, ResultKind::Career),
            vec!["security-analyst"]
        );
    }

    #[test]
    fn subfield_filter_narrows_children() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            subfield_ids: strings(&["data-science"]),
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);

        assert_eq!(
            ids_of_kind(&response, ResultKind::Subfield),
            vec!["data-science"]
        );
        assert!(
            response
                .results
                .iter()
                .filter(|result| matches!(result.kind, ResultKind::Career | ResultKind::Internship))
                .all(|result| result.parent_subfield == Some("data-science"))
        );
        // domains are not narrowed by subfield ids
        assert_eq!(
            ids_of_kind(&response, ResultKind::Domain).len(),
            catalog.len()
        );
    }

    #[test]
    fn skills_filter_applies_below_domain_level() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            skills: strings(&["figma"]),
            ..SearchFilters::default()
        };
        let response = catalog.search(&filters);

        assert_eq!(ids_of_kind(&response, ResultKind::Subfield), vec!["ux-design"]);
        assert_eq!(ids_of_kind(&response, ResultKind::Career), vec!["ux-designer"]);
        assert_eq!(
            ids_of_kind(&response, ResultKind::Internship),
            vec!["design-intern"]
        );
        assert_eq!(
            ids_of_kind(&response, ResultKind::Domain).len(),
            catalog.len()
        );
    }

    #[test]
    fn results_describe_their_parents_and_keywords() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("data"));

        let analyst = response
            .results
            .iter()
            .find(|result| result.id == "data-analyst")
            .unwrap();
        assert_eq!(analyst.kind, ResultKind::Career);
        assert_eq!(analyst.parent_domain, Some("technology-computer-science"));
        assert_eq!(analyst.parent_subfield, Some("data-science"));
        assert_eq!(analyst.matched_keywords, vec!["data"]);
    }

    #[test]
    fn text_only_matches_rank_below_title_matches() {
        let catalog = fixtures::catalog();
        let response = catalog.search(&SearchFilters::query("penetration tester"));

        let cyber = response
            .results
            .iter()
            .find(|result| result.id == "cybersecurity")
            .unwrap();
        assert!((cyber.relevance_score - TEXT_MATCH_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn search_is_idempotent() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            query: Some("engineer".to_string()),
            experience_levels: vec![ExperienceLevel::Mid, ExperienceLevel::Senior],
            ..SearchFilters::default()
        };

        let first = serde_json::to_string(&catalog.search(&filters)).unwrap();
        let second = serde_json::to_string(&catalog.search(&filters)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn response_serializes_with_wire_names() {
        let catalog = fixtures::catalog();
        let filters = SearchFilters {
            domain_ids: strings(&["healthcare-medicine"]),
            ..SearchFilters::default()
        };
        let json = serde_json::to_value(catalog.search(&filters)).unwrap();

        assert_eq!(json["results"][0]["type"], "domain");
        assert_eq!(json["results"][0]["relevanceScore"], 0.5);
        assert_eq!(json["filters"]["domainIds"][0], "healthcare-medicine");
        assert!(json["filters"].get("query").is_none());
        assert!(json["totalCount"].as_u64().unwrap() > 0);
    }
}
