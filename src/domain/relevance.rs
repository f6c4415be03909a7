//! Textual relevance of a titled, keyworded entry against a free-text query.

/// Score given to every entry when no query is supplied.
pub const NEUTRAL_SCORE: f64 = 0.5;

const EXACT_TITLE: f64 = 1.0;
const TITLE_CONTAINS_QUERY: f64 = 0.8;
const QUERY_CONTAINS_TITLE: f64 = 0.6;
const EXACT_KEYWORD: f64 = 0.7;
const PARTIAL_KEYWORD: f64 = 0.3;

/// Scores how well `title` and `keywords` match `query`, in `[0, 1]`.
///
/// The title contributes at most one of its bands (exact, title contains
/// query, query contains title). Every keyword then adds its own bonus, so a
/// title hit plus several keyword hits saturates at `1.0` after clamping.
///
/// A blank query yields [`NEUTRAL_SCORE`].
///
/// ```
/// use pathway::domain::relevance::score;
///
/// let keywords = ["machine learning", "statistics"];
/// assert_eq!(score("Data Scientist", &keywords, "data scientist"), 1.0);
/// assert_eq!(score("Data Scientist", &keywords, ""), 0.5);
/// assert_eq!(score("Data Scientist", &keywords, "nurse"), 0.0);
/// ```
#[must_use]
pub fn score<S: AsRef<str>>(title: &str, keywords: &[S], query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return NEUTRAL_SCORE;
    }

    let title = title.to_lowercase();
    let mut total = if title == query {
        EXACT_TITLE
    } else if title.contains(&query) {
        TITLE_CONTAINS_QUERY
    } else if query.contains(&title) {
        QUERY_CONTAINS_TITLE
    } else {
        0.0
    };

    for keyword in keywords {
        let keyword = keyword.as_ref().to_lowercase();
        if keyword == query {
            total += EXACT_KEYWORD;
        } else if keyword.contains(&query) || query.contains(&keyword) {
            total += PARTIAL_KEYWORD;
        }
    }

    total.clamp(0.0, 1.0)
}

/// The keywords that equal or overlap `query`, in their original order.
///
/// Empty when the query is blank.
#[must_use]
pub fn matched_keywords<'a>(keywords: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| super::matching::overlaps(keyword, query))
        .collect()
}
