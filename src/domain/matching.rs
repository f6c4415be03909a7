// Case-insensitive substring helpers shared by the search, recommendation and
// validation passes. Matching is plain containment: no stemming,
// no fuzzy or phonetic comparison.

use std::collections::HashSet;

/// Whether `haystack` contains `needle`, ignoring case.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether either string contains the other, ignoring case.
///
/// Blank strings never overlap anything.
pub fn overlaps(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Whether any term overlaps any candidate.
pub fn any_overlap<'a, 'b, T, C>(terms: T, candidates: C) -> bool
where
    T: IntoIterator<Item = &'a str>,
    C: IntoIterator<Item = &'b str> + Clone,
{
    terms.into_iter().any(|term| {
        candidates
            .clone()
            .into_iter()
            .any(|candidate| overlaps(term, candidate))
    })
}

/// Removes case-insensitive duplicates, keeping the first spelling seen.
pub fn dedup_case_insensitive<'a, I>(items: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Joins at most `limit` items with `", "`.
pub fn join_first(items: &[&str], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Machine Learning", "learning", true; "needle inside haystack")]
    #[test_case("learning", "Machine Learning", true; "haystack inside needle")]
    #[test_case("Rust", "RUST", true; "case only")]
    #[test_case("Cooking", "Python", false; "unrelated")]
    #[test_case("", "Python", false; "blank left")]
    #[test_case("Python", "   ", false; "blank right")]
    fn overlap(a: &str, b: &str, expected: bool) {
        assert_eq!(overlaps(a, b), expected);
    }

    #[test]
    fn contains_is_one_directional() {
        assert!(contains_ci("Data Science", "science"));
        assert!(!contains_ci("science", "Data Science"));
    }

    #[test]
    fn dedup_keeps_first_spelling() {
        let items = dedup_case_insensitive(["SQL", "Python", "sql", "python", "Go"]);
        assert_eq!(items, vec!["SQL", "Python", "Go"]);
    }

    #[test]
    fn any_overlap_checks_every_pair() {
        let candidates = ["Statistics", "Python"];
        assert!(any_overlap(["python"], candidates));
        assert!(!any_overlap(["painting", "singing"], candidates));
    }

    #[test]
    fn join_first_truncates() {
        assert_eq!(join_first(&["a", "b", "c", "d"], 3), "a, b, c");
        assert_eq!(join_first(&[], 3), "");
    }
}
