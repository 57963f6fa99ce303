//! Type-ahead ranking.
//!
//! This module encapsulates the search box's matching and ordering logic: one
//! pass over the candidate set that filters by case-insensitive substring,
//! orders by match quality and caps the result. The same contract serves
//! plain suggestion terms and whole item records; the candidate type picks
//! the [`Mode`].

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::model::Item;

/// The two candidate shapes the ranking engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Free-text suggestion strings.
    Term,
    /// Structured item records, restricted to lost items.
    Record,
}

impl Mode {
    /// Maximum number of ranked results.
    #[must_use]
    pub const fn limit(self) -> usize {
        match self {
            Self::Term => 8,
            Self::Record => 6,
        }
    }

    /// Shortest trimmed query (in characters) that produces any result.
    #[must_use]
    pub const fn min_query_chars(self) -> usize {
        match self {
            Self::Term => 1,
            Self::Record => 2,
        }
    }
}

/// A trimmed, case-folded query.
///
/// The typed query keeps its case for display; only this folded copy is
/// used for comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    folded: String,
}

impl Needle {
    /// Returns `None` when the trimmed query is too short for `mode`.
    #[must_use]
    pub fn new(query: &str, mode: Mode) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() || trimmed.chars().count() < mode.min_query_chars() {
            return None;
        }
        Some(Self {
            folded: trimmed.to_lowercase(),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive containment.
    #[must_use]
    pub fn found_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }

    /// Case-insensitive prefix test.
    #[must_use]
    pub fn prefixes(&self, text: &str) -> bool {
        text.to_lowercase().starts_with(&self.folded)
    }
}

/// Something the search box can rank.
pub trait Candidate: Clone {
    const MODE: Mode;

    /// Ordering key; smaller sorts first.
    type Key: Ord;

    /// Text shown in the dropdown and written back into the input on commit.
    fn primary_text(&self) -> &str;

    /// Returns the ordering key, or `None` when the candidate does not match.
    fn rank_key(&self, needle: &Needle) -> Option<Self::Key>;
}

impl Candidate for String {
    const MODE: Mode = Mode::Term;

    /// `(not a prefix match, folded term)`
    type Key = (bool, String);

    fn primary_text(&self) -> &str {
        self
    }

    fn rank_key(&self, needle: &Needle) -> Option<Self::Key> {
        let folded = self.to_lowercase();
        if !folded.contains(needle.as_str()) {
            return None;
        }
        Some((!folded.starts_with(needle.as_str()), folded))
    }
}

impl Candidate for Item {
    const MODE: Mode = Mode::Record;

    /// `(title not a prefix match, title not matched, newest first)`
    type Key = (bool, bool, Reverse<Option<NaiveDate>>);

    fn primary_text(&self) -> &str {
        &self.title
    }

    fn rank_key(&self, needle: &Needle) -> Option<Self::Key> {
        if !self.is_lost() {
            return None;
        }

        let in_title = needle.found_in(&self.title);
        let in_other = needle.found_in(&self.description)
            || needle.found_in(&self.category)
            || needle.found_in(&self.location);
        if !in_title && !in_other {
            return None;
        }

        Some((
            !needle.prefixes(&self.title),
            !in_title,
            Reverse(self.date_reported),
        ))
    }
}

/// Rank `candidates` against `query`.
///
/// Matching candidates are fully ordered before the result is capped to
/// [`Mode::limit`], so a strong match late in the collection is never dropped
/// in favour of a weak one that happens to come first. The sort is stable:
/// candidates with equal keys keep their collection order.
#[must_use]
pub fn rank<C: Candidate>(query: &str, candidates: &[C]) -> Vec<C> {
    let Some(needle) = Needle::new(query, C::MODE) else {
        return Vec::new();
    };

    let mut matches: Vec<(C::Key, &C)> = candidates
        .iter()
        .filter_map(|candidate| candidate.rank_key(&needle).map(|key| (key, candidate)))
        .collect();
    matches.sort_by(|(a, _), (b, _)| a.cmp(b));

    matches
        .into_iter()
        .take(C::MODE.limit())
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{found, lost};

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_prefix_then_alphabetical() {
        let candidates = terms(&["iPhone 13", "iPad", "Backpack"]);
        assert_eq!(rank("iP", &candidates), terms(&["iPad", "iPhone 13"]));
    }

    #[test]
    fn test_prefix_beats_collection_order() {
        let candidates = terms(&["Campus Grounds", "Ground Floor", "Underground"]);
        let ranked = rank("ground", &candidates);
        assert_eq!(ranked, terms(&["Ground Floor", "Campus Grounds", "Underground"]));
    }

    #[test]
    fn test_empty_term_query() {
        let candidates = terms(&["Keys", "Wallet"]);
        assert!(rank("", &candidates).is_empty());
        assert!(rank("   ", &candidates).is_empty());
    }

    #[test]
    fn test_single_character_term_query_matches() {
        let candidates = terms(&["Keys", "Wallet", "Jacket"]);
        assert_eq!(rank(" k ", &candidates), terms(&["Keys", "Jacket"]));
    }

    #[test]
    fn test_term_cap_applied_after_sorting() {
        let mut candidates: Vec<String> = (0..20).map(|i| format!("old bag {i:02}")).collect();
        candidates.push("bag of holding".to_string());

        let ranked = rank("bag", &candidates);
        assert_eq!(ranked.len(), Mode::Term.limit());
        assert_eq!(ranked[0], "bag of holding");
    }

    #[test]
    fn test_records_require_two_characters() {
        let items = vec![lost("1", "Keys", "2024-01-01")];
        assert!(rank("", &items).is_empty());
        assert!(rank("k", &items).is_empty());
        assert!(rank(" k ", &items).is_empty());
        assert_eq!(rank("ke", &items).len(), 1);
    }

    #[test]
    fn test_records_most_recent_first() {
        let items = vec![
            lost("1", "Blue Backpack", "2024-01-10"),
            lost("2", "Blue Jacket", "2024-01-12"),
        ];
        assert_eq!(titles(&rank("blue", &items)), vec!["Blue Jacket", "Blue Backpack"]);
    }

    #[test]
    fn test_found_records_excluded() {
        let mut with_keys = lost("1", "Ring", "2024-01-01");
        with_keys.description = "Silver ring on my Keys".to_string();
        let items = vec![with_keys, found("2", "Keys", "2024-01-05")];

        let ranked = rank("keys", &items);
        assert_eq!(titles(&ranked), vec!["Ring"]);
    }

    #[test]
    fn test_title_match_outranks_other_fields() {
        let mut in_location = lost("1", "Wallet", "2024-03-01");
        in_location.location = "Library steps".to_string();
        let in_title = lost("2", "Library card", "2024-01-01");
        let mut title_contains = lost("3", "Old library book", "2024-02-01");
        title_contains.category = "Books".to_string();

        let ranked = rank("library", &[in_location, title_contains, in_title]);
        assert_eq!(
            titles(&ranked),
            vec!["Library card", "Old library book", "Wallet"]
        );
    }

    #[test]
    fn test_undated_records_sort_last() {
        let items = vec![
            lost("1", "Charger", "unknown"),
            lost("2", "Charger cable", "2023-12-01"),
        ];
        assert_eq!(titles(&rank("charger", &items)), vec!["Charger cable", "Charger"]);
    }

    #[test]
    fn test_record_cap() {
        let items: Vec<Item> = (1..=10)
            .map(|day| lost(&day.to_string(), "Water bottle", &format!("2024-05-{day:02}")))
            .collect();

        let ranked = rank("bottle", &items);
        assert_eq!(ranked.len(), Mode::Record.limit());
        assert_eq!(ranked[0].id(), "10");
    }

    #[test]
    fn test_rank_is_idempotent() {
        let candidates = terms(&["Bags", "Backpack", "Laptop bag", "bag"]);
        assert_eq!(rank("bag", &candidates), rank("bag", &candidates));
    }

    #[test]
    fn test_needle_folds_case_and_trims() {
        let needle = Needle::new("  HeLLo ", Mode::Term).unwrap();
        assert_eq!(needle.as_str(), "hello");
        assert!(needle.found_in("say Hello there"));
        assert!(needle.prefixes("HELLO world"));
        assert!(!needle.prefixes("oh hello"));
    }
}
