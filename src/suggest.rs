//! Suggestion terms for the browse screen's search box.

use std::collections::HashSet;

use crate::model::Item;

/// Description words at or below this length (after stripping punctuation) are dropped.
const MIN_DESCRIPTION_WORD: usize = 3;
/// Location fragments at or below this length are dropped.
const MIN_LOCATION_PART: usize = 2;
/// Final terms at or below this length are dropped.
const MIN_TERM: usize = 2;

/// Derive the deduplicated suggestion vocabulary from a set of items.
///
/// Titles and categories are taken verbatim; descriptions contribute their
/// longer words and locations their `-`/`,`/whitespace separated fragments.
/// The result is sorted case-insensitively so the dropdown order is stable.
#[must_use]
pub fn extract_terms(items: &[Item]) -> Vec<String> {
    let mut terms: HashSet<String> = HashSet::new();

    for item in items {
        terms.insert(item.title.clone());
        terms.insert(item.category.clone());

        for word in item.description.split_whitespace() {
            let stripped: String = word.chars().filter(char::is_ascii_alphanumeric).collect();
            if stripped.chars().count() > MIN_DESCRIPTION_WORD {
                terms.insert(stripped);
            }
        }

        for part in item
            .location
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        {
            let part = part.trim();
            if part.chars().count() > MIN_LOCATION_PART {
                terms.insert(part.to_string());
            }
        }
    }

    let mut terms: Vec<String> = terms
        .into_iter()
        .filter(|term| term.chars().count() > MIN_TERM)
        .collect();
    terms.sort_by_cached_key(|term| (term.to_lowercase(), term.clone()));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::lost;

    #[test]
    fn test_extracts_titles_categories_words_and_locations() {
        let mut item = lost("1", "Blue Backpack", "2024-01-15");
        item.category = "Bags".to_string();
        item.description = "North Face backpack, with a laptop!".to_string();
        item.location = "Main Library - 2nd Floor".to_string();

        let terms = extract_terms(&[item]);

        assert_eq!(
            terms,
            vec![
                "2nd",
                "backpack",
                "Bags",
                "Blue Backpack",
                "Face",
                "Floor",
                "laptop",
                "Library",
                "Main",
                "North",
                "with",
            ]
        );
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        let mut item = lost("1", "Pen", "2024-01-01");
        item.category = "Other".to_string();
        item.description = "a red pen, lost".to_string();
        item.location = "Lab B, 1F".to_string();

        let terms = extract_terms(&[item]);
        assert_eq!(terms, vec!["Lab", "lost", "Other", "Pen"]);
    }

    #[test]
    fn test_terms_are_deduplicated() {
        let mut first = lost("1", "Keys", "2024-01-01");
        first.category = "Keys".to_string();
        let mut second = lost("2", "Keys", "2024-01-02");
        second.category = "Keys".to_string();

        assert_eq!(extract_terms(&[first, second]), vec!["Keys"]);
    }

    #[test]
    fn test_empty_fields_contribute_nothing() {
        let item = lost("1", "", "2024-01-01");
        assert!(extract_terms(&[item]).is_empty());
    }
}
