//! Browse filters, sort orders and listing statistics.

use std::cmp::Ordering;

use crate::model::{Item, ItemStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Lost,
    Found,
}

impl StatusFilter {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Lost,
            Self::Lost => Self::Found,
            Self::Found => Self::All,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Items",
            Self::Lost => "Lost Items",
            Self::Found => "Found Items",
        }
    }

    fn admits(self, status: Option<ItemStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Lost => status == Some(ItemStatus::Lost),
            Self::Found => status == Some(ItemStatus::Found),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
}

impl SortOrder {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::Alphabetical,
            Self::Alphabetical => Self::Newest,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
            Self::Alphabetical => "A-Z",
        }
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            // Undated reports go last in both date orders.
            Self::Newest => match (a.date_reported, b.date_reported) {
                (Some(a), Some(b)) => b.cmp(&a),
                (a, b) => b.is_some().cmp(&a.is_some()),
            },
            Self::Oldest => match (a.date_reported, b.date_reported) {
                (Some(a), Some(b)) => a.cmp(&b),
                (a, b) => b.is_some().cmp(&a.is_some()),
            },
            Self::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

/// The browse screen's filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseFilter {
    pub query: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: StatusFilter,
    pub sort: SortOrder,
}

impl BrowseFilter {
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || item.title.to_lowercase().contains(&query)
            || item.description.to_lowercase().contains(&query)
            || item.location.to_lowercase().contains(&query);

        let matches_category = self
            .category
            .as_ref()
            .is_none_or(|category| &item.category == category);

        let matches_location = self.location.as_ref().is_none_or(|location| {
            item.location
                .to_lowercase()
                .contains(&location.to_lowercase())
        });

        matches_query && matches_category && matches_location && self.status.admits(item.status)
    }

    /// Filter and sort `items`.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        let mut visible: Vec<&Item> = items.iter().filter(|item| self.matches(item)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }

    /// Whether any filter beyond the default is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self.category.is_some()
            || self.location.is_some()
            || self.status != StatusFilter::All
    }
}

/// Cycle through `None` followed by each of `options`.
#[must_use]
pub fn cycle_option(current: Option<&str>, options: &[&str]) -> Option<String> {
    let next = match current {
        None => options.first(),
        Some(value) => options
            .iter()
            .position(|option| *option == value)
            .and_then(|i| options.get(i + 1)),
    };
    next.map(ToString::to_string)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub lost: usize,
    pub found: usize,
}

impl Stats {
    #[must_use]
    pub fn from_items(items: &[Item]) -> Self {
        items.iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.status {
                Some(ItemStatus::Lost) => stats.lost += 1,
                Some(ItemStatus::Found) => stats.found += 1,
                None => {}
            }
            stats
        })
    }
}

/// The `n` most recently created items.
#[must_use]
pub fn recent(items: &[Item], n: usize) -> Vec<&Item> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::model::fixtures::{found, lost};

    fn sample() -> Vec<Item> {
        let mut backpack = lost("1", "Blue Backpack", "2024-01-15");
        backpack.category = "Bags".to_string();
        backpack.location = "Main Library - 2nd Floor".to_string();

        let mut iphone = found("2", "iPhone 13", "2024-01-14");
        iphone.category = "Electronics".to_string();
        iphone.location = "Student Union Building".to_string();
        iphone.description = "Black iPhone with cracked screen".to_string();

        let mut keys = lost("3", "Car Keys", "2024-01-16");
        keys.category = "Keys".to_string();
        keys.location = "Recreation Center".to_string();

        vec![backpack, iphone, keys]
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_default_filter_sorts_newest_first() {
        let items = sample();
        assert_eq!(ids(&BrowseFilter::default().apply(&items)), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_query_searches_title_description_location() {
        let items = sample();
        let filter = BrowseFilter {
            query: "cracked".to_string(),
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), vec!["2"]);

        let filter = BrowseFilter {
            query: "library".to_string(),
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), vec!["1"]);
    }

    #[test]
    fn test_category_location_and_status() {
        let items = sample();

        let filter = BrowseFilter {
            category: Some("Keys".to_string()),
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), vec!["3"]);

        let filter = BrowseFilter {
            location: Some("Student Union Building".to_string()),
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), vec!["2"]);

        let filter = BrowseFilter {
            status: StatusFilter::Lost,
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), vec!["3", "1"]);
    }

    #[test]
    fn test_sort_orders() {
        let mut items = sample();
        items.push(lost("4", "apple pencil", "someday"));

        let oldest = BrowseFilter {
            sort: SortOrder::Oldest,
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&oldest.apply(&items)), vec!["2", "1", "3", "4"]);

        let newest = BrowseFilter::default();
        assert_eq!(ids(&newest.apply(&items)), vec!["3", "1", "2", "4"]);

        let alphabetical = BrowseFilter {
            sort: SortOrder::Alphabetical,
            ..BrowseFilter::default()
        };
        assert_eq!(ids(&alphabetical.apply(&items)), vec!["4", "1", "3", "2"]);
    }

    #[test]
    fn test_cycles() {
        assert_eq!(StatusFilter::All.next().next().next(), StatusFilter::All);
        assert_eq!(SortOrder::Newest.next(), SortOrder::Oldest);

        let options = ["Bags", "Keys"];
        assert_eq!(cycle_option(None, &options).as_deref(), Some("Bags"));
        assert_eq!(cycle_option(Some("Bags"), &options).as_deref(), Some("Keys"));
        assert_eq!(cycle_option(Some("Keys"), &options), None);
        assert_eq!(cycle_option(Some("Unknown"), &options), None);
    }

    #[test]
    fn test_stats() {
        let mut items = sample();
        items.push(serde_json::from_str(r#"{"title": "Mystery"}"#).unwrap());
        assert_eq!(
            Stats::from_items(&items),
            Stats {
                total: 4,
                lost: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_recent() {
        let mut items = sample();
        let now = Utc::now();
        items[0].created_at = now - Duration::hours(3);
        items[1].created_at = now - Duration::hours(1);
        items[2].created_at = now - Duration::hours(2);

        assert_eq!(ids(&recent(&items, 2)), vec!["2", "3"]);
        assert_eq!(recent(&items, 10).len(), 3);
    }

    #[test]
    fn test_is_active() {
        assert!(!BrowseFilter::default().is_active());
        let filter = BrowseFilter {
            status: StatusFilter::Found,
            ..BrowseFilter::default()
        };
        assert!(filter.is_active());
    }
}
