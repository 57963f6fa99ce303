//! Lost & found item records.
//!
//! Items are stored as camelCase JSON documents. Every text field is optional
//! on the wire and deserializes to an empty string when absent, so a sparse or
//! hand-edited document never fails to load.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const CATEGORIES: &[&str] = &[
    "Electronics",
    "Bags",
    "Keys",
    "Personal Items",
    "Clothing",
    "Books",
    "Sports Equipment",
    "Jewelry",
    "Other",
];

pub const LOCATIONS: &[&str] = &[
    "Main Library",
    "Student Union Building",
    "Recreation Center",
    "Science Building",
    "Engineering Building",
    "Dining Hall",
    "Campus Grounds",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl ItemStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lost => "Lost",
            Self::Found => "Found",
        }
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Lost => Self::Found,
            Self::Found => Self::Lost,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single lost or found report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, with = "report_date")]
    pub date_reported: Option<NaiveDate>,
    /// `None` when the stored status is missing or unrecognised.
    #[serde(default, with = "lenient_status")]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.status == Some(ItemStatus::Lost)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.status.map_or("Unknown", ItemStatus::label)
    }

    #[must_use]
    pub fn date_label(&self) -> String {
        self.date_reported
            .map_or_else(|| "—".to_string(), |date| date.format("%Y-%m-%d").to_string())
    }
}

/// Parse a report date written either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
#[must_use]
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

mod report_date {
    use super::{Deserialize, Deserializer, NaiveDate, Serializer, Value, parse_report_date};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(Value::as_str).and_then(parse_report_date))
    }
}

mod lenient_status {
    use super::{Deserialize, Deserializer, ItemStatus, Serialize, Serializer, Value};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(status: &Option<ItemStatus>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        status.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ItemStatus>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(
            match value.as_ref().and_then(Value::as_str).map(str::trim) {
                Some(s) if s.eq_ignore_ascii_case("lost") => Some(ItemStatus::Lost),
                Some(s) if s.eq_ignore_ascii_case("found") => Some(ItemStatus::Found),
                _ => None,
            },
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a lost item with the given title, reported on `date` (`YYYY-MM-DD`).
    pub fn lost(id: &str, title: &str, date: &str) -> Item {
        item(id, title, date, ItemStatus::Lost)
    }

    pub fn found(id: &str, title: &str, date: &str) -> Item {
        item(id, title, date, ItemStatus::Found)
    }

    pub fn item(id: &str, title: &str, date: &str, status: ItemStatus) -> Item {
        let now = Utc::now();
        Item {
            id: Some(id.to_string()),
            title: title.to_string(),
            category: String::new(),
            description: String::new(),
            location: String::new(),
            date_reported: parse_report_date(date),
            status: Some(status),
            contact_email: String::new(),
            contact_phone: None,
            contact_name: String::new(),
            image: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "id": "abc",
            "title": "Blue Backpack",
            "category": "Bags",
            "description": "North Face backpack with laptop compartment",
            "location": "Main Library - 2nd Floor",
            "dateReported": "2024-01-15",
            "status": "lost",
            "contactEmail": "student@university.edu",
            "contactPhone": "(555) 123-4567",
            "contactName": "Alex"
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id(), "abc");
        assert_eq!(item.status, Some(ItemStatus::Lost));
        assert_eq!(item.date_reported, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(item.contact_phone.as_deref(), Some("(555) 123-4567"));
        assert!(item.is_lost());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let item: Item = serde_json::from_str(r#"{"title": "Keys"}"#).unwrap();
        assert_eq!(item.title, "Keys");
        assert!(item.description.is_empty());
        assert!(item.location.is_empty());
        assert_eq!(item.status, None);
        assert_eq!(item.date_reported, None);
        assert!(!item.is_lost());
    }

    #[test]
    fn test_lenient_status_and_date() {
        let item: Item =
            serde_json::from_str(r#"{"status": "LOST", "dateReported": 12}"#).unwrap();
        assert_eq!(item.status, Some(ItemStatus::Lost));
        assert_eq!(item.date_reported, None);

        let item: Item = serde_json::from_str(r#"{"status": "stolen"}"#).unwrap();
        assert_eq!(item.status, None);
    }

    #[test]
    fn test_parse_report_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 8);
        assert_eq!(parse_report_date("2024-01-08"), expected);
        assert_eq!(parse_report_date("2024-01-08T10:30:00Z"), expected);
        assert_eq!(parse_report_date(" 2024-01-08 "), expected);
        assert_eq!(parse_report_date("last tuesday"), None);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let item = fixtures::lost("1", "Umbrella", "2024-02-01");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["dateReported"], "2024-02-01");
        assert_eq!(value["status"], "lost");
        assert!(value.get("contactPhone").is_none());
    }
}
