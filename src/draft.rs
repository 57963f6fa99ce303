//! Validation for newly reported items.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use thiserror::Error;

use crate::model::{CATEGORIES, Item, ItemStatus};
use crate::session::Session;

pub const MAX_TITLE: usize = 100;
pub const MAX_DESCRIPTION: usize = 500;
pub const MAX_LOCATION: usize = 100;
pub const MAX_NAME: usize = 50;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^<]*(?:<[^<]*)*?</script>").expect("script pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Unknown category \"{0}\"")]
    UnknownCategory(String),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please sign in to report an item")]
    SignedOut,
    #[error("Date must be written as YYYY-MM-DD")]
    InvalidDate,
}

/// Form contents of the "report an item" screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub status: ItemStatus,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub date_reported: Option<NaiveDate>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            status: ItemStatus::Lost,
            title: String::new(),
            category: String::new(),
            description: String::new(),
            location: String::new(),
            date_reported: None,
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
        }
    }
}

impl ItemDraft {
    /// A blank draft with contact details prefilled from the signed-in account.
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        let mut draft = Self::default();
        if let Some(account) = session.account() {
            draft.contact_name.clone_from(&account.name);
            draft.contact_email.clone_from(&account.email);
        }
        draft
    }

    /// Validate the draft and turn it into an item ready to be stored.
    ///
    /// # Errors
    /// Returns the first failing rule.
    pub fn validate(self, session: &Session) -> Result<Item, DraftError> {
        if !session.is_signed_in() {
            return Err(DraftError::SignedOut);
        }

        let title = required("Title", &self.title, MAX_TITLE)?;
        let description = required("Description", &self.description, MAX_DESCRIPTION)?;
        let location = required("Location", &self.location, MAX_LOCATION)?;
        let contact_name = required("Contact name", &self.contact_name, MAX_NAME)?;

        if self.category.is_empty() {
            return Err(DraftError::Missing("Category"));
        }
        if !CATEGORIES.contains(&self.category.as_str()) {
            return Err(DraftError::UnknownCategory(self.category));
        }

        let contact_email = self.contact_email.trim().to_string();
        if contact_email.is_empty() {
            return Err(DraftError::Missing("Contact email"));
        }
        if !EMAIL.is_match(&contact_email) {
            return Err(DraftError::InvalidEmail);
        }

        let phone = sanitize(&self.contact_phone);
        let now = Utc::now();

        Ok(Item {
            id: None,
            title,
            category: self.category,
            description,
            location,
            date_reported: Some(self.date_reported.unwrap_or_else(|| now.date_naive())),
            status: Some(self.status),
            contact_email,
            contact_phone: (!phone.is_empty()).then_some(phone),
            contact_name,
            image: None,
            user_id: session.user_id().map(ToString::to_string),
            created_at: now,
            updated_at: now,
        })
    }
}

fn sanitize(value: &str) -> String {
    SCRIPT_TAG.replace_all(value, "").trim().to_string()
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, DraftError> {
    let value = sanitize(value);
    if value.is_empty() {
        return Err(DraftError::Missing(field));
    }
    if value.chars().count() > max {
        return Err(DraftError::TooLong { field, max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Account, IdentityStrategy};

    fn signed_in() -> Session {
        Session::new(IdentityStrategy::Hosted(Account {
            id: "user_1".to_string(),
            name: "Alex Student".to_string(),
            email: "alex@university.edu".to_string(),
        }))
    }

    fn valid_draft(session: &Session) -> ItemDraft {
        ItemDraft {
            title: "  Blue Backpack ".to_string(),
            category: "Bags".to_string(),
            description: "North Face backpack".to_string(),
            location: "Main Library".to_string(),
            date_reported: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..ItemDraft::for_session(session)
        }
    }

    #[test]
    fn test_valid_draft_becomes_item() {
        let session = signed_in();
        let item = valid_draft(&session).validate(&session).unwrap();

        assert_eq!(item.title, "Blue Backpack");
        assert_eq!(item.status, Some(ItemStatus::Lost));
        assert_eq!(item.contact_name, "Alex Student");
        assert_eq!(item.contact_email, "alex@university.edu");
        assert_eq!(item.contact_phone, None);
        assert_eq!(item.user_id.as_deref(), Some("user_1"));
        assert_eq!(item.date_reported, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_date_defaults_to_today() {
        let session = signed_in();
        let draft = ItemDraft {
            date_reported: None,
            ..valid_draft(&session)
        };
        let item = draft.validate(&session).unwrap();
        assert_eq!(item.date_reported, Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_signed_out_rejected() {
        let signed_out = Session::new(IdentityStrategy::Local);
        let draft = valid_draft(&signed_in());
        assert_eq!(draft.validate(&signed_out), Err(DraftError::SignedOut));
    }

    #[test]
    fn test_required_fields() {
        let session = signed_in();
        let draft = ItemDraft {
            title: "   ".to_string(),
            ..valid_draft(&session)
        };
        assert_eq!(draft.validate(&session), Err(DraftError::Missing("Title")));

        let draft = ItemDraft {
            category: String::new(),
            ..valid_draft(&session)
        };
        assert_eq!(draft.validate(&session), Err(DraftError::Missing("Category")));
    }

    #[test]
    fn test_length_limits() {
        let session = signed_in();
        let draft = ItemDraft {
            title: "x".repeat(MAX_TITLE + 1),
            ..valid_draft(&session)
        };
        assert_eq!(
            draft.validate(&session),
            Err(DraftError::TooLong {
                field: "Title",
                max: MAX_TITLE
            })
        );
    }

    #[test]
    fn test_email_and_category_rules() {
        let session = signed_in();
        let draft = ItemDraft {
            contact_email: "not-an-email".to_string(),
            ..valid_draft(&session)
        };
        assert_eq!(draft.validate(&session), Err(DraftError::InvalidEmail));

        let draft = ItemDraft {
            category: "Pets".to_string(),
            ..valid_draft(&session)
        };
        assert_eq!(
            draft.validate(&session),
            Err(DraftError::UnknownCategory("Pets".to_string()))
        );
    }

    #[test]
    fn test_phone_is_free_text_and_optional() {
        let session = signed_in();
        let draft = ItemDraft {
            contact_phone: " (555) 123-4567 ".to_string(),
            ..valid_draft(&session)
        };
        let item = draft.validate(&session).unwrap();
        assert_eq!(item.contact_phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_script_tags_are_stripped() {
        let session = signed_in();
        let draft = ItemDraft {
            description: "Red scarf<script>alert('x')</script>".to_string(),
            ..valid_draft(&session)
        };
        let item = draft.validate(&session).unwrap();
        assert_eq!(item.description, "Red scarf");
    }
}
