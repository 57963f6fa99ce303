//! Sample reports for a fresh board.

use chrono::Utc;
use tracing::info;

use crate::model::{Item, ItemStatus, parse_report_date};
use crate::store::{ItemStore, StoreError};

struct Sample {
    title: &'static str,
    category: &'static str,
    description: &'static str,
    location: &'static str,
    date: &'static str,
    status: ItemStatus,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "iPhone 13 Pro - Blue",
        category: "Electronics",
        description: "Lost my blue iPhone 13 Pro in the library study area on the 3rd floor. Has a clear case with university stickers.",
        location: "Main Library - 3rd Floor",
        date: "2024-01-15",
        status: ItemStatus::Lost,
        name: "John Doe",
        email: "john.doe@university.edu",
        phone: "+91 98765 43210",
    },
    Sample {
        title: "Black North Face Backpack",
        category: "Bags",
        description: "Black North Face backpack with laptop compartment. Contains textbooks and a water bottle.",
        location: "Student Union Building",
        date: "2024-01-14",
        status: ItemStatus::Lost,
        name: "Sarah Smith",
        email: "sarah.smith@university.edu",
        phone: "+91 87654 32109",
    },
    Sample {
        title: "Silver Car Keys - Honda",
        category: "Keys",
        description: "Honda car keys with blue keychain that says 'Class of 2024'. Lost somewhere near the gym.",
        location: "Recreation Center",
        date: "2024-01-13",
        status: ItemStatus::Lost,
        name: "Mike Wilson",
        email: "mike.wilson@university.edu",
        phone: "+91 76543 21098",
    },
    Sample {
        title: "Red Water Bottle - Hydro Flask",
        category: "Personal Items",
        description: "Red Hydro Flask water bottle with university logo sticker. Left in chemistry lab.",
        location: "Science Building - Lab 201",
        date: "2024-01-12",
        status: ItemStatus::Found,
        name: "Lab Assistant",
        email: "lab.assistant@university.edu",
        phone: "+91 65432 10987",
    },
    Sample {
        title: "MacBook Air 13-inch",
        category: "Electronics",
        description: "Silver MacBook Air with various programming stickers. Found in engineering building computer lab.",
        location: "Engineering Building - Room 105",
        date: "2024-01-11",
        status: ItemStatus::Found,
        name: "Security Team",
        email: "security@university.edu",
        phone: "+91 54321 09876",
    },
];

impl Sample {
    fn to_item(&self) -> Item {
        let now = Utc::now();
        Item {
            id: None,
            title: self.title.to_string(),
            category: self.category.to_string(),
            description: self.description.to_string(),
            location: self.location.to_string(),
            date_reported: parse_report_date(self.date),
            status: Some(self.status),
            contact_email: self.email.to_string(),
            contact_phone: Some(self.phone.to_string()),
            contact_name: self.name.to_string(),
            image: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Write the sample reports through `store` unless it already holds items.
///
/// Returns how many reports were created.
pub async fn seed_if_empty(store: &dyn ItemStore) -> Result<usize, StoreError> {
    if !store.load_all().await?.is_empty() {
        info!("Item store already has reports, skipping samples");
        return Ok(0);
    }
    for sample in SAMPLES {
        store.create(sample.to_item()).await?;
    }
    info!(count = SAMPLES.len(), "Seeded sample reports");
    Ok(SAMPLES.len())
}
