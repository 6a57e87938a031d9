//! Equipment item model and availability status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{Category, ItemState, StatusSeverity};

/// Equipment item record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    /// Item name / description
    pub name: String,
    /// Category code (0=camera, 1=audio, 2=lighting, 3=tools, 4=kitchen, 5=outdoor, 6=other)
    pub category: i16,
    /// Free-text storage location
    pub location: Option<String>,
    /// Number of units owned
    pub total_quantity: i32,
    /// Number of units currently out
    pub borrowed_quantity: i32,
    /// Manual state (0=normal, 1=under repair, 2=retired)
    pub state: i16,
    /// Public URL of the item photo, if any
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Human-facing availability status derived from the quantity pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemStatus {
    pub label: String,
    pub severity: StatusSeverity,
}

impl Item {
    pub fn category(&self) -> Category {
        Category::from(self.category)
    }

    pub fn state(&self) -> ItemState {
        ItemState::from(self.state)
    }

    /// Units still available for borrowing. Never negative.
    pub fn available(&self) -> i32 {
        (self.total_quantity - self.borrowed_quantity).max(0)
    }

    /// Whether the cart may accept this item at all
    pub fn borrowable(&self) -> bool {
        self.state() == ItemState::Normal && self.available() > 0
    }

    /// Derive the displayed status. Pure function of (state, total, borrowed);
    /// a manual state always wins over the quantity math.
    pub fn status(&self) -> ItemStatus {
        match self.state() {
            ItemState::UnderRepair => ItemStatus {
                label: "Under repair".to_string(),
                severity: StatusSeverity::Neutral,
            },
            ItemState::Retired => ItemStatus {
                label: "Retired".to_string(),
                severity: StatusSeverity::Neutral,
            },
            ItemState::Normal => {
                let available = self.available();
                if available <= 0 {
                    ItemStatus {
                        label: "Out of stock".to_string(),
                        severity: StatusSeverity::Critical,
                    }
                } else if self.borrowed_quantity > 0 {
                    ItemStatus {
                        label: format!("{} of {} available", available, self.total_quantity),
                        severity: StatusSeverity::Warning,
                    }
                } else {
                    ItemStatus {
                        label: "In stock".to_string(),
                        severity: StatusSeverity::Ok,
                    }
                }
            }
        }
    }
}

/// Item together with its computed status, for list/detail responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemWithStatus {
    #[serde(flatten)]
    pub item: Item,
    pub available_quantity: i32,
    pub status: ItemStatus,
}

impl From<Item> for ItemWithStatus {
    fn from(item: Item) -> Self {
        let available_quantity = item.available();
        let status = item.status();
        Self {
            item,
            available_quantity,
            status,
        }
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    /// Category code
    pub category: i16,
    pub location: Option<String>,
    #[validate(range(min = 1, message = "total_quantity must be at least 1"))]
    pub total_quantity: i32,
}

/// Update item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: Option<String>,
    pub category: Option<i16>,
    pub location: Option<String>,
    #[validate(range(min = 1, message = "total_quantity must be at least 1"))]
    pub total_quantity: Option<i32>,
    pub state: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(total: i32, borrowed: i32, state: ItemState) -> Item {
        Item {
            id: 1,
            name: "Cordless drill".to_string(),
            category: Category::Tools as i16,
            location: None,
            total_quantity: total,
            borrowed_quantity: borrowed,
            state: state as i16,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn status_fully_in_stock() {
        let s = item(5, 0, ItemState::Normal).status();
        assert_eq!(s.severity, StatusSeverity::Ok);
        assert_eq!(s.label, "In stock");
    }

    #[test]
    fn status_partially_available_includes_remaining() {
        let s = item(5, 3, ItemState::Normal).status();
        assert_eq!(s.severity, StatusSeverity::Warning);
        assert_eq!(s.label, "2 of 5 available");
    }

    #[test]
    fn status_out_of_stock() {
        let s = item(5, 5, ItemState::Normal).status();
        assert_eq!(s.severity, StatusSeverity::Critical);
        assert_eq!(s.label, "Out of stock");
    }

    #[test]
    fn manual_state_wins_over_quantity_math() {
        let s = item(5, 0, ItemState::UnderRepair).status();
        assert_eq!(s.severity, StatusSeverity::Neutral);
        assert_eq!(s.label, "Under repair");

        let s = item(5, 5, ItemState::Retired).status();
        assert_eq!(s.severity, StatusSeverity::Neutral);
        assert_eq!(s.label, "Retired");
    }

    #[test]
    fn status_is_deterministic() {
        let a = item(4, 2, ItemState::Normal).status();
        let b = item(4, 2, ItemState::Normal).status();
        assert_eq!(a, b);
    }

    #[test]
    fn under_repair_with_stock_is_not_borrowable() {
        assert!(!item(5, 0, ItemState::UnderRepair).borrowable());
        assert!(!item(5, 5, ItemState::Normal).borrowable());
        assert!(item(5, 4, ItemState::Normal).borrowable());
    }

    #[test]
    fn available_never_negative() {
        assert_eq!(item(5, 7, ItemState::Normal).available(), 0);
    }
}
