//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Equipment category codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum Category {
    Camera = 0,
    Audio = 1,
    Lighting = 2,
    Tools = 3,
    Kitchen = 4,
    Outdoor = 5,
    Other = 6,
}

impl From<i16> for Category {
    fn from(v: i16) -> Self {
        match v {
            0 => Category::Camera,
            1 => Category::Audio,
            2 => Category::Lighting,
            3 => Category::Tools,
            4 => Category::Kitchen,
            5 => Category::Outdoor,
            _ => Category::Other,
        }
    }
}

impl From<Category> for i16 {
    fn from(c: Category) -> Self {
        c as i16
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Camera => "Camera",
            Category::Audio => "Audio",
            Category::Lighting => "Lighting",
            Category::Tools => "Tools",
            Category::Kitchen => "Kitchen",
            Category::Outdoor => "Outdoor",
            Category::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ItemState
// ---------------------------------------------------------------------------

/// Manual item state, overriding quantity-derived availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum ItemState {
    Normal = 0,
    UnderRepair = 1,
    Retired = 2,
}

impl From<i16> for ItemState {
    fn from(v: i16) -> Self {
        match v {
            1 => ItemState::UnderRepair,
            2 => ItemState::Retired,
            _ => ItemState::Normal,
        }
    }
}

impl From<ItemState> for i16 {
    fn from(s: ItemState) -> Self {
        s as i16
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemState::Normal => "Normal",
            ItemState::UnderRepair => "Under repair",
            ItemState::Retired => "Retired",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// StatusSeverity
// ---------------------------------------------------------------------------

/// Severity of a computed availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusSeverity {
    Ok,
    Warning,
    Critical,
    Neutral,
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Capability level granted by the shared secret used at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Member => "member",
            Role::Admin => "admin",
        };
        write!(f, "{}", label)
    }
}
