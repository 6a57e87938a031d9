//! Data models for Gearhouse

pub mod cart;
pub mod enums;
pub mod item;
pub mod record;

// Re-export commonly used types
pub use cart::{Cart, CartLine};
pub use enums::{Category, ItemState, Role, StatusSeverity};
pub use item::{Item, ItemStatus, ItemWithStatus};
pub use record::{BorrowRecord, BorrowRecordDetails, CheckoutSummary, CommittedLine};
