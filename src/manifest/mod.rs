//! Borrow manifest generation
//!
//! Turns the committed lines of a checkout into a deterministic, grouped
//! tabular document for hand-off and signature. Layout decisions (sorting,
//! category grouping, label placement, pagination, name truncation) are
//! computed once in [`layout`]; the two file encodings in [`render`] share
//! that layout and differ only in serialization.

pub mod layout;
pub mod render;

use chrono::{DateTime, Utc};

use crate::models::enums::Category;

pub use layout::{lay_out, Layout, LayoutRow, Page};
pub use render::{render_pages, render_table, PAGES_EXTENSION, TABLE_EXTENSION};

/// Rows of the grouped table that fit on one page of the paginated encoding
pub const ROWS_PER_PAGE: usize = 18;

/// Item names longer than this are truncated with an ellipsis
pub const NAME_WIDTH: usize = 32;

/// Blank inspection columns reserved for manual check-marks
pub const CHECK_COLUMNS: [&str; 3] = ["Pre-departure", "Mid-trip", "Post-return"];

/// Signature lines rendered in the footer
pub const SIGNATURES: [&str; 3] = ["Equipment custodian", "Event lead", "Supervisor"];

/// One line of a finalized borrow list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    pub item_id: i32,
    pub name: String,
    pub category: Category,
    pub quantity: i32,
}

/// A finalized borrow list ready for rendering
#[derive(Debug, Clone)]
pub struct Manifest {
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub lines: Vec<ManifestLine>,
}

impl Manifest {
    /// Download filename embedding the generation date
    pub fn filename(&self, extension: &str) -> String {
        format!("manifest_{}.{}", self.generated_at.format("%Y-%m-%d"), extension)
    }
}
