//! Manifest table layout
//!
//! Sorting, grouping and pagination for the borrow manifest. The output is
//! encoding-independent: each row knows whether it opens or closes a
//! category run and whether it carries the run's label.

use super::{ManifestLine, NAME_WIDTH, ROWS_PER_PAGE};

/// One laid-out table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    /// Category label; present only on the midpoint row of a run
    pub label: Option<String>,
    /// Run boundary borders
    pub top_border: bool,
    pub bottom_border: bool,
    pub item_id: i32,
    /// Item name, already truncated to the display width
    pub name: String,
    pub quantity: i32,
}

/// One page of laid-out rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<LayoutRow>,
}

/// The full laid-out document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub pages: Vec<Page>,
}

/// Lay out committed lines with the standard page budget.
pub fn lay_out(lines: &[ManifestLine]) -> Layout {
    lay_out_with(lines, ROWS_PER_PAGE)
}

/// Lay out with an explicit rows-per-page budget.
///
/// Lines are sorted by `(category, item_id)`, split into pages, and grouped
/// into contiguous category runs per page. Splitting before grouping makes
/// the first row of a continuation page a forced run boundary: the page-local
/// run draws its own top border and places its own label, so no page opens
/// with a label-less orphan row.
pub fn lay_out_with(lines: &[ManifestLine], rows_per_page: usize) -> Layout {
    assert!(rows_per_page > 0);

    let mut sorted: Vec<&ManifestLine> = lines.iter().collect();
    sorted.sort_by_key(|l| (l.category, l.item_id));

    let mut pages = Vec::new();
    for chunk in sorted.chunks(rows_per_page) {
        pages.push(lay_out_page(chunk));
    }
    Layout { pages }
}

/// Group one page worth of sorted lines into category runs.
fn lay_out_page(chunk: &[&ManifestLine]) -> Page {
    let mut rows: Vec<LayoutRow> = chunk
        .iter()
        .map(|l| LayoutRow {
            label: None,
            top_border: false,
            bottom_border: false,
            item_id: l.item_id,
            name: truncate_name(&l.name),
            quantity: l.quantity,
        })
        .collect();

    let mut start = 0;
    while start < chunk.len() {
        let category = chunk[start].category;
        let mut end = start + 1;
        while end < chunk.len() && chunk[end].category == category {
            end += 1;
        }

        rows[start].top_border = true;
        rows[end - 1].bottom_border = true;
        // Midpoint row carries the label, centering it over the run
        rows[start + (end - start) / 2].label = Some(category.to_string());

        start = end;
    }

    Page { rows }
}

/// Truncate a name to the display width, marking the cut with an ellipsis.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let mut out: String = name.chars().take(NAME_WIDTH - 1).collect();
    out.push('…');
    out
}
