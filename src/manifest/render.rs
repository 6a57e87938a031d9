//! Manifest file encodings
//!
//! Two serializations of the same [`Layout`](super::layout::Layout): a
//! page-oriented plain-text document (form-feed separated, ready for print
//! spooling) and a flowing HTML table that word processors open natively.

use super::{lay_out, Manifest, CHECK_COLUMNS, NAME_WIDTH, SIGNATURES};
use super::layout::{LayoutRow, Page};

/// File extension of the page-oriented encoding
pub const PAGES_EXTENSION: &str = "txt";

/// File extension of the table-oriented encoding
pub const TABLE_EXTENSION: &str = "doc";

const LABEL_WIDTH: usize = 12;
const ID_WIDTH: usize = 5;
const QTY_WIDTH: usize = 4;
const CHECK_WIDTH: usize = 13;

/// Render the paginated plain-text encoding.
pub fn render_pages(manifest: &Manifest) -> String {
    let layout = lay_out(&manifest.lines);
    let total = layout.pages.len().max(1);

    let mut out = String::new();
    if layout.pages.is_empty() {
        push_page_header(&mut out, manifest, 1, 1);
        push_footer(&mut out);
        return out;
    }

    for (idx, page) in layout.pages.iter().enumerate() {
        if idx > 0 {
            out.push('\u{000C}');
        }
        push_page_header(&mut out, manifest, idx + 1, total);
        push_text_table(&mut out, page);
        if idx + 1 == total {
            push_footer(&mut out);
        }
    }
    out
}

fn push_page_header(out: &mut String, manifest: &Manifest, page: usize, total: usize) {
    out.push_str(&format!(
        "GEARHOUSE BORROW MANIFEST{:>52}\n",
        format!("Page {}/{}", page, total)
    ));
    match &manifest.borrower_contact {
        Some(contact) => out.push_str(&format!(
            "Borrower: {} ({})\n",
            manifest.borrower_name, contact
        )),
        None => out.push_str(&format!("Borrower: {}\n", manifest.borrower_name)),
    }
    out.push_str(&format!(
        "Date: {}\n\n",
        manifest.generated_at.format("%Y-%m-%d")
    ));
}

fn push_text_table(out: &mut String, page: &Page) {
    push_separator(out);
    out.push_str(&format!(
        "| {:<lw$} | {:<iw$} | {:<nw$} | {:<qw$} | {:<cw$} | {:<cw$} | {:<cw$} |\n",
        "Category",
        "Id",
        "Item",
        "Qty",
        CHECK_COLUMNS[0],
        CHECK_COLUMNS[1],
        CHECK_COLUMNS[2],
        lw = LABEL_WIDTH,
        iw = ID_WIDTH,
        nw = NAME_WIDTH,
        qw = QTY_WIDTH,
        cw = CHECK_WIDTH,
    ));

    for row in &page.rows {
        if row.top_border {
            push_separator(out);
        }
        out.push_str(&format!(
            "| {:<lw$} | {:>iw$} | {:<nw$} | {:>qw$} | {:<cw$} | {:<cw$} | {:<cw$} |\n",
            row.label.as_deref().unwrap_or(""),
            row.item_id,
            row.name,
            row.quantity,
            "",
            "",
            "",
            lw = LABEL_WIDTH,
            iw = ID_WIDTH,
            nw = NAME_WIDTH,
            qw = QTY_WIDTH,
            cw = CHECK_WIDTH,
        ));
    }
    push_separator(out);
}

fn push_separator(out: &mut String) {
    out.push('+');
    for width in [
        LABEL_WIDTH,
        ID_WIDTH,
        NAME_WIDTH,
        QTY_WIDTH,
        CHECK_WIDTH,
        CHECK_WIDTH,
        CHECK_WIDTH,
    ] {
        out.push_str(&"-".repeat(width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_footer(out: &mut String) {
    out.push('\n');
    for signature in SIGNATURES {
        out.push_str(&format!("{}: {}\n\n", signature, "_".repeat(40)));
    }
}

/// Render the flowing HTML table encoding. Word processors open the result
/// as a document; grouping, label placement and truncation are byte-for-byte
/// the decisions of the shared layout.
pub fn render_table(manifest: &Manifest) -> String {
    let layout = lay_out(&manifest.lines);

    let mut out = String::new();
    out.push_str("<html><head><meta charset=\"utf-8\"><title>Borrow manifest</title>\n");
    out.push_str("<style>table{border-collapse:collapse;width:100%}th,td{border-left:1px solid #000;border-right:1px solid #000;padding:4px 8px;text-align:left}th{border-top:1px solid #000;border-bottom:1px solid #000}td.run-top{border-top:1px solid #000}td.run-bottom{border-bottom:1px solid #000}</style>\n");
    out.push_str("</head><body>\n");
    out.push_str("<h1>Gearhouse borrow manifest</h1>\n");
    match &manifest.borrower_contact {
        Some(contact) => out.push_str(&format!(
            "<p>Borrower: {} ({})</p>\n",
            escape(&manifest.borrower_name),
            escape(contact)
        )),
        None => out.push_str(&format!(
            "<p>Borrower: {}</p>\n",
            escape(&manifest.borrower_name)
        )),
    }
    out.push_str(&format!(
        "<p>Date: {}</p>\n",
        manifest.generated_at.format("%Y-%m-%d")
    ));

    out.push_str("<table>\n<tr>");
    for header in ["Category", "Id", "Item", "Qty"] {
        out.push_str(&format!("<th>{}</th>", header));
    }
    for check in CHECK_COLUMNS {
        out.push_str(&format!("<th>{}</th>", check));
    }
    out.push_str("</tr>\n");

    for page in &layout.pages {
        for row in &page.rows {
            push_html_row(&mut out, row);
        }
    }
    out.push_str("</table>\n");

    for signature in SIGNATURES {
        out.push_str(&format!(
            "<p>{}: {}</p>\n",
            signature,
            "_".repeat(40)
        ));
    }
    out.push_str("</body></html>\n");
    out
}

fn push_html_row(out: &mut String, row: &LayoutRow) {
    let mut classes = Vec::new();
    if row.top_border {
        classes.push("run-top");
    }
    if row.bottom_border {
        classes.push("run-bottom");
    }
    let class_attr = if classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", classes.join(" "))
    };

    out.push_str("<tr>");
    out.push_str(&format!(
        "<td{}>{}</td>",
        class_attr,
        row.label.as_deref().map(escape).unwrap_or_default()
    ));
    out.push_str(&format!("<td{}>{}</td>", class_attr, row.item_id));
    out.push_str(&format!("<td{}>{}</td>", class_attr, escape(&row.name)));
    out.push_str(&format!("<td{}>{}</td>", class_attr, row.quantity));
    for _ in CHECK_COLUMNS {
        out.push_str(&format!("<td{}></td>", class_attr));
    }
    out.push_str("</tr>\n");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Category;
    use crate::manifest::ManifestLine;
    use chrono::TimeZone;

    fn manifest(lines: Vec<ManifestLine>) -> Manifest {
        Manifest {
            borrower_name: "Jane Doe".to_string(),
            borrower_contact: Some("jane@example.org".to_string()),
            generated_at: chrono::Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
            lines,
        }
    }

    fn line(id: i32, name: &str, category: Category, quantity: i32) -> ManifestLine {
        ManifestLine {
            item_id: id,
            name: name.to_string(),
            category,
            quantity,
        }
    }

    #[test]
    fn encodings_are_insertion_order_independent() {
        let a = manifest(vec![
            line(1, "Hammer", Category::Tools, 1),
            line(3, "Kettle", Category::Kitchen, 2),
            line(2, "Wrench", Category::Tools, 1),
        ]);
        let b = manifest(vec![
            line(3, "Kettle", Category::Kitchen, 2),
            line(2, "Wrench", Category::Tools, 1),
            line(1, "Hammer", Category::Tools, 1),
        ]);

        assert_eq!(render_pages(&a), render_pages(&b));
        assert_eq!(render_table(&a), render_table(&b));
    }

    #[test]
    fn category_label_appears_once_per_run_in_both_encodings() {
        let m = manifest(vec![
            line(1, "Hammer", Category::Tools, 1),
            line(2, "Wrench", Category::Tools, 1),
            line(3, "Kettle", Category::Kitchen, 2),
        ]);

        let text = render_pages(&m);
        assert_eq!(text.matches("Tools").count(), 1);
        assert_eq!(text.matches("Kitchen").count(), 1);

        let html = render_table(&m);
        assert_eq!(html.matches(">Tools</td>").count(), 1);
        assert_eq!(html.matches(">Kitchen</td>").count(), 1);
    }

    #[test]
    fn multi_page_text_uses_form_feeds_and_repeats_header() {
        let lines: Vec<ManifestLine> = (1..=25)
            .map(|i| line(i, &format!("Tool {}", i), Category::Tools, 1))
            .collect();
        let m = manifest(lines);

        let text = render_pages(&m);
        assert_eq!(text.matches('\u{000C}').count(), 1);
        assert_eq!(text.matches("Page 1/2").count(), 1);
        assert_eq!(text.matches("Page 2/2").count(), 1);
        // Continuation page carries its own label
        assert_eq!(text.matches("Tools").count(), 2);
    }

    #[test]
    fn footer_has_three_signature_lines() {
        let m = manifest(vec![line(1, "Hammer", Category::Tools, 1)]);
        let text = render_pages(&m);
        let html = render_table(&m);
        for signature in SIGNATURES {
            assert!(text.contains(signature));
            assert!(html.contains(signature));
        }
    }

    #[test]
    fn truncation_matches_between_encodings() {
        let long = "Professional heavy-duty impact wrench with carrying case";
        let m = manifest(vec![line(1, long, Category::Tools, 1)]);
        let truncated = crate::manifest::layout::truncate_name(long);

        assert!(render_pages(&m).contains(&truncated));
        assert!(render_table(&m).contains(&truncated));
        assert!(!render_pages(&m).contains(long));
    }

    #[test]
    fn filename_embeds_generation_date() {
        let m = manifest(vec![]);
        assert_eq!(m.filename(PAGES_EXTENSION), "manifest_2026-03-14.txt");
        assert_eq!(m.filename(TABLE_EXTENSION), "manifest_2026-03-14.doc");
    }

    #[test]
    fn empty_manifest_still_renders_header_and_footer() {
        let m = manifest(vec![]);
        let text = render_pages(&m);
        assert!(text.contains("GEARHOUSE BORROW MANIFEST"));
        assert!(text.contains(SIGNATURES[0]));
    }
}
