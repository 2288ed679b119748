//! CLI output formatting.
//!
//! Output leads with what the reader cares about, the edition, and shows
//! ids and paths as indented context lines.
//!
//! ## Check
//!
//! ```text
//! API http://localhost:8787
//! Editions
//! 001 Primavera (12 pages)
//!     Id: e1
//!     Date: 15 de marzo de 2024
//! 002 Borrador [draft]
//!     Id: draft
//!
//! 2 editions, 1 published
//! ```
//!
//! ## Export
//!
//! ```text
//! Home → index.html
//! 001 Primavera → leer/e1/index.html (12 pages)
//! Skipped "a/b": not a usable directory name
//!
//! Exported 1 edition to dist
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::dates;
use crate::export::ExportSummary;
use crate::listing::InventoryEntry;
use crate::reader;

/// 1-based positional index, zero-padded to three digits.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_output(api_base: &str, entries: &[InventoryEntry]) -> Vec<String> {
    let mut lines = vec![format!("API {api_base}"), "Editions".to_string()];

    for (i, entry) in entries.iter().enumerate() {
        let edition = &entry.edition;
        let header = match entry.pages {
            Some(n) => format!(
                "{} {} ({})",
                format_index(i + 1),
                edition.title,
                plural(n, "page", "pages")
            ),
            None => format!("{} {} [draft]", format_index(i + 1), edition.title),
        };
        lines.push(header);
        lines.push(format!("    Id: {}", edition.id));
        if !edition.date.is_empty() {
            lines.push(format!("    Date: {}", dates::format_long_es(&edition.date)));
        }
    }

    let published = entries.iter().filter(|e| e.edition.published).count();
    lines.push(String::new());
    lines.push(format!(
        "{}, {} published",
        plural(entries.len(), "edition", "editions"),
        published
    ));
    lines
}

pub fn print_check_output(api_base: &str, entries: &[InventoryEntry]) {
    for line in format_check_output(api_base, entries) {
        println!("{}", line);
    }
}

// ============================================================================
// export
// ============================================================================

pub fn format_export_output(summary: &ExportSummary) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];
    let prefix = reader::ROUTE_PREFIX.trim_start_matches('/');

    for (i, edition) in summary.editions.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}/{}/index.html ({})",
            format_index(i + 1),
            edition.title,
            prefix,
            edition.id,
            plural(edition.pages, "page", "pages")
        ));
    }
    for id in &summary.skipped {
        lines.push(format!("Skipped {id:?}: not a usable directory name"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Exported {} to {}",
        plural(summary.editions.len(), "edition", "editions"),
        summary.output.display()
    ));
    lines
}

pub fn print_export_output(summary: &ExportSummary) {
    for line in format_export_output(summary) {
        println!("{}", line);
    }
}
