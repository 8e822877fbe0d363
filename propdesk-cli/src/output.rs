//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use propdesk_core::domain::fields::text_or;
use propdesk_core::Page;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A table column: header plus dotted field path
pub type Column = (&'static str, &'static str);

/// Colour a status value by what it usually means
pub fn status(value: &str) -> ColoredString {
    match value.to_lowercase().as_str() {
        "active" | "approved" | "completed" | "resolved" | "published" | "credited" | "verified" => {
            value.green()
        }
        "pending" | "open" | "in-progress" | "draft" | "processing" => value.yellow(),
        "blocked" | "rejected" | "failed" | "cancelled" | "closed" => value.red(),
        _ => value.normal(),
    }
}

/// Render a cell; `status` columns get colour
fn cell(record: &JsonValue, path: &str) -> String {
    let text = text_or(record, path, "-");
    if path.ends_with("status") {
        status(&text).to_string()
    } else {
        text
    }
}

/// Table of opaque records
pub fn records_table(records: &[JsonValue], columns: &[Column]) -> Table {
    let mut table = create_table();
    table.set_header(columns.iter().map(|(header, _)| *header).collect::<Vec<_>>());
    for record in records {
        table.add_row(columns.iter().map(|(_, path)| cell(record, path)).collect::<Vec<_>>());
    }
    table
}

/// Print a page of records, or a hint when it is empty
pub fn print_page(title: &str, page: &Page<JsonValue>, columns: &[Column]) {
    if page.items.is_empty() {
        println!("{}", format!("No {} found.", title.to_lowercase()).dimmed());
        return;
    }
    println!("{}", title.bold());
    println!("{}", records_table(&page.items, columns));
    let p = &page.pagination;
    println!(
        "{}",
        format!(
            "Page {} of {} ({} total)",
            p.page,
            p.total_pages.max(1),
            p.total
        )
        .dimmed()
    );
}

/// Print a single record as a key/value table
pub fn print_record(record: &JsonValue) {
    let mut table = create_table();
    if let JsonValue::Object(map) = record {
        for (key, value) in map {
            let text = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Null => "-".to_string(),
                other => other.to_string(),
            };
            table.add_row(vec![key.clone(), text]);
        }
    } else {
        table.add_row(vec![record.to_string()]);
    }
    println!("{}", table);
}

/// Key/value rows for a stats object, one level of nesting flattened
pub fn print_stats(title: &str, stats: &JsonValue) {
    println!("{}", title.bold());
    let mut table = create_table();
    if let JsonValue::Object(map) = stats {
        for (key, value) in map {
            match value {
                JsonValue::Object(inner) => {
                    for (sub, v) in inner {
                        table.add_row(vec![format!("{}.{}", key, sub), plain(v)]);
                    }
                }
                other => {
                    table.add_row(vec![key.clone(), plain(other)]);
                }
            }
        }
    }
    println!("{}", table);
}

fn plain(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Money with two decimals
pub fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}
