// ABOUTME: Metadata strategy: baseline page metadata merged under custom config fields.
// ABOUTME: Normalizes image sources to the first of a comma-separated list and dates to ISO.

use chrono::{DateTime, NaiveDate};
use dom_query::Selection;

use crate::cells::{BlockCells, CellValue};
use crate::parsers::{block, ParseContext};

/// Builds the metadata mapping: host-provided baseline fields first, then
/// custom config fields from the rule's `cells` param (custom wins on
/// conflicts). `Image` values keep only the first of a comma-separated
/// source list; date-valued fields normalize to `YYYY-MM-DD`.
pub fn parse<'a, 'h>(ctx: &ParseContext<'a, 'h>) -> BlockCells<'a> {
    let mut meta: Vec<(String, CellValue<'a>)> = ctx
        .host
        .get_metadata(ctx.document)
        .into_iter()
        .map(|(name, value)| (name, CellValue::Text(value)))
        .collect();

    if let BlockCells::Config(custom) = block::parse(ctx) {
        for (name, value) in custom {
            match meta.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = value,
                None => meta.push((name, value)),
            }
        }
    }

    for (name, value) in meta.iter_mut() {
        if name == "Image" {
            normalize_image(value);
        }
        normalize_date(value);
    }

    BlockCells::Config(meta)
}

/// Keeps only the first entry of a comma-separated image source.
fn normalize_image(value: &mut CellValue) {
    match value {
        CellValue::Text(src) => {
            if let Some(first) = src.split(',').next() {
                *src = first.trim().to_string();
            }
        }
        CellValue::Node(node) => {
            let img = if node.node_name().map(|n| n.to_string()).as_deref() == Some("img") {
                Some(*node)
            } else {
                Selection::from(*node).select("img").nodes().first().copied()
            };
            let Some(img) = img else { return };
            let Some(src) = img.attr("src") else { return };
            if let Some(first) = src.split(',').next() {
                Selection::from(img).set_attr("src", first.trim());
            }
        }
        CellValue::List(_) => {}
    }
}

/// Rewrites date-valued fields to ISO `YYYY-MM-DD`.
fn normalize_date(value: &mut CellValue) {
    let Some(text) = value.as_text() else { return };
    let text = text.trim().to_string();
    if text.is_empty() {
        return;
    }
    if let Some(date) = parse_date(&text) {
        *value = CellValue::Text(date.format("%Y-%m-%d").to_string());
    }
}

/// Parses a date string: RFC3339 first, then loose naive date-only
/// patterns, then dateparser for natural formats. The naive patterns run
/// before dateparser so date-only values cannot shift a day across
/// timezones.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    const LOOSE_PATTERNS: &[&str] = &[
        "%Y-%m-%d",  // 2024-03-03
        "%b %e, %Y", // Mar 3, 2024
        "%e %b %Y",  // 3 Mar 2024
        "%b %d, %Y", // Mar 03, 2024
        "%d %b %Y",  // 03 Mar 2024
        "%B %e, %Y", // March 3, 2024
        "%e %B %Y",  // 3 March 2024
        "%B %d, %Y", // March 03, 2024
        "%d %B %Y",  // 03 March 2024
        "%m/%d/%Y",  // 03/03/2024
    ];
    for pattern in LOOSE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(s, pattern) {
            return Some(date);
        }
    }

    dateparser::parse(s).ok().map(|dt| dt.naive_utc().date())
}
