// ABOUTME: Cell evaluation: resolves selector cells and template cells against a live element.
// ABOUTME: Implements the text-extraction rule, replace/split params and the literal fallback.

//! Cell evaluation.
//!
//! A cell spec is either a **selector cell** (the string compiles as a CSS
//! selector) or a **template cell** (free-form markup with `{{expr}}`
//! placeholders). Classification is empirical: whatever the DOM engine
//! accepts as a selector is one.
//!
//! Key behaviors:
//! - Selector cells query all descendants; matches collapse to a scalar
//!   for zero/one result and a sequence otherwise. Zero matches fall back
//!   to the selector string itself as a literal value.
//! - Text is extracted when the match has no child nodes, text extraction
//!   was requested, the selector is an attribute selector, or a `replace`
//!   param is present; otherwise the raw element is kept.
//! - Template placeholders resolve to inner markup or attribute values;
//!   unresolvable expressions substitute verbatim. The assembled markup is
//!   sanitized before fragment parsing.
//! - Invalid selectors never raise; they degrade to template handling.

use dom_query::{Document, NodeRef, Selection};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::cells::CellValue;
use crate::dom;
use crate::host::Host;
use crate::selector::{self, SelectorDescriptor};

static TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").unwrap());

/// Post-processing parameters for text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellParams {
    /// Single regex substitution `[pattern, replacement]`, then trim.
    pub replace: Option<(String, String)>,
    /// Split on a delimiter, drop empty segments, pick a part (default 0).
    pub split: Option<(String, usize)>,
}

impl CellParams {
    /// Decodes params from their JSON rule form. Malformed entries are
    /// ignored rather than raised.
    pub fn from_value(value: &Value) -> Self {
        let mut params = Self::default();
        let Value::Object(map) = value else {
            return params;
        };
        if let Some(Value::Array(arr)) = map.get("replace") {
            if let Some(Value::String(pattern)) = arr.first() {
                let replacement = arr.get(1).and_then(Value::as_str).unwrap_or("").to_string();
                params.replace = Some((pattern.clone(), replacement));
            }
        }
        if let Some(Value::Array(arr)) = map.get("split") {
            if let Some(Value::String(delim)) = arr.first() {
                let part = arr.get(1).and_then(Value::as_u64).unwrap_or(0) as usize;
                params.split = Some((delim.clone(), part));
            }
        }
        params
    }
}

/// Evaluates a single cell spec against an element.
///
/// Returns zero or one value: selector cells always produce a value (the
/// literal fallback covers zero matches), template cells produce nothing
/// when the sanitized fragment has no element child.
pub fn evaluate_cell<'a>(
    doc: &'a Document,
    element: &NodeRef<'a>,
    cell: &str,
    params: &CellParams,
    host: &dyn Host,
) -> Vec<CellValue<'a>> {
    if cell.is_empty() {
        return Vec::new();
    }
    let desc = SelectorDescriptor::parse(cell);
    if !desc.selector.is_empty() && selector::is_valid_css_selector(&desc.selector) {
        return vec![evaluate_selector_cell(element, &desc, params)];
    }
    evaluate_template_cell(doc, element, cell, host)
        .into_iter()
        .collect()
}

/// Evaluates a sequence of cell specs, aggregating results in order.
pub fn evaluate_cells<'a>(
    doc: &'a Document,
    element: &NodeRef<'a>,
    cells: &[String],
    params: &CellParams,
    host: &dyn Host,
) -> Vec<CellValue<'a>> {
    cells
        .iter()
        .flat_map(|c| evaluate_cell(doc, element, c, params, host))
        .collect()
}

fn evaluate_selector_cell<'a>(
    element: &NodeRef<'a>,
    desc: &SelectorDescriptor,
    params: &CellParams,
) -> CellValue<'a> {
    let matches: Vec<NodeRef<'a>> = Selection::from(*element)
        .select(desc.selector.as_str())
        .nodes()
        .to_vec();

    let mut values: Vec<CellValue<'a>> = Vec::new();
    for el in matches {
        let keep_element = el.first_child().is_some()
            && !desc.use_text
            && desc.attribute.is_none()
            && params.replace.is_none();
        if keep_element {
            values.push(CellValue::Node(el));
            continue;
        }

        let mut text = element_text(&el, desc);
        if let Some((pattern, replacement)) = &params.replace {
            match Regex::new(pattern) {
                Ok(re) => text = re.replace(&text, replacement.as_str()).trim().to_string(),
                Err(_) => debug!(pattern = %pattern, "skipping invalid replace pattern"),
            }
        }
        if let Some((delim, part)) = &params.split {
            let parts: Vec<&str> = text.split(delim.as_str()).filter(|p| !p.is_empty()).collect();
            if parts.len() > *part {
                text = parts[*part].to_string();
            }
        }
        values.push(CellValue::Text(text.trim().to_string()));
    }

    match values.len() {
        // literal fallback: the selector string acts as a placeholder value
        0 => CellValue::Text(desc.selector.clone()),
        1 => values.remove(0),
        _ => CellValue::List(values),
    }
}

/// The text-extraction rule for a matched element.
fn element_text(el: &NodeRef, desc: &SelectorDescriptor) -> String {
    if !desc.use_text {
        if let Some(attr) = &desc.attribute {
            return el.attr(attr).map(|v| v.to_string()).unwrap_or_default();
        }
    }
    if let Some(idx) = desc.child_index {
        return dom::text_children(el)
            .get(idx - 1)
            .map(|n| n.text().to_string())
            .unwrap_or_default();
    }
    if desc.use_sibling_text {
        return el
            .next_sibling()
            .map(|n| n.text().to_string())
            .unwrap_or_default();
    }
    let text = el.text().to_string();
    if text.is_empty() {
        // meta-style elements carry their value in a content attribute
        return el.attr("content").map(|v| v.to_string()).unwrap_or_default();
    }
    text
}

fn evaluate_template_cell<'a>(
    doc: &'a Document,
    element: &NodeRef<'a>,
    cell: &str,
    host: &dyn Host,
) -> Option<CellValue<'a>> {
    let html = TEMPLATE_RE.replace_all(cell, |caps: &regex::Captures| -> String {
        let expr = caps[1].trim().to_string();
        if !selector::is_valid_css_selector(&expr) {
            // unresolvable expression: substitute verbatim
            return expr;
        }
        let selection = Selection::from(*element).select(expr.as_str());
        let Some(matched) = selection.nodes().first().copied() else {
            return String::new();
        };
        if selector::is_attribute_selector(&expr) {
            if let Some(attr) = selector::attribute_of(&expr) {
                return matched.attr(attr).map(|v| v.to_string()).unwrap_or_default();
            }
        }
        Selection::from(matched).inner_html().to_string()
    });

    let sanitized = host.sanitize(&html);
    let container = doc.tree.new_element("div");
    Selection::from(container).set_html(sanitized.as_str());
    dom::first_element_child(&container).map(CellValue::Node)
}
