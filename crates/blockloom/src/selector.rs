// ABOUTME: Selector micro-language parsing for cell and cleanup selectors.
// ABOUTME: Splits raw selector strings into descriptors and caches compiled CSS matchers.

//! Selector descriptor parsing.
//!
//! Cell selectors extend plain CSS with a small set of trailing markers:
//! `::text` (extract text), `::text:nth-child(N)` (Nth direct text node),
//! `+ *::text` (text of the following sibling), `[attr]` (attribute value)
//! and, in cleanup lists only, `::text(<literal>)` (text-node search).
//!
//! Key behaviors:
//! - Parsing is pure; the same input always yields the same descriptor.
//! - CSS validity is decided empirically by compiling with the DOM engine,
//!   never by static analysis. Compilation results are cached process-wide.
//! - An invalid selector is never an error at this layer; callers degrade
//!   to template handling or drop the entry.

use std::collections::HashMap;
use std::sync::RwLock;

use dom_query::Matcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// The pseudo text-extraction marker.
pub const PSEUDO_TEXT_SELECTOR: &str = "::text";

static VALUE_SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"::text(?::nth-child\((?<nth>\d+)\))?$").unwrap());
static SIBLING_REMNANT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+\s*\*?\s*$").unwrap());
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^=]*?)\]$").unwrap());
static SEARCH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"::text\((.*?)\)").unwrap());
static SEARCH_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"::text\((.*)\)").unwrap());

/// Structured form of a raw cell selector string.
///
/// `selector` is the remaining CSS selector with the pseudo markers trimmed.
/// The `[attr]` suffix is deliberately kept inside `selector`: it is valid
/// CSS and scopes the query to elements that actually carry the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorDescriptor {
    pub selector: String,
    pub use_text: bool,
    pub use_sibling_text: bool,
    /// 1-indexed direct text-node child, always positive when present.
    pub child_index: Option<usize>,
    /// Attribute name captured from a trailing `[attr]` suffix.
    pub attribute: Option<String>,
}

impl SelectorDescriptor {
    /// Parses a raw selector string into its descriptor.
    pub fn parse(raw: &str) -> Self {
        let use_text = VALUE_SELECTOR_RE.is_match(raw);
        let child_index = VALUE_SELECTOR_RE
            .captures(raw)
            .and_then(|c| c.name("nth"))
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .filter(|n| *n > 0);

        let mut clean = VALUE_SELECTOR_RE.replace(raw, "").to_string();
        let use_sibling_text = use_text && SIBLING_REMNANT_RE.is_match(&clean);
        if use_sibling_text {
            clean = SIBLING_REMNANT_RE.replace(&clean, "").to_string();
        }
        let selector = clean.trim().to_string();
        let attribute = attribute_of(&selector).map(str::to_string);

        Self {
            selector,
            use_text,
            use_sibling_text,
            child_index,
            attribute,
        }
    }
}

/// A cleanup search selector: `p::text(Draft)` removes text nodes under
/// `p` whose trimmed content equals `Draft`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSelector {
    pub selector: String,
    pub search: Option<String>,
}

/// Splits a `<selector>::text(<literal>)` removal selector.
pub fn parse_search(raw: &str) -> SearchSelector {
    let search = SEARCH_RE
        .captures(raw)
        .map(|c| c[1].to_string());
    let selector = SEARCH_STRIP_RE.replace(raw, "").trim().to_string();
    SearchSelector { selector, search }
}

/// Returns the attribute name of a trailing `[attr]` suffix, if any.
///
/// CSS attribute predicates with a value (`[property='og:title']`) are not
/// attribute markers and yield `None`.
pub fn attribute_of(selector: &str) -> Option<&str> {
    ATTRIBUTE_RE
        .captures(selector)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Does the selector end in an `[attr]` extraction suffix?
pub fn is_attribute_selector(selector: &str) -> bool {
    ATTRIBUTE_RE.is_match(selector)
}

/// Does the selector carry the pseudo text marker anywhere?
pub fn is_text_selector(selector: &str) -> bool {
    selector.contains(PSEUDO_TEXT_SELECTOR)
}

/// Process-wide cache of compiled CSS matchers.
///
/// Selector compilation is expensive relative to matching, and the same
/// selectors are evaluated for every candidate element. Invalid selectors
/// are cached as `None` so the validity test is also O(1) on repeats.
static MATCHER_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Matcher)` for a valid selector, `None` otherwise. Engine
/// rejections are swallowed here; they are the validity test.
pub fn compiled(css: &str) -> Option<Matcher> {
    {
        let cache = MATCHER_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = MATCHER_CACHE.write().unwrap();
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Is the string usable as a CSS selector by the DOM query engine?
pub fn is_valid_css_selector(css: &str) -> bool {
    !css.is_empty() && compiled(css).is_some()
}
