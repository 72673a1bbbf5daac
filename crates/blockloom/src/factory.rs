// ABOUTME: Transform factory: bundles rules and host into a reusable transformation.
// ABOUTME: Derives the output document path from the source URL.

//! Transformation factory.
//!
//! A [`Transformation`] pairs a rule document with a host and turns one
//! source document into `(root element, output path)` results. The path
//! describes the document being transformed (file name, nesting) and is
//! what downstream tooling materializes the block output under.

use dom_query::NodeRef;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::error::TransformError;
use crate::host::Host;
use crate::rules::ImportRules;
use crate::transform::{SourceDocument, Transformer};

static NON_PATH_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9/]").unwrap());

/// One transformed page: the mutated root element and its output path.
pub struct TransformedPage<'a> {
    pub element: NodeRef<'a>,
    pub path: String,
}

/// A reusable transformation over one rule document.
pub struct Transformation<'h> {
    rules: ImportRules,
    host: &'h dyn Host,
}

impl<'h> Transformation<'h> {
    pub fn new(rules: ImportRules, host: &'h dyn Host) -> Self {
        Self { rules, host }
    }

    /// Transforms a source document, yielding its pages.
    pub fn transform<'a>(
        &self,
        source: &SourceDocument<'a>,
    ) -> Result<Vec<TransformedPage<'a>>, TransformError> {
        let element = Transformer::new(self.host).transform(&self.rules, source);
        let path = document_path(&source.url, self.host)?;
        Ok(vec![TransformedPage { element, path }])
    }
}

/// Derives the output path for a document from its URL.
///
/// Directory URLs gain an `index` leaf; the path is percent-decoded,
/// lowercased, loses a trailing `.html`, has everything outside
/// `[a-z0-9/]` replaced with dashes, and finally goes through the host's
/// path sanitizer.
pub fn document_path(url: &str, host: &dyn Host) -> Result<String, TransformError> {
    let parsed = Url::parse(url).map_err(|e| TransformError::invalid_url(url, e))?;
    let mut path = parsed.path().to_string();
    if path.ends_with('/') {
        path.push_str("index");
    }
    let decoded = percent_decode_str(&path).decode_utf8_lossy().to_lowercase();
    let stripped = decoded.strip_suffix(".html").unwrap_or(&decoded);
    let cleaned = NON_PATH_CHARS_RE.replace_all(stripped, "-");
    Ok(host.sanitize_path(&cleaned))
}
