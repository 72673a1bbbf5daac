// ABOUTME: The rule-driven transformation pipeline over one live document.
// ABOUTME: Four strictly sequential phases: root, start cleanup, block materialization, end cleanup.

//! Transformation pipeline.
//!
//! A [`Transformer`] interprets an [`ImportRules`] document against a live
//! DOM in four phases: root resolution, start cleanup (with a fixed
//! always-ignored tag set), per-rule block materialization, end cleanup.
//!
//! Key behaviors:
//! - Single pass, no retries, no rollback; the document is mutated in
//!   place and a run is not re-entrant over the same document.
//! - No phase aborts on a per-rule failure: a rule with no candidates or
//!   empty cells simply contributes nothing.
//! - Invalid selectors are filtered before use, never queried.

mod removal;

pub use removal::process_removal;

use dom_query::{Document, NodeRef, Selection};
use serde_json::{Map, Value};
use tracing::debug;

use crate::host::{BlockSpec, Host};
use crate::parsers::{self, ParseContext, ParseFn};
use crate::rules::{BlockRule, CleanupSelector, ImportRules, InsertMode};
use crate::selector;

/// Tags removed unconditionally during start cleanup.
pub const IGNORE_ELEMENTS: &[&str] = &["style", "source", "script", "noscript", "iframe"];

/// The document under transformation plus its ambient properties.
pub struct SourceDocument<'a> {
    pub document: &'a Document,
    pub url: String,
    /// Ambient params made visible to every parse strategy.
    pub params: Map<String, Value>,
}

impl<'a> SourceDocument<'a> {
    pub fn new(document: &'a Document, url: impl Into<String>) -> Self {
        Self {
            document,
            url: url.into(),
            params: Map::new(),
        }
    }
}

/// Interprets rule documents against live documents.
pub struct Transformer<'h> {
    host: &'h dyn Host,
}

impl<'h> Transformer<'h> {
    /// Capabilities are injected here; the pipeline never looks anything
    /// up ambiently.
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Runs the pipeline once and returns the (mutated) root element.
    pub fn transform<'a>(&self, rules: &ImportRules, source: &SourceDocument<'a>) -> NodeRef<'a> {
        let doc = source.document;

        // phase 1: root resolution
        let root = self.resolve_root(doc, &rules.root);

        // phase 2: start cleanup, with the fixed ignore set
        let mut start = rules.cleanup.start.clone();
        start.extend(
            IGNORE_ELEMENTS
                .iter()
                .map(|tag| CleanupSelector::Css((*tag).to_string())),
        );
        process_removal(&root, &start, self.host);

        // phase 3: block materialization, in rule order
        for rule in &rules.blocks {
            self.apply_block_rule(doc, &root, rule, source);
        }

        // phase 4: end cleanup
        process_removal(&root, &rules.cleanup.end, self.host);

        root
    }

    fn resolve_root<'a>(&self, doc: &'a Document, root: &str) -> NodeRef<'a> {
        if selector::is_valid_css_selector(root) {
            if let Some(node) = doc.select(root).nodes().first() {
                return *node;
            }
        }
        debug!(root, "root selector matched nothing, falling back to body");
        match doc.select("body").nodes().first() {
            Some(body) => *body,
            None => doc.tree.root(),
        }
    }

    fn apply_block_rule<'a>(
        &self,
        doc: &'a Document,
        root: &NodeRef<'a>,
        rule: &BlockRule,
        source: &SourceDocument<'a>,
    ) {
        let parse_fn: ParseFn = rule
            .parse
            .or_else(|| parsers::strategy_for(&rule.block_type))
            .unwrap_or(parsers::block::parse);

        let valid_selectors: Vec<&String> = rule
            .selectors
            .iter()
            .filter(|s| selector::is_valid_css_selector(s))
            .collect();
        let candidates: Vec<NodeRef<'a>> = if valid_selectors.is_empty() {
            vec![*root]
        } else {
            let mut out = Vec::new();
            for sel in &valid_selectors {
                out.extend(
                    Selection::from(*root)
                        .select(sel.as_str())
                        .nodes()
                        .iter()
                        .copied(),
                );
            }
            out
        };

        for element in candidates {
            let mut params = source.params.clone();
            for (key, value) in &rule.params {
                params.insert(key.clone(), value.clone());
            }
            let ctx = ParseContext {
                document: doc,
                element,
                url: &source.url,
                params,
                host: self.host,
            };
            let cells = parse_fn(&ctx);
            if cells.is_empty() {
                debug!(block_type = %rule.block_type, "rule produced no cells, skipping");
                continue;
            }

            let spec = BlockSpec {
                name: self.host.compute_block_name(&rule.block_type),
                variants: rule.variants.clone(),
                cells,
            };
            let Some(block) = self.host.create_block(doc, spec) else {
                continue;
            };
            match rule.insert_mode {
                InsertMode::Replace => {
                    Selection::from(element).replace_with_selection(&Selection::from(block));
                }
                InsertMode::Append => {
                    Selection::from(*root).append_selection(&Selection::from(block));
                }
                InsertMode::Prepend => {
                    Selection::from(*root).prepend_selection(&Selection::from(block));
                }
            }
        }
    }
}
