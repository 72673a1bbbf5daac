// ABOUTME: Declarative rule document model: ImportRules, BlockRule, cleanup selectors.
// ABOUTME: Plain serde-serializable data; the sole transferable artifact of the rule subsystem.

//! Rule document model.
//!
//! An [`ImportRules`] value drives one pipeline run: a root selector,
//! cleanup selector lists for the start and end phases, an ordered list of
//! block rules and a list of named transformer placeholders. It is plain
//! data, safely serializable, produced by the builder and consumed
//! read-only by the transformer.

mod builder;

pub use builder::{CleanupPhase, RuleBuilder};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::parsers::ParseFn;

/// How a materialized block is inserted into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// Substitute the candidate element in place.
    #[default]
    Replace,
    /// Add the block as the last child of the root.
    Append,
    /// Add the block as the first child of the root.
    Prepend,
}

/// A cleanup selector: a plain string (CSS or `::text(<literal>)` form) or
/// a structured attribute matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanupSelector {
    Css(String),
    Attribute {
        attribute: String,
        #[serde(default)]
        property: Option<String>,
        value: String,
    },
}

impl From<&str> for CleanupSelector {
    fn from(s: &str) -> Self {
        CleanupSelector::Css(s.to_string())
    }
}

impl From<String> for CleanupSelector {
    fn from(s: String) -> Self {
        CleanupSelector::Css(s)
    }
}

/// Cleanup selector lists for the two removal phases.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanupRules {
    #[serde(default)]
    pub start: Vec<CleanupSelector>,
    #[serde(default)]
    pub end: Vec<CleanupSelector>,
}

/// One block rule, unique by `block_type` within a rule document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRule {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Parse hook; code, not data — re-attach after deserialization.
    #[serde(skip)]
    pub parse: Option<ParseFn>,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default, rename = "insertMode")]
    pub insert_mode: InsertMode,
}

impl BlockRule {
    /// A rule with only a type set; everything else at defaults.
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            variants: Vec::new(),
            selectors: Vec::new(),
            parse: None,
            params: Map::new(),
            insert_mode: InsertMode::default(),
        }
    }
}

/// Named transformer placeholder, unique by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
    pub name: String,
}

/// The full declarative rule document for one migration-site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRules {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default)]
    pub cleanup: CleanupRules,
    #[serde(default)]
    pub blocks: Vec<BlockRule>,
    #[serde(default)]
    pub transformers: Vec<TransformRule>,
}

fn default_root() -> String {
    "main".to_string()
}

impl Default for ImportRules {
    fn default() -> Self {
        Self {
            root: default_root(),
            cleanup: CleanupRules::default(),
            blocks: Vec::new(),
            transformers: Vec::new(),
        }
    }
}

impl ImportRules {
    /// Decodes a rule document from JSON.
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        serde_json::from_str(json).map_err(TransformError::RulesDecode)
    }

    /// Encodes the rule document as JSON.
    pub fn to_json(&self) -> Result<String, TransformError> {
        serde_json::to_string_pretty(self).map_err(TransformError::RulesEncode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_preserves_rules() {
        let json = r#"{
            "root": "article",
            "cleanup": {
                "start": [".ads", "p::text(Draft)", {"attribute": "data-module", "value": "nav"}],
                "end": [".leftover"]
            },
            "blocks": [
                {
                    "type": "hero",
                    "variants": ["dark"],
                    "selectors": [".hero"],
                    "params": {"cells": [["h1", "p"]]},
                    "insertMode": "prepend"
                }
            ],
            "transformers": [{"name": "rewrite-links"}]
        }"#;
        let rules = ImportRules::from_json(json).unwrap();
        assert_eq!(rules.root, "article");
        assert_eq!(rules.cleanup.start.len(), 3);
        assert_eq!(
            rules.cleanup.start[2],
            CleanupSelector::Attribute {
                attribute: "data-module".to_string(),
                property: None,
                value: "nav".to_string(),
            }
        );
        assert_eq!(rules.blocks.len(), 1);
        assert_eq!(rules.blocks[0].block_type, "hero");
        assert_eq!(rules.blocks[0].insert_mode, InsertMode::Prepend);
        assert_eq!(rules.transformers, vec![TransformRule { name: "rewrite-links".into() }]);

        let encoded = rules.to_json().unwrap();
        let decoded = ImportRules::from_json(&encoded).unwrap();
        assert_eq!(decoded.root, rules.root);
        assert_eq!(decoded.cleanup, rules.cleanup);
        assert_eq!(decoded.blocks[0].block_type, rules.blocks[0].block_type);
        assert_eq!(decoded.blocks[0].params, rules.blocks[0].params);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let rules = ImportRules::from_json("{}").unwrap();
        assert_eq!(rules.root, "main");
        assert!(rules.cleanup.start.is_empty());
        assert!(rules.blocks.is_empty());
        assert!(rules.transformers.is_empty());
    }

    #[test]
    fn insert_mode_defaults_to_replace() {
        let rules = ImportRules::from_json(r#"{"blocks": [{"type": "x"}]}"#).unwrap();
        assert_eq!(rules.blocks[0].insert_mode, InsertMode::Replace);
    }
}
