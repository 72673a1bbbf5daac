// ABOUTME: Main library entry point for the blockloom HTML-to-block transformation engine.
// ABOUTME: Re-exports the public API: rules, builder, transformer, cells, parsers, host capabilities.

//! Blockloom - a rule-driven engine converting HTML subtrees into
//! structured content blocks.
//!
//! A declarative [`ImportRules`] document describes how a page is
//! re-expressed as typed blocks: a root selector, cleanup selector lists,
//! and ordered block rules whose cells are resolved through a small
//! selector/template micro-language. The [`Transformer`] applies the rules
//! to a live document in place; host capabilities (block materialization,
//! metadata, sanitization) are injected through the [`Host`] trait, with
//! [`DefaultHost`] as a complete reference implementation.
//!
//! # Example
//!
//! ```
//! use blockloom::{BlockRule, DefaultHost, RuleBuilder, SourceDocument, Transformer};
//! use dom_query::Document;
//!
//! let doc = Document::from(
//!     "<html><body><main><div class=\"hero\"><h1>Title</h1><p>Sub</p></div></main></body></html>",
//! );
//! let mut builder = RuleBuilder::new();
//! builder.add_block(BlockRule {
//!     selectors: vec![".hero".to_string()],
//!     params: serde_json::json!({"cells": [["h1", "p"]]})
//!         .as_object()
//!         .cloned()
//!         .unwrap(),
//!     ..BlockRule::new("hero")
//! });
//! let rules = builder.build();
//!
//! let host = DefaultHost::new();
//! let source = SourceDocument::new(&doc, "https://example.com/page");
//! let main = Transformer::new(&host).transform(&rules, &source);
//! assert!(main.text().contains("Title"));
//! ```

pub mod cells;
pub mod dom;
pub mod error;
pub mod factory;
pub mod host;
pub mod parsers;
pub mod rules;
pub mod selector;
pub mod transform;

pub use crate::cells::{
    build_block_cells, build_block_config, evaluate_cell, evaluate_cells, BlockCells, CellParams,
    CellValue, ConditionalSpec, FieldSpec, RowSpec,
};
pub use crate::error::TransformError;
pub use crate::factory::{document_path, Transformation, TransformedPage};
pub use crate::host::{BlockSpec, DefaultHost, Host};
pub use crate::parsers::{strategy_for, ParseContext, ParseFn};
pub use crate::rules::{
    BlockRule, CleanupPhase, CleanupRules, CleanupSelector, ImportRules, InsertMode, RuleBuilder,
    TransformRule,
};
pub use crate::selector::SelectorDescriptor;
pub use crate::transform::{SourceDocument, Transformer, IGNORE_ELEMENTS};
