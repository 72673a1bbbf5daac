// ABOUTME: Host capability interface consumed by the transformation core.
// ABOUTME: Block materialization, naming, metadata, bulk removal, path and markup sanitization.

//! Host capabilities.
//!
//! The core does not construct final block elements, compute canonical
//! block names, extract page-level metadata, bulk-remove nodes or sanitize
//! paths/markup itself; it calls a [`Host`] for all of that. The trait is
//! passed by dependency injection into the transformer and the evaluator —
//! never looked up ambiently. [`DefaultHost`] is a complete reference
//! implementation so the crate is usable stand-alone.

mod default;

pub use default::DefaultHost;

use dom_query::{Document, NodeRef};

use crate::cells::BlockCells;

/// Everything a host needs to materialize one block.
#[derive(Debug)]
pub struct BlockSpec<'a> {
    /// Canonical display name, from [`Host::compute_block_name`].
    pub name: String,
    pub variants: Vec<String>,
    pub cells: BlockCells<'a>,
}

/// Capability interface supplied by the embedding environment.
///
/// A host returning `None` from [`Host::create_block`] means "no block
/// produced"; the pipeline proceeds without it.
pub trait Host {
    /// Materializes cell data into a concrete block element in `doc`'s tree.
    fn create_block<'a>(&self, doc: &'a Document, spec: BlockSpec<'a>) -> Option<NodeRef<'a>>;

    /// Canonicalizes a rule type into a display name.
    fn compute_block_name(&self, block_type: &str) -> String;

    /// Baseline page metadata, merged under custom metadata by the
    /// metadata strategy.
    fn get_metadata(&self, doc: &Document) -> Vec<(String, String)>;

    /// Bulk structural removal of everything under `root` matching any of
    /// the selectors. Invalid selectors must be ignored, not raised.
    fn remove_elements(&self, root: &NodeRef<'_>, selectors: &[String]);

    /// Output-path normalization.
    fn sanitize_path(&self, path: &str) -> String;

    /// Strips unsafe constructs from markup before fragment parsing.
    fn sanitize(&self, markup: &str) -> String;
}
