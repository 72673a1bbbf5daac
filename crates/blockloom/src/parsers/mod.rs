// ABOUTME: Parse strategies: pluggable functions mapping a candidate element to block cells.
// ABOUTME: Registry keyed by rule type, with the generic block strategy as fallback.

//! Parse strategies.
//!
//! A strategy maps a candidate element plus merged params to [`BlockCells`].
//! A block rule can carry its own strategy; otherwise the registry supplies
//! one for the rule type, falling back to the generic block strategy.

pub mod block;
pub mod carousel;
pub mod columns;
pub mod metadata;

use dom_query::{Document, NodeRef};
use serde_json::{Map, Value};

use crate::cells::BlockCells;
use crate::host::Host;

/// Everything a strategy sees for one candidate element.
pub struct ParseContext<'a, 'h> {
    pub document: &'a Document,
    pub element: NodeRef<'a>,
    pub url: &'h str,
    /// Ambient source params merged with the rule's own params; rule
    /// params win on key conflicts.
    pub params: Map<String, Value>,
    pub host: &'h dyn Host,
}

/// A parse strategy function.
pub type ParseFn = for<'a, 'h> fn(&ParseContext<'a, 'h>) -> BlockCells<'a>;

/// Strategy registered for a rule type, if any.
pub fn strategy_for(block_type: &str) -> Option<ParseFn> {
    match block_type {
        "carousel" => Some(carousel::parse),
        "columns" => Some(columns::parse),
        "metadata" => Some(metadata::parse),
        _ => None,
    }
}
