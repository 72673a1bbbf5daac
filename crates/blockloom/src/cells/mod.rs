// ABOUTME: Cell data model shared by the evaluator, the builders and the host.
// ABOUTME: Defines CellValue, BlockCells and the emptiness predicate gating materialization.

//! Cell values and block cell collections.
//!
//! A cell is one atomic extracted value destined for a block's matrix
//! position or config field. Cells are either text, a reference to a live
//! DOM node, or an ordered sequence of both. Block cells come in two
//! shapes: a two-dimensional matrix of rows and columns, or a named-field
//! mapping whose values are synthesized container elements. A value is
//! tagged with exactly one shape, never both.

mod build;
mod evaluate;

pub use build::{build_block_cells, build_block_config, ConditionalSpec, FieldSpec, RowSpec};
pub use evaluate::{evaluate_cell, evaluate_cells, CellParams};

use std::fmt;

use dom_query::{Document, NodeRef};

/// One atomic cell value.
///
/// Absent cells are omitted from output rather than carried as empty
/// strings; an empty `Text` only appears where extraction genuinely
/// produced empty text.
#[derive(Clone)]
pub enum CellValue<'a> {
    Text(String),
    Node(NodeRef<'a>),
    List(Vec<CellValue<'a>>),
}

impl CellValue<'_> {
    /// Mirrors the truthiness rule used to keep or drop matrix rows:
    /// empty text and empty sequences are falsy, nodes are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Node(_) => true,
            CellValue::List(v) => !v.is_empty(),
        }
    }

    /// Text content of the value, if it is textual or a text-only node.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Node(n) => {
                if crate::dom::element_children(n).is_empty() {
                    Some(n.text().to_string())
                } else {
                    None
                }
            }
            CellValue::List(_) => None,
        }
    }
}

impl fmt::Debug for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "Text({s:?})"),
            CellValue::Node(n) => {
                let name = n.node_name().map(|t| t.to_string()).unwrap_or_default();
                write!(f, "Node(<{name}>)")
            }
            CellValue::List(v) => f.debug_list().entries(v.iter()).finish(),
        }
    }
}

/// A matrix row: one `CellValue` per column. Column values produced from
/// explicit column specs are `List`s; single-spec rows carry scalars.
pub type CellRow<'a> = Vec<CellValue<'a>>;

/// Cell data for one block, tagged by shape.
#[derive(Debug, Clone)]
pub enum BlockCells<'a> {
    /// Ordered rows of ordered columns.
    Matrix(Vec<CellRow<'a>>),
    /// Ordered field-name/value pairs.
    Config(Vec<(String, CellValue<'a>)>),
}

impl BlockCells<'_> {
    /// A value is empty iff it is a zero-length matrix or a zero-key
    /// mapping. A mapping holding an empty container field is not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            BlockCells::Matrix(rows) => rows.is_empty(),
            BlockCells::Config(fields) => fields.is_empty(),
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, BlockCells::Matrix(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, BlockCells::Config(_))
    }
}

impl Default for BlockCells<'_> {
    fn default() -> Self {
        BlockCells::Matrix(Vec::new())
    }
}

/// Appends a cell value to a container node, flattening sequences.
///
/// Node values are re-parented into the container; text values become new
/// text nodes in the container's tree.
pub fn append_cell_value<'a>(doc: &'a Document, target: &NodeRef<'a>, value: &CellValue<'a>) {
    match value {
        CellValue::Text(s) => {
            let text = doc.tree.new_text(s.as_str());
            target.append_child(&text);
        }
        CellValue::Node(node) => {
            target.append_child(node);
        }
        CellValue::List(values) => {
            for v in values {
                append_cell_value(doc, target, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_matches_shape() {
        assert!(BlockCells::Matrix(vec![]).is_empty());
        assert!(BlockCells::Config(vec![]).is_empty());
        assert!(!BlockCells::Matrix(vec![vec![CellValue::Text("x".into())]]).is_empty());
    }

    #[test]
    fn config_with_empty_container_is_not_empty() {
        let doc = Document::from("<div></div>");
        let container = doc.tree.new_element("p");
        let cells = BlockCells::Config(vec![("Field".into(), CellValue::Node(container))]);
        assert!(!cells.is_empty());
    }

    #[test]
    fn truthiness() {
        assert!(!CellValue::Text(String::new()).is_truthy());
        assert!(CellValue::Text("x".into()).is_truthy());
        assert!(!CellValue::List(vec![]).is_truthy());
        assert!(CellValue::List(vec![CellValue::Text(String::new())]).is_truthy());
    }

    #[test]
    fn append_flattens_lists() {
        let doc = Document::from("<div id='a'><span id='b'>s</span></div>");
        let b = *doc.select("#b").nodes().first().unwrap();
        let container = doc.tree.new_element("p");
        let value = CellValue::List(vec![
            CellValue::Text("hello ".into()),
            CellValue::Node(b),
        ]);
        append_cell_value(&doc, &container, &value);
        assert_eq!(container.text().to_string(), "hello s");
        // the span was moved, not copied
        assert!(doc.select("#a span").nodes().is_empty());
    }
}
