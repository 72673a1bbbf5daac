// ABOUTME: Block cell builders: matrix construction from row specs, config from field specs.
// ABOUTME: Implements conditional field selection and per-field container synthesis.

//! Block cell construction.
//!
//! Two independent modes share the cell evaluator:
//! - **matrix mode** builds ordered rows of columns from row specs;
//! - **config mode** builds a named-field mapping, where each field is a
//!   single spec or an ordered list of `[condition, value, params]`
//!   triples. The first triple whose condition selector matches wins,
//!   by order, not by specificity.

use dom_query::{Document, NodeRef, Selection};

use crate::cells::{append_cell_value, evaluate_cell, BlockCells, CellParams, CellValue};
use crate::host::Host;
use crate::selector;

/// One row of a matrix spec.
#[derive(Debug, Clone)]
pub enum RowSpec<'a> {
    /// A raw node kept as the row's only column.
    Node(NodeRef<'a>),
    /// Column specs, each evaluated independently.
    Cols(Vec<String>),
    /// A single spec whose evaluated values become the row's columns.
    Spec(String),
}

/// One `[condition, value, params]` triple of a conditional field.
#[derive(Debug, Clone, Default)]
pub struct ConditionalSpec {
    pub condition: String,
    pub value: String,
    pub params: CellParams,
}

/// A config field: a plain spec or an ordered conditional list.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Spec(String),
    Conditional(Vec<ConditionalSpec>),
}

/// Builds matrix-shaped block cells from row specs.
///
/// Rows whose every column evaluates to nothing are dropped; the order of
/// surviving rows is preserved.
pub fn build_block_cells<'a>(
    doc: &'a Document,
    element: &NodeRef<'a>,
    rows: &[RowSpec<'a>],
    host: &dyn Host,
) -> BlockCells<'a> {
    let mut out = Vec::new();
    for row in rows {
        let cells: Vec<CellValue<'a>> = match row {
            RowSpec::Node(node) => vec![CellValue::Node(*node)],
            RowSpec::Cols(specs) => specs
                .iter()
                .map(|spec| {
                    CellValue::List(evaluate_cell(doc, element, spec, &CellParams::default(), host))
                })
                .collect(),
            RowSpec::Spec(spec) => evaluate_cell(doc, element, spec, &CellParams::default(), host),
        };
        if cells.iter().any(CellValue::is_truthy) {
            out.push(cells);
        }
    }
    BlockCells::Matrix(out)
}

/// Builds config-shaped block cells from field specs.
///
/// Conditional fields with no matching condition are omitted entirely; a
/// matched rule that evaluates to nothing still populates the field with
/// an empty container, so "no rule matched" and "rule matched, produced
/// nothing" stay distinguishable.
pub fn build_block_config<'a>(
    doc: &'a Document,
    element: &NodeRef<'a>,
    fields: &[(String, FieldSpec)],
    host: &dyn Host,
) -> BlockCells<'a> {
    let mut out = Vec::new();
    for (name, field) in fields {
        let (spec, params) = match field {
            FieldSpec::Spec(spec) => (spec.clone(), CellParams::default()),
            FieldSpec::Conditional(list) => {
                match list.iter().find(|c| condition_matches(element, &c.condition)) {
                    Some(chosen) => (chosen.value.clone(), chosen.params.clone()),
                    None => continue,
                }
            }
        };
        let values = evaluate_cell(doc, element, &spec, &params, host);
        let container = doc.tree.new_element("p");
        for value in &values {
            append_cell_value(doc, &container, value);
        }
        out.push((name.clone(), CellValue::Node(container)));
    }
    BlockCells::Config(out)
}

fn condition_matches(element: &NodeRef, condition: &str) -> bool {
    selector::is_valid_css_selector(condition)
        && !Selection::from(*element)
            .select(condition)
            .nodes()
            .is_empty()
}
