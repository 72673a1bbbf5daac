// ABOUTME: Generic block strategy: interprets the `cells` param as rows or fields.
// ABOUTME: Strings select row nodes, arrays build matrices, objects build configs.

use dom_query::Selection;

use crate::cells::{
    build_block_cells, build_block_config, BlockCells, CellParams, ConditionalSpec, FieldSpec,
    RowSpec,
};
use crate::parsers::ParseContext;
use crate::selector;
use serde_json::Value;

/// The generic strategy. The `cells` param drives the shape:
/// - a selector string: every match becomes one single-column row;
/// - an array: row specs (single spec or column-spec arrays);
/// - an object: field name to spec or `[condition, value, params]` list;
/// - absent: an empty matrix.
pub fn parse<'a, 'h>(ctx: &ParseContext<'a, 'h>) -> BlockCells<'a> {
    match ctx.params.get("cells") {
        Some(Value::String(sel)) => {
            let rows: Vec<RowSpec<'a>> = if selector::is_valid_css_selector(sel) {
                Selection::from(ctx.element)
                    .select(sel.as_str())
                    .nodes()
                    .iter()
                    .map(|n| RowSpec::Node(*n))
                    .collect()
            } else {
                Vec::new()
            };
            build_block_cells(ctx.document, &ctx.element, &rows, ctx.host)
        }
        Some(Value::Array(rows)) => {
            let specs: Vec<RowSpec<'a>> = rows.iter().filter_map(row_spec).collect();
            build_block_cells(ctx.document, &ctx.element, &specs, ctx.host)
        }
        Some(Value::Object(fields)) => {
            let specs: Vec<(String, FieldSpec)> = fields
                .iter()
                .filter_map(|(name, value)| field_spec(name, value))
                .collect();
            build_block_config(ctx.document, &ctx.element, &specs, ctx.host)
        }
        _ => BlockCells::Matrix(Vec::new()),
    }
}

fn row_spec<'a>(value: &Value) -> Option<RowSpec<'a>> {
    match value {
        Value::String(spec) => Some(RowSpec::Spec(spec.clone())),
        Value::Array(cols) => Some(RowSpec::Cols(
            cols.iter()
                .filter_map(|c| c.as_str().map(str::to_string))
                .collect(),
        )),
        _ => None,
    }
}

fn field_spec(name: &str, value: &Value) -> Option<(String, FieldSpec)> {
    match value {
        Value::String(spec) => Some((name.to_string(), FieldSpec::Spec(spec.clone()))),
        Value::Array(list) => {
            let triples = list
                .iter()
                .filter_map(|triple| {
                    let parts = triple.as_array()?;
                    Some(ConditionalSpec {
                        condition: parts.first()?.as_str()?.to_string(),
                        value: parts.get(1)?.as_str()?.to_string(),
                        params: parts
                            .get(2)
                            .map(CellParams::from_value)
                            .unwrap_or_default(),
                    })
                })
                .collect();
            Some((name.to_string(), FieldSpec::Conditional(triples)))
        }
        _ => None,
    }
}
