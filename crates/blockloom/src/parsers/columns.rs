// ABOUTME: Columns strategy: detects repeated sibling structures as column cells.
// ABOUTME: Groups descendants by (parent, tag) and picks the first group with multiple members.

use dom_query::{NodeRef, Selection};

use crate::cells::{BlockCells, CellValue};
use crate::dom;
use crate::parsers::{block, ParseContext};

/// Detects column layouts. With an explicit `cells` param the generic
/// strategy applies; otherwise the first repeated sibling group (same
/// parent, same tag, more than one member) becomes a single row with one
/// column per member.
pub fn parse<'a, 'h>(ctx: &ParseContext<'a, 'h>) -> BlockCells<'a> {
    // structural noise would skew the grouping
    Selection::from(ctx.element).select("script, style").remove();
    let divs: Vec<NodeRef<'a>> = Selection::from(ctx.element).select("div").nodes().to_vec();
    for div in divs {
        let has_media = !Selection::from(div)
            .select("img, svg, iframe")
            .nodes()
            .is_empty();
        if !has_media && div.text().replace('\n', "").trim().is_empty() {
            div.remove_from_parent();
        }
    }

    if ctx.params.contains_key("cells") {
        return block::parse(ctx);
    }

    match sibling_group(&ctx.element, |count| count > 1) {
        Some(members) => {
            BlockCells::Matrix(vec![members.into_iter().map(CellValue::Node).collect()])
        }
        None => BlockCells::Matrix(Vec::new()),
    }
}

/// First group of descendants sharing parent and tag whose size satisfies
/// the predicate, in document order of first occurrence. Falls back to the
/// element's direct children when no descendant group qualifies.
fn sibling_group<'a>(
    element: &NodeRef<'a>,
    accept: impl Fn(usize) -> bool,
) -> Option<Vec<NodeRef<'a>>> {
    let descendants: Vec<NodeRef<'a>> = Selection::from(*element).select("*").nodes().to_vec();

    let mut groups: Vec<(NodeRef<'a>, String, Vec<NodeRef<'a>>)> = Vec::new();
    for node in descendants {
        let Some(parent) = node.parent() else { continue };
        let Some(name) = node.node_name() else { continue };
        let name = name.to_string();
        match groups
            .iter_mut()
            .find(|(p, n, _)| p.id == parent.id && *n == name)
        {
            Some((_, _, members)) => members.push(node),
            None => groups.push((parent, name, vec![node])),
        }
    }

    for (_, _, members) in &groups {
        if accept(members.len()) {
            return Some(members.clone());
        }
    }

    let children = dom::element_children(element);
    if accept(children.len()) {
        return Some(children);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;
    use dom_query::Document;

    fn ctx<'a, 'h>(doc: &'a Document, host: &'h DefaultHost) -> ParseContext<'a, 'h> {
        ParseContext {
            document: doc,
            element: *doc.select(".cols").nodes().first().unwrap(),
            url: "https://example.test/",
            params: serde_json::Map::new(),
            host,
        }
    }

    #[test]
    fn repeated_siblings_become_one_row_of_columns() {
        let doc = Document::from(
            r#"<div class="cols"><div class="inner">
                <div class="col"><p>Left</p></div>
                <div class="col"><p>Right</p></div>
            </div></div>"#,
        );
        let host = DefaultHost::new();
        let BlockCells::Matrix(rows) = parse(&ctx(&doc, &host)) else {
            panic!("expected matrix");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn empty_divs_are_pruned_before_grouping() {
        let doc = Document::from(
            r#"<div class="cols">
                <div class="spacer">   </div>
                <section><p>a</p></section>
                <section><p>b</p></section>
                <section><p>c</p></section>
            </div>"#,
        );
        let host = DefaultHost::new();
        let BlockCells::Matrix(rows) = parse(&ctx(&doc, &host)) else {
            panic!("expected matrix");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert!(doc.select(".spacer").nodes().is_empty());
    }

    #[test]
    fn no_repeated_group_yields_empty_matrix() {
        let doc = Document::from(r#"<div class="cols"><p>only</p></div>"#);
        let host = DefaultHost::new();
        assert!(parse(&ctx(&doc, &host)).is_empty());
    }

    #[test]
    fn explicit_cells_param_uses_generic_strategy() {
        let doc = Document::from(
            r#"<div class="cols"><h2>H</h2><p>P</p><p>Q</p></div>"#,
        );
        let host = DefaultHost::new();
        let mut context = ctx(&doc, &host);
        context
            .params
            .insert("cells".to_string(), serde_json::json!([["h2"]]));
        let BlockCells::Matrix(rows) = parse(&context) else {
            panic!("expected matrix");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
    }
}
