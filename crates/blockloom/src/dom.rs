// ABOUTME: Node traversal helpers over dom_query trees.
// ABOUTME: Element-children, containment and common-ancestor walks used by strategies.

use dom_query::NodeRef;

/// Direct element children of a node, in document order.
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(|c| c.is_element())
        .collect()
}

/// First direct element child, if any.
pub fn first_element_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.children().into_iter().find(|c| c.is_element())
}

/// Direct text-node children of a node, in document order.
pub fn text_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(|c| c.is_text())
        .collect()
}

/// Is `other` the node itself or one of its descendants?
pub fn contains(node: &NodeRef, other: &NodeRef) -> bool {
    if node.id == other.id {
        return true;
    }
    let mut current = other.parent();
    while let Some(parent) = current {
        if parent.id == node.id {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Lowest common ancestor of a set of nodes.
///
/// A single node is its own ancestor here, matching the range-based
/// behavior the carousel grouping relies on.
pub fn common_ancestor<'a>(nodes: &[NodeRef<'a>]) -> Option<NodeRef<'a>> {
    let first = nodes.first()?;
    if nodes.len() == 1 {
        return Some(*first);
    }

    // Chain of the first node, deepest first.
    let mut chain: Vec<NodeRef<'a>> = vec![*first];
    let mut current = first.parent();
    while let Some(parent) = current {
        current = parent.parent();
        chain.push(parent);
    }

    // For every other node, find the deepest chain entry on its ancestor
    // path; the answer is the shallowest of those hits.
    let mut deepest = 0;
    for node in &nodes[1..] {
        let mut candidate = Some(*node);
        let mut found = None;
        while let Some(n) = candidate {
            if let Some(pos) = chain.iter().position(|c| c.id == n.id) {
                found = Some(pos);
                break;
            }
            candidate = n.parent();
        }
        match found {
            Some(pos) => deepest = deepest.max(pos),
            None => return None,
        }
    }
    chain.get(deepest).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    #[test]
    fn element_children_skips_text_nodes() {
        let doc = Document::from("<div id='a'>one<span>two</span>three<b>four</b></div>");
        let div = *doc.select("#a").nodes().first().unwrap();
        let children = element_children(&div);
        assert_eq!(children.len(), 2);
        let texts = text_children(&div);
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn contains_is_reflexive_and_deep() {
        let doc = Document::from("<div id='a'><p><em id='b'>x</em></p></div><div id='c'></div>");
        let a = *doc.select("#a").nodes().first().unwrap();
        let b = *doc.select("#b").nodes().first().unwrap();
        let c = *doc.select("#c").nodes().first().unwrap();
        assert!(contains(&a, &a));
        assert!(contains(&a, &b));
        assert!(!contains(&b, &a));
        assert!(!contains(&a, &c));
    }

    #[test]
    fn common_ancestor_of_siblings_is_parent() {
        let doc = Document::from(
            "<ul id='list'><li><img id='x'></li><li><img id='y'></li></ul>",
        );
        let x = *doc.select("#x").nodes().first().unwrap();
        let y = *doc.select("#y").nodes().first().unwrap();
        let anc = common_ancestor(&[x, y]).unwrap();
        let list = *doc.select("#list").nodes().first().unwrap();
        assert_eq!(anc.id, list.id);
    }

    #[test]
    fn common_ancestor_of_single_node_is_itself() {
        let doc = Document::from("<p id='only'>x</p>");
        let p = *doc.select("#only").nodes().first().unwrap();
        assert_eq!(common_ancestor(&[p]).unwrap().id, p.id);
    }
}
