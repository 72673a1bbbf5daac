// ABOUTME: The three-form removal algorithm used by both cleanup phases.
// ABOUTME: Element selectors, ::text(<literal>) text-node removal, attribute-object matchers.

use dom_query::{NodeRef, Selection};

use crate::host::Host;
use crate::rules::CleanupSelector;
use crate::selector;

/// Removes everything under `root` addressed by the cleanup selectors.
///
/// Forms are processed independently and in order: plain element selectors
/// (bulk removal through the host), pseudo-text selectors (only text nodes
/// whose trimmed content equals the parenthesized literal), then
/// structured attribute matchers.
pub fn process_removal(root: &NodeRef<'_>, selectors: &[CleanupSelector], host: &dyn Host) {
    let element_selectors: Vec<String> = selectors
        .iter()
        .filter_map(|sel| match sel {
            CleanupSelector::Css(css) if !selector::is_text_selector(css) => Some(css.clone()),
            _ => None,
        })
        .collect();
    host.remove_elements(root, &element_selectors);

    for sel in selectors {
        let CleanupSelector::Css(css) = sel else {
            continue;
        };
        if !selector::is_text_selector(css) {
            continue;
        }
        remove_matching_text(root, css);
    }

    for sel in selectors {
        let CleanupSelector::Attribute {
            attribute,
            property,
            value,
        } = sel
        else {
            continue;
        };
        remove_by_attribute(root, attribute, property.as_deref(), value);
    }
}

fn remove_matching_text(root: &NodeRef<'_>, css: &str) {
    let parsed = selector::parse_search(css);
    let Some(search) = parsed.search else {
        return;
    };
    if !selector::is_valid_css_selector(&parsed.selector) {
        return;
    }
    let matches: Vec<NodeRef> = Selection::from(*root)
        .select(parsed.selector.as_str())
        .nodes()
        .to_vec();
    for el in matches {
        for child in el.children() {
            if child.is_text() && child.text().trim() == search {
                child.remove_from_parent();
            }
        }
    }
}

fn remove_by_attribute(root: &NodeRef<'_>, attribute: &str, property: Option<&str>, value: &str) {
    let attr_query = format!("[{attribute}]");
    if !selector::is_valid_css_selector(&attr_query) {
        return;
    }
    let matches: Vec<NodeRef> = Selection::from(*root)
        .select(attr_query.as_str())
        .nodes()
        .to_vec();
    for el in matches {
        let matched = match property {
            Some(p) if !p.is_empty() && p != "-" => el
                .attr(p)
                .map(|v| v.contains(value))
                .unwrap_or(false),
            _ => attribute_contains(&el, attribute, value),
        };
        if matched {
            el.remove_from_parent();
        }
    }
}

fn attribute_contains(el: &NodeRef<'_>, attribute: &str, value: &str) -> bool {
    let Some(attr) = el.attr(attribute) else {
        return false;
    };
    if attribute == "class" {
        // compare against the joined class list, not the raw attribute
        let joined = attr.split_whitespace().collect::<Vec<_>>().join(" ");
        joined.contains(value)
    } else {
        attr.contains(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;
    use dom_query::Document;

    fn root_of(doc: &Document) -> NodeRef<'_> {
        *doc.select("main").nodes().first().unwrap()
    }

    #[test]
    fn element_selectors_remove_subtrees() {
        let doc = Document::from("<main><div class='ads'><p>x</p></div><p>keep</p></main>");
        let host = DefaultHost::new();
        process_removal(&root_of(&doc), &[".ads".into()], &host);
        assert!(doc.select(".ads").nodes().is_empty());
        assert_eq!(doc.select("main p").length(), 1);
    }

    #[test]
    fn text_selector_removes_only_matching_text_nodes() {
        let doc = Document::from("<main><p>Draft<span>child</span>Keep</p></main>");
        let host = DefaultHost::new();
        process_removal(&root_of(&doc), &["p::text(Draft)".into()], &host);
        let p = doc.select("main p");
        assert_eq!(p.text().to_string(), "childKeep");
        assert_eq!(p.select("span").length(), 1);
    }

    #[test]
    fn text_selector_without_literal_removes_nothing() {
        let doc = Document::from("<main><p>Draft</p></main>");
        let host = DefaultHost::new();
        process_removal(&root_of(&doc), &["p::text".into()], &host);
        assert_eq!(doc.select("main p").text().to_string(), "Draft");
    }

    #[test]
    fn attribute_matcher_uses_substring_containment() {
        let doc = Document::from(
            "<main><div data-module='promo-banner'>x</div><div data-module='content'>y</div></main>",
        );
        let host = DefaultHost::new();
        let selectors = [CleanupSelector::Attribute {
            attribute: "data-module".to_string(),
            property: None,
            value: "promo".to_string(),
        }];
        process_removal(&root_of(&doc), &selectors, &host);
        assert_eq!(doc.select("main div").length(), 1);
        assert_eq!(doc.select("main div").text().to_string(), "y");
    }

    #[test]
    fn class_attribute_matches_joined_class_list() {
        let doc = Document::from(
            "<main><div class='a   promo-box  b'>x</div><div class='clean'>y</div></main>",
        );
        let host = DefaultHost::new();
        let selectors = [CleanupSelector::Attribute {
            attribute: "class".to_string(),
            property: Some("-".to_string()),
            value: "promo-box b".to_string(),
        }];
        process_removal(&root_of(&doc), &selectors, &host);
        assert_eq!(doc.select("main div").length(), 1);
    }

    #[test]
    fn property_matcher_reads_the_named_attribute() {
        let doc = Document::from(
            "<main><a href='https://spam.test/x' rel='nofollow'>x</a><a href='https://ok.test/'>y</a></main>",
        );
        let host = DefaultHost::new();
        let selectors = [CleanupSelector::Attribute {
            attribute: "rel".to_string(),
            property: Some("href".to_string()),
            value: "spam".to_string(),
        }];
        process_removal(&root_of(&doc), &selectors, &host);
        assert_eq!(doc.select("main a").length(), 1);
        assert_eq!(doc.select("main a").text().to_string(), "y");
    }

    #[test]
    fn invalid_selectors_are_ignored() {
        let doc = Document::from("<main><p>stay</p></main>");
        let host = DefaultHost::new();
        process_removal(
            &root_of(&doc),
            &["[[[bad".into(), "::text(Draft)".into()],
            &host,
        );
        assert_eq!(doc.select("main p").length(), 1);
    }
}
