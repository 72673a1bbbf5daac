// ABOUTME: Reference host implementation: block tables, metadata, removal, sanitization.
// ABOUTME: Backs tests and stand-alone use; embedders supply their own Host for production.

use dom_query::{Document, NodeRef, Selection};

use crate::cells::{append_cell_value, BlockCells};
use crate::host::{BlockSpec, Host};
use crate::selector;

/// Reference implementation of the host capability interface.
///
/// Blocks are materialized as tables: a header row carrying the block name
/// (plus parenthesized variants), then one row per matrix row or config
/// entry. Config entries become two-column name/value rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHost;

impl DefaultHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for DefaultHost {
    fn create_block<'a>(&self, doc: &'a Document, spec: BlockSpec<'a>) -> Option<NodeRef<'a>> {
        let columns = match &spec.cells {
            BlockCells::Matrix(rows) => rows.iter().map(Vec::len).max().unwrap_or(1).max(1),
            BlockCells::Config(_) => 2,
        };

        let table = doc.tree.new_element("table");
        let header_row = doc.tree.new_element("tr");
        let header_cell = doc.tree.new_element("th");
        Selection::from(header_cell)
            .set_attr("colspan", &columns.to_string());
        let mut name = spec.name.clone();
        if !spec.variants.is_empty() {
            name.push_str(&format!(" ({})", spec.variants.join(", ")));
        }
        header_cell.append_child(&doc.tree.new_text(name.as_str()));
        header_row.append_child(&header_cell);
        table.append_child(&header_row);

        match &spec.cells {
            BlockCells::Matrix(rows) => {
                for row in rows {
                    let tr = doc.tree.new_element("tr");
                    for col in row {
                        let td = doc.tree.new_element("td");
                        append_cell_value(doc, &td, col);
                        tr.append_child(&td);
                    }
                    table.append_child(&tr);
                }
            }
            BlockCells::Config(fields) => {
                for (field, value) in fields {
                    let tr = doc.tree.new_element("tr");
                    let key = doc.tree.new_element("td");
                    key.append_child(&doc.tree.new_text(field.as_str()));
                    let val = doc.tree.new_element("td");
                    append_cell_value(doc, &val, value);
                    tr.append_child(&key);
                    tr.append_child(&val);
                    table.append_child(&tr);
                }
            }
        }

        Some(table)
    }

    fn compute_block_name(&self, block_type: &str) -> String {
        block_type
            .split(|c: char| c == '-' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn get_metadata(&self, doc: &Document) -> Vec<(String, String)> {
        let mut meta = Vec::new();

        let title = meta_content(doc, "meta[property='og:title']").or_else(|| {
            doc.select("title")
                .nodes()
                .first()
                .map(|t| t.text().trim().to_string())
                .filter(|t| !t.is_empty())
        });
        if let Some(title) = title {
            meta.push(("Title".to_string(), title));
        }

        let description = meta_content(doc, "meta[property='og:description']")
            .or_else(|| meta_content(doc, "meta[name='description']"));
        if let Some(description) = description {
            meta.push(("Description".to_string(), description));
        }

        let image = meta_content(doc, "meta[property='og:image']")
            .or_else(|| meta_content(doc, "meta[name='twitter:image']"));
        if let Some(image) = image {
            meta.push(("Image".to_string(), image));
        }

        if let Some(author) = meta_content(doc, "meta[name='author']") {
            meta.push(("Author".to_string(), author));
        }

        meta
    }

    fn remove_elements(&self, root: &NodeRef<'_>, selectors: &[String]) {
        for sel in selectors {
            if !selector::is_valid_css_selector(sel) {
                continue;
            }
            Selection::from(*root).select(sel.as_str()).remove();
        }
    }

    fn sanitize_path(&self, path: &str) -> String {
        path.split('/')
            .map(sanitize_segment)
            .collect::<Vec<_>>()
            .join("/")
    }

    fn sanitize(&self, markup: &str) -> String {
        let allowed_tags = [
            "p", "br", "strong", "b", "em", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
            "ol", "li", "blockquote", "pre", "code", "img", "a", "span", "div", "table", "tr",
            "th", "td", "caption", "figure", "figcaption", "picture",
        ];

        let mut builder = ammonia::Builder::new();
        builder.tags(allowed_tags.iter().copied().collect());

        builder.add_tag_attributes("a", &["href", "class"]);
        builder.add_tag_attributes(
            "img",
            &["src", "alt", "width", "height", "srcset", "sizes", "class"],
        );
        builder.add_tag_attributes("div", &["class", "id"]);
        builder.add_tag_attributes("span", &["class", "id"]);
        builder.add_tag_attributes("p", &["class"]);
        builder.add_tag_attributes("table", &["class"]);
        builder.add_tag_attributes("th", &["colspan"]);
        builder.add_tag_attributes("td", &["colspan"]);
        for h in &["h1", "h2", "h3", "h4", "h5", "h6"] {
            builder.add_tag_attributes(h, &["id"]);
        }

        builder
            .url_schemes(["http", "https", "mailto"].iter().copied().collect())
            .clean(markup)
            .to_string()
    }
}

fn meta_content(doc: &Document, selector: &str) -> Option<String> {
    let content = doc.select(selector).nodes().first()?.attr("content")?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn sanitize_segment(segment: &str) -> String {
    let mut out = String::new();
    let mut previous_dash = false;
    for ch in segment.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' {
            out.push(ch);
            previous_dash = false;
        } else if !previous_dash {
            out.push('-');
            previous_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CellValue;

    #[test]
    fn block_names_are_title_cased() {
        let host = DefaultHost::new();
        assert_eq!(host.compute_block_name("hero"), "Hero");
        assert_eq!(host.compute_block_name("hero-banner"), "Hero Banner");
        assert_eq!(host.compute_block_name("two  words"), "Two Words");
        assert_eq!(host.compute_block_name(""), "");
    }

    #[test]
    fn creates_block_table_with_header() {
        let host = DefaultHost::new();
        let doc = Document::from("<div><h1 id='t'>Title</h1></div>");
        let h1 = *doc.select("#t").nodes().first().unwrap();
        let spec = BlockSpec {
            name: "Hero".to_string(),
            variants: vec!["dark".to_string(), "wide".to_string()],
            cells: BlockCells::Matrix(vec![vec![
                CellValue::Node(h1),
                CellValue::Text("Sub".to_string()),
            ]]),
        };
        let block = host.create_block(&doc, spec).unwrap();
        let sel = Selection::from(block);
        assert_eq!(sel.select("th").text().to_string(), "Hero (dark, wide)");
        assert_eq!(sel.select("tr").length(), 2);
        assert_eq!(sel.select("td").length(), 2);
        assert!(sel.text().contains("Title"));
        assert!(sel.text().contains("Sub"));
    }

    #[test]
    fn creates_config_block_as_name_value_rows() {
        let host = DefaultHost::new();
        let doc = Document::from("<div></div>");
        let spec = BlockSpec {
            name: "Metadata".to_string(),
            variants: vec![],
            cells: BlockCells::Config(vec![(
                "Title".to_string(),
                CellValue::Text("Hello".to_string()),
            )]),
        };
        let block = host.create_block(&doc, spec).unwrap();
        let sel = Selection::from(block);
        assert_eq!(sel.select("td").length(), 2);
        assert!(sel.text().contains("Title"));
        assert!(sel.text().contains("Hello"));
    }

    #[test]
    fn extracts_baseline_metadata() {
        let host = DefaultHost::new();
        let doc = Document::from(
            r#"<html><head>
                <title>Fallback</title>
                <meta property="og:title" content="Page Title">
                <meta name="description" content="About the page">
                <meta property="og:image" content="https://x.test/og.jpg">
                <meta name="author" content="Jane">
            </head><body></body></html>"#,
        );
        let meta = host.get_metadata(&doc);
        assert_eq!(
            meta,
            vec![
                ("Title".to_string(), "Page Title".to_string()),
                ("Description".to_string(), "About the page".to_string()),
                ("Image".to_string(), "https://x.test/og.jpg".to_string()),
                ("Author".to_string(), "Jane".to_string()),
            ]
        );
    }

    #[test]
    fn metadata_title_falls_back_to_title_tag() {
        let host = DefaultHost::new();
        let doc = Document::from("<html><head><title> Plain </title></head><body></body></html>");
        let meta = host.get_metadata(&doc);
        assert_eq!(meta, vec![("Title".to_string(), "Plain".to_string())]);
    }

    #[test]
    fn removes_elements_and_skips_invalid_selectors() {
        let host = DefaultHost::new();
        let doc = Document::from("<div id='r'><p class='a'>x</p><p class='b'>y</p></div>");
        let root = *doc.select("#r").nodes().first().unwrap();
        host.remove_elements(&root, &[".a".to_string(), "[[[bad".to_string()]);
        assert!(doc.select(".a").nodes().is_empty());
        assert!(!doc.select(".b").nodes().is_empty());
    }

    #[test]
    fn sanitizes_paths_per_segment() {
        let host = DefaultHost::new();
        assert_eq!(host.sanitize_path("/a/b-c/index"), "/a/b-c/index");
        assert_eq!(host.sanitize_path("/A b/ügly__name"), "/a-b/gly-name");
        assert_eq!(host.sanitize_path("/keep.ext/x"), "/keep.ext/x");
    }

    #[test]
    fn sanitize_strips_scripts_and_handlers() {
        let host = DefaultHost::new();
        let out = host.sanitize("<div onclick=\"evil()\"><script>evil()</script><p>ok</p></div>");
        assert!(!out.contains("script"));
        assert!(!out.contains("onclick"));
        assert!(out.contains("<p>ok</p>"));
    }
}
