// ABOUTME: Carousel strategy: one row per image, grouped by the images' common ancestor.
// ABOUTME: Slide content is the sibling markup of each image inside its slide container.

use dom_query::{NodeRef, Selection};

use crate::cells::{BlockCells, CellValue};
use crate::dom;
use crate::parsers::{block, ParseContext};

/// Builds carousel rows: any explicitly configured rows first, then one
/// `[image, slide content]` row per image found under the candidate.
///
/// A single child-less image short-circuits to a one-row carousel. Slide
/// containers are the children of the images' common ancestor; everything
/// in a slide that does not contain the image is treated as its content.
pub fn parse<'a, 'h>(ctx: &ParseContext<'a, 'h>) -> BlockCells<'a> {
    let BlockCells::Matrix(mut rows) = block::parse(ctx) else {
        return BlockCells::Matrix(Vec::new());
    };

    let images: Vec<NodeRef<'a>> = Selection::from(ctx.element)
        .select("img")
        .nodes()
        .to_vec();

    if images.len() == 1 && dom::element_children(&images[0]).is_empty() {
        return BlockCells::Matrix(vec![vec![CellValue::Node(images[0])]]);
    }
    if images.is_empty() {
        return BlockCells::Matrix(rows);
    }

    let common = dom::common_ancestor(&images);
    for img in &images {
        let slide = common.as_ref().and_then(|parent| {
            dom::element_children(parent)
                .into_iter()
                .find(|child| dom::contains(child, img))
        });
        let content: Vec<CellValue<'a>> = slide
            .map(|slide| {
                dom::element_children(&slide)
                    .into_iter()
                    .filter(|child| !dom::contains(child, img))
                    .map(CellValue::Node)
                    .collect()
            })
            .unwrap_or_default();
        rows.push(vec![CellValue::Node(*img), CellValue::List(content)]);
    }

    BlockCells::Matrix(rows)
}
