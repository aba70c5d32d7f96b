use crate::dom::{Document, NodeId};
use tracing::debug;

pub const RESPONSIVE_IMAGE_CLASS: &str = "img-responsive";
pub const BLOG_BOX_CLASS: &str = "blog-box";
pub const SHADOW_RAISED: &str = "5px 5px 18px #969696";
pub const SHADOW_RESTING: &str = "3px 3px 10px #ababab";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter,
    Leave,
}

/// Runs once when the page is ready: every image becomes responsive.
pub fn ready(doc: &mut Document) -> usize {
    let images = doc.by_tag("img");
    for node in &images {
        if let Some(element) = doc.get_mut(*node) {
            element.add_class(RESPONSIVE_IMAGE_CLASS);
        }
    }
    debug!("marked {} images responsive", images.len());
    images.len()
}

/// Applies the hover shadow. Returns false for elements that are not blog boxes.
pub fn hover(doc: &mut Document, node: NodeId, event: HoverEvent) -> bool {
    let is_blog_box = doc
        .get(node)
        .is_some_and(|element| element.has_class(BLOG_BOX_CLASS));
    if !is_blog_box {
        return false;
    }

    let shadow = match event {
        HoverEvent::Enter => SHADOW_RAISED,
        HoverEvent::Leave => SHADOW_RESTING,
    };
    doc.set_style(node, "box-shadow", shadow)
}
