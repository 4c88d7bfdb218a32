use super::instruction::{DesignInstruction, ElementKind};
use super::scene::{Canvas, NodeId, NodeKind};
use crate::error::DesignError;
use async_recursion::async_recursion;
use serde_json::Value;

pub struct Materializer;

impl Materializer {
    /// Builds the host node for `instruction` (and, for frames, its children),
    /// then appends it to `parent` when one is given.
    ///
    /// Unrecognized element types yield `Ok(None)` and their children are not
    /// visited.
    #[async_recursion]
    pub async fn materialize<C: Canvas>(
        canvas: &mut C,
        instruction: &DesignInstruction,
        parent: Option<NodeId>,
    ) -> Result<Option<NodeId>, DesignError> {
        let kind = match instruction.element_kind() {
            ElementKind::Frame => NodeKind::Frame,
            ElementKind::Text => NodeKind::Text,
            ElementKind::Rectangle => NodeKind::Rectangle,
            ElementKind::Ellipse => NodeKind::Ellipse,
            ElementKind::Line => NodeKind::Line,
            ElementKind::Component => NodeKind::Component,
            ElementKind::Unrecognized(tag) => {
                log::warn!("Skipping element with unknown type '{tag}'");
                return Ok(None);
            }
        };

        let node = canvas.create_node(kind);
        log::debug!("Created {kind:?} node {node}");

        if kind == NodeKind::Text {
            let font = instruction.font_name()?;
            canvas.load_font(&font).await?;
        }

        for (field, value) in ordered_properties(instruction) {
            if value.is_null() {
                log::debug!("Dropping '{field}': null value");
            } else if kind.supports(field) {
                canvas.set_property(node, field, value.clone())?;
            } else {
                log::debug!("Dropping '{field}': not a {kind:?} field");
            }
        }

        if kind == NodeKind::Frame {
            for child in &instruction.children {
                if let Some(child_node) = Self::materialize(canvas, child, None).await? {
                    canvas.append_child(node, child_node)?;
                }
            }
        }

        if let Some(parent) = parent {
            canvas.append_child(parent, node)?;
        }

        Ok(Some(node))
    }
}

/// `fontName` goes first so the node switches to the loaded font before any
/// text content is written.
fn ordered_properties(instruction: &DesignInstruction) -> impl Iterator<Item = (&str, &Value)> {
    let props = &instruction.properties;
    let font = props.iter().filter(|(k, _)| k.as_str() == "fontName");
    let rest = props.iter().filter(|(k, _)| k.as_str() != "fontName");
    font.chain(rest).map(|(k, v)| (k.as_str(), v))
}
