//! Host scene graph seam.
//!
//! `Canvas` is everything the materializer needs from a design tool: node
//! factories, field setters, font loading and viewport control. `SceneGraph`
//! is the in-memory implementation used by the binary and the tests.

use super::instruction::FontName;
use crate::error::DesignError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

const LAYER_FIELDS: &[&str] = &[
    "name", "visible", "locked", "opacity", "blendMode", "isMask", "effects",
    "x", "y", "width", "height", "rotation", "constraints", "layoutAlign", "layoutGrow",
];

const GEOMETRY_FIELDS: &[&str] = &[
    "fills", "strokes", "strokeWeight", "strokeAlign", "dashPattern",
];

const CORNER_FIELDS: &[&str] = &[
    "cornerRadius", "topLeftRadius", "topRightRadius", "bottomLeftRadius", "bottomRightRadius",
];

const CONTAINER_FIELDS: &[&str] = &[
    "layoutMode", "primaryAxisSizingMode", "counterAxisSizingMode",
    "primaryAxisAlignItems", "counterAxisAlignItems",
    "paddingLeft", "paddingRight", "paddingTop", "paddingBottom",
    "itemSpacing", "clipsContent",
];

const ELLIPSE_FIELDS: &[&str] = &["arcData"];

const LINE_FIELDS: &[&str] = &["strokeCap"];

/// Text fields that can only be written once the node's font is loaded.
const FONT_BOUND_FIELDS: &[&str] = &[
    "characters", "fontSize", "fontName", "letterSpacing", "lineHeight",
    "textCase", "textDecoration", "paragraphSpacing", "paragraphIndent",
];

const TEXT_LAYOUT_FIELDS: &[&str] = &[
    "textAlignHorizontal", "textAlignVertical", "textAutoResize",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Frame,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Component,
}

impl NodeKind {
    fn field_groups(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Frame | Self::Component => {
                &[LAYER_FIELDS, GEOMETRY_FIELDS, CORNER_FIELDS, CONTAINER_FIELDS]
            }
            Self::Rectangle => &[LAYER_FIELDS, GEOMETRY_FIELDS, CORNER_FIELDS],
            Self::Ellipse => &[LAYER_FIELDS, GEOMETRY_FIELDS, ELLIPSE_FIELDS],
            Self::Line => &[LAYER_FIELDS, GEOMETRY_FIELDS, LINE_FIELDS],
            Self::Text => &[LAYER_FIELDS, GEOMETRY_FIELDS, FONT_BOUND_FIELDS, TEXT_LAYOUT_FIELDS],
        }
    }

    /// Whether nodes of this kind expose a settable field named `field`.
    pub fn supports(self, field: &str) -> bool {
        self.field_groups().iter().any(|group| group.contains(&field))
    }

    pub fn accepts_children(self) -> bool {
        matches!(self, Self::Frame | Self::Component)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0:{}", self.0)
    }
}

#[async_trait]
pub trait Canvas: Send {
    fn create_node(&mut self, kind: NodeKind) -> NodeId;

    fn set_property(&mut self, node: NodeId, field: &str, value: Value) -> Result<(), DesignError>;

    /// Makes a font's glyphs available. Must complete before text content
    /// using that font is written.
    async fn load_font(&mut self, font: &FontName) -> Result<(), DesignError>;

    /// Moves `child` to the end of `parent`'s children, detaching it from any
    /// previous parent.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DesignError>;

    fn scroll_and_zoom_into_view(&mut self, nodes: &[NodeId]);
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    loaded_fonts: HashSet<FontName>,
    viewport: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.parent.is_none()).map(|n| n.id).collect()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Capability probe: true when `field` has been assigned on the node.
    pub fn has_property(&self, id: NodeId, field: &str) -> bool {
        self.node(id).is_some_and(|n| n.properties.contains_key(field))
    }

    pub fn property(&self, id: NodeId, field: &str) -> Option<&Value> {
        self.node(id).and_then(|n| n.properties.get(field))
    }

    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.loaded_fonts.contains(font)
    }

    pub fn viewport(&self) -> &[NodeId] {
        &self.viewport
    }

    pub fn to_json(&self, id: NodeId) -> Value {
        let Some(node) = self.node(id) else {
            return Value::Null;
        };
        let children: Vec<Value> = node.children.iter().map(|c| self.to_json(*c)).collect();
        json!({
            "id": node.id.to_string(),
            "type": node.kind,
            "properties": node.properties,
            "children": children,
        })
    }

    /// Every top-level tree, in creation order.
    pub fn snapshot(&self) -> Value {
        Value::Array(self.roots().into_iter().map(|id| self.to_json(id)).collect())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, DesignError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DesignError::Scene(format!("Unknown node {id}")))
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn require_font(&self, font: &FontName, field: &str) -> Result<(), DesignError> {
        if self.is_font_loaded(font) {
            Ok(())
        } else {
            Err(DesignError::Scene(format!(
                "Cannot write '{field}': font \"{font}\" is not loaded"
            )))
        }
    }
}

#[async_trait]
impl Canvas for SceneGraph {
    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut properties = Map::new();
        if kind == NodeKind::Text {
            properties.insert("fontName".into(), json!(FontName::default()));
        }
        self.nodes.push(SceneNode {
            id,
            kind,
            parent: None,
            children: Vec::new(),
            properties,
        });
        id
    }

    fn set_property(&mut self, node: NodeId, field: &str, value: Value) -> Result<(), DesignError> {
        let (kind, current_font) = {
            let n = self.node_mut(node)?;
            let font = n.properties.get("fontName").cloned();
            (n.kind, font)
        };

        if !kind.supports(field) {
            return Err(DesignError::Scene(format!("{kind:?} node has no field '{field}'")));
        }

        if kind == NodeKind::Text && FONT_BOUND_FIELDS.contains(&field) {
            let font = if field == "fontName" {
                serde_json::from_value::<FontName>(value.clone())
                    .map_err(|e| DesignError::InvalidFont(e.to_string()))?
            } else {
                current_font
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default()
            };
            self.require_font(&font, field)?;
        }

        self.node_mut(node)?.properties.insert(field.to_string(), value);
        Ok(())
    }

    async fn load_font(&mut self, font: &FontName) -> Result<(), DesignError> {
        log::debug!("Loading font {font}");
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DesignError> {
        let parent_kind = self.node_mut(parent)?.kind;
        if !parent_kind.accepts_children() {
            return Err(DesignError::Scene(format!("{parent_kind:?} node cannot have children")));
        }
        if self.is_ancestor(child, parent) {
            return Err(DesignError::Scene(format!("Cannot append {child} inside itself")));
        }

        if let Some(previous) = self.node_mut(child)?.parent.take() {
            self.node_mut(previous)?.children.retain(|c| *c != child);
        }
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn scroll_and_zoom_into_view(&mut self, nodes: &[NodeId]) {
        self.viewport = nodes.to_vec();
    }
}
