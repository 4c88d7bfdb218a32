use crate::error::DesignError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of the instruction tree returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DesignInstruction {
    #[serde(rename = "type")]
    #[schemars(description = "frame | text | rectangle | ellipse | line | component")]
    pub kind: String,

    #[serde(default)]
    #[schemars(description = "Host node fields to assign, keyed by field name.")]
    pub properties: Map<String, Value>,

    #[serde(default)]
    #[schemars(description = "Nested elements. Only used by frames.")]
    pub children: Vec<DesignInstruction>,
}

impl DesignInstruction {
    pub fn element_kind(&self) -> ElementKind {
        ElementKind::parse(&self.kind)
    }

    /// Font a text instruction needs loaded before its content is assigned.
    pub fn font_name(&self) -> Result<FontName, DesignError> {
        match self.properties.get("fontName") {
            None | Some(Value::Null) => Ok(FontName::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| DesignError::InvalidFont(format!("{raw} ({e})"))),
        }
    }
}

/// The JSON object the model is asked to produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DesignDocument {
    #[serde(default)]
    pub elements: Option<Vec<DesignInstruction>>,
}

impl DesignDocument {
    /// Top-level elements; a missing or `null` list is an empty design.
    pub fn into_elements(self) -> Vec<DesignInstruction> {
        self.elements.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Frame,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Component,
    Unrecognized(String),
}

impl ElementKind {
    pub fn parse(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "frame" => Self::Frame,
            "text" => Self::Text,
            "rectangle" => Self::Rectangle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "component" => Self::Component,
            _ => Self::Unrecognized(tag.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl Default for FontName {
    fn default() -> Self {
        Self {
            family: "Inter".into(),
            style: "Regular".into(),
        }
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_tags_are_case_insensitive() {
        assert_eq!(ElementKind::parse("FRAME"), ElementKind::Frame);
        assert_eq!(ElementKind::parse("Text"), ElementKind::Text);
        assert_eq!(ElementKind::parse("rectangle"), ElementKind::Rectangle);
        assert_eq!(
            ElementKind::parse("polygon"),
            ElementKind::Unrecognized("polygon".into())
        );
    }

    #[test]
    fn missing_properties_and_children_default_to_empty() {
        let ins: DesignInstruction = serde_json::from_value(json!({ "type": "ellipse" })).unwrap();
        assert_eq!(ins.element_kind(), ElementKind::Ellipse);
        assert!(ins.properties.is_empty());
        assert!(ins.children.is_empty());
    }

    #[test]
    fn absent_or_null_elements_is_an_empty_document() {
        let doc: DesignDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.into_elements().is_empty());
        let doc: DesignDocument = serde_json::from_str(r#"{"elements": null}"#).unwrap();
        assert!(doc.into_elements().is_empty());
    }

    #[test]
    fn font_name_falls_back_to_inter_regular() {
        let ins: DesignInstruction =
            serde_json::from_value(json!({ "type": "text", "properties": { "characters": "Hi" } }))
                .unwrap();
        assert_eq!(ins.font_name().unwrap(), FontName::default());

        let ins: DesignInstruction = serde_json::from_value(json!({
            "type": "text",
            "properties": { "fontName": { "family": "Roboto", "style": "Bold" } }
        }))
        .unwrap();
        assert_eq!(
            ins.font_name().unwrap(),
            FontName { family: "Roboto".into(), style: "Bold".into() }
        );
    }

    #[test]
    fn malformed_font_name_is_rejected() {
        let ins: DesignInstruction = serde_json::from_value(json!({
            "type": "text",
            "properties": { "fontName": "Inter" }
        }))
        .unwrap();
        assert!(matches!(ins.font_name(), Err(DesignError::InvalidFont(_))));
    }
}
