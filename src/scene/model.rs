use crate::document::model::LayerId;
use crate::scene::coords::CoordMode;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A 2-vector in the selected output coordinate convention.
pub type Vec2a = [f64; 2];

/// One node of the produced scene graph.
///
/// This is the JSON-facing output model: a closed tagged union with one
/// variant per node role. Pivot marker layers never appear here; they are
/// consumed by their parent container during building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneNode {
    Container {
        name: String,
        position: Vec2a,
        size: Vec2a,
        /// Delta from the container's anchor (its position) back to its
        /// geometric center; present iff a pivot child was consumed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot: Option<Vec2a>,
        children: Vec<SceneNode>,
    },
    Image {
        name: String,
        position: Vec2a,
        /// Absent for alias nodes, which point at an image produced elsewhere.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Vec2a>,
    },
    Text {
        name: String,
        position: Vec2a,
        size: Vec2a,
        /// Six lowercase hex digits, `rrggbb`.
        color: String,
        /// Composed as `<fontName>-<fontStyleName>`.
        font: String,
        justification: Justification,
        #[serde(rename = "fontSize")]
        font_size: f64,
        /// Default string content authored in the document.
        text: String,
        /// Layer opacity in `0..=1`.
        alpha: f64,
    },
    Placeholder {
        name: String,
        position: Vec2a,
        size: Vec2a,
    },
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Container { name, .. }
            | Self::Image { name, .. }
            | Self::Text { name, .. }
            | Self::Placeholder { name, .. } => name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Container { .. } => "container",
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
            Self::Placeholder { .. } => "placeholder",
        }
    }
}

/// Horizontal paragraph alignment of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
}

/// The full per-export metadata document, serialized as UTF-8 JSON to
/// `<export_root>/<document_base_name>.txt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    pub root_width: f64,
    pub root_height: f64,
    pub coordinate_system: CoordMode,
    pub children: Vec<SceneNode>,
}

impl SceneDescription {
    /// Indented `name(type)` outline of the graph, for logs and debugging.
    pub fn outline(&self) -> String {
        fn visit(out: &mut String, nodes: &[SceneNode], depth: usize) {
            for node in nodes {
                for _ in 0..=depth {
                    out.push_str("--");
                }
                let _ = writeln!(out, "{}({})", node.name(), node.type_name());
                if let SceneNode::Container { children, .. } = node {
                    visit(out, children, depth + 1);
                }
            }
        }

        let mut out = String::from("root\n");
        visit(&mut out, &self.children, 0);
        out
    }
}

/// A request to rasterize one image layer to `<name>.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Sanitized layer name; becomes the output file stem.
    pub name: String,
    /// Host handle used to fetch pixels.
    pub layer_id: LayerId,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
