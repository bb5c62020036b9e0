use crate::foundation::error::{LayercastError, LayercastResult};
use crate::foundation::geom::Bounds;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opaque layer handle used to request rasterization from the host engine.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

/// A document dump as produced by the host design tool's document-info API.
///
/// This is the read-only boundary object the conversion engine walks. Unknown
/// fields are ignored so the model tolerates host API additions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDef {
    /// Source file path as reported by the host (used to derive the export
    /// root and metadata base name).
    pub file: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub resolution: Option<f64>,
    #[serde(default)]
    pub layers: Vec<LayerDef>,
    /// Raw per-plugin settings blob; see [`DocumentDef::plugin_options`].
    #[serde(default)]
    pub generator_settings: Option<serde_json::Value>,
}

impl DocumentDef {
    /// Parse a document dump from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LayercastResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LayercastError::document(format!("parse document dump JSON: {e}")))
    }

    /// Parse a document dump from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayercastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LayercastError::document(format!("open document dump '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Document name without directory or extension; names the metadata file.
    pub fn base_name(&self) -> String {
        Path::new(&self.file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }

    /// Per-plugin options stored in the document by the host.
    ///
    /// The host persists these as a JSON-encoded string under
    /// `generatorSettings.<plugin_id>.json`. A malformed blob is logged and
    /// treated as "no options"; it never fails the export.
    pub fn plugin_options(&self, plugin_id: &str) -> Option<serde_json::Value> {
        let raw = self
            .generator_settings
            .as_ref()?
            .get(plugin_id)?
            .get("json")?
            .as_str()?;
        match serde_json::from_str(raw) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(plugin_id, error = %e, "malformed document options blob, ignoring");
                None
            }
        }
    }
}

/// One node of the source layer tree: a group when `layers` is present, a
/// leaf otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDef {
    pub name: String,
    pub id: LayerId,
    pub bounds: Bounds,
    /// Bounds expanded by layer effects (drop shadows etc.), when the host
    /// reports them.
    #[serde(default, rename = "boundsWithFX")]
    pub bounds_with_fx: Option<Bounds>,
    #[serde(default)]
    pub layers: Option<Vec<LayerDef>>,
    #[serde(default)]
    pub text: Option<TextDef>,
    #[serde(default)]
    pub blend_options: Option<BlendOptionsDef>,
}

impl LayerDef {
    pub fn is_group(&self) -> bool {
        self.layers.is_some()
    }

    /// Effects-expanded bounds when present, raw bounds otherwise.
    pub fn effective_bounds(&self) -> Bounds {
        self.bounds_with_fx.unwrap_or(self.bounds)
    }

    /// Union of all descendant leaf bounds (effects-expanded where present).
    ///
    /// Groups use this instead of their recorded bounds so that toggling a
    /// sublayer's visibility cannot change exported metadata. Falls back to
    /// the node's own bounds when the subtree holds no leaves.
    pub fn deep_bounds(&self) -> Bounds {
        fn fold(layer: &LayerDef, acc: &mut Option<Bounds>) {
            match &layer.layers {
                Some(children) => {
                    for child in children {
                        fold(child, acc);
                    }
                }
                None => {
                    let b = layer.effective_bounds();
                    *acc = Some(match *acc {
                        Some(prev) => prev.union(b),
                        None => b,
                    });
                }
            }
        }

        let mut acc = None;
        fold(self, &mut acc);
        acc.unwrap_or(self.bounds)
    }
}

/// Rich-text payload of a text layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDef {
    /// The literal string content shown in the layer.
    #[serde(default)]
    pub text_key: String,
    #[serde(default)]
    pub text_style_range: Vec<TextStyleRangeDef>,
    #[serde(default)]
    pub paragraph_style_range: Option<Vec<ParagraphStyleRangeDef>>,
    #[serde(default)]
    pub transform: Option<TextTransformDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleRangeDef {
    #[serde(default)]
    pub text_style: Option<TextStyleDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleDef {
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub font_style_name: Option<String>,
    #[serde(default)]
    pub size: Option<FontSizeDef>,
    #[serde(default)]
    pub color: Option<TextColorDef>,
}

/// Font size as reported by the host: either a bare number or a unit-wrapped
/// `{"value": n}` object depending on host version.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum FontSizeDef {
    Wrapped { value: f64 },
    Plain(f64),
}

impl FontSizeDef {
    pub fn value(self) -> f64 {
        match self {
            Self::Wrapped { value } => value,
            Self::Plain(v) => v,
        }
    }
}

/// Text color channels in `0..=255`; individual channels may be absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TextColorDef {
    #[serde(default)]
    pub red: Option<f64>,
    #[serde(default)]
    pub green: Option<f64>,
    #[serde(default)]
    pub blue: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyleRangeDef {
    #[serde(default)]
    pub paragraph_style: Option<ParagraphStyleDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyleDef {
    #[serde(default)]
    pub align: Option<String>,
}

/// 2x2 text transform plus translation; only the horizontal scale `xx` is
/// consumed (it scales the reported font size).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TextTransformDef {
    #[serde(default = "one")]
    pub xx: f64,
    #[serde(default)]
    pub xy: f64,
    #[serde(default)]
    pub yx: f64,
    #[serde(default = "one")]
    pub yy: f64,
    #[serde(default)]
    pub tx: f64,
    #[serde(default)]
    pub ty: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendOptionsDef {
    #[serde(default)]
    pub opacity: Option<UnitValueDef>,
}

/// Host unit-wrapped scalar, e.g. opacity percent `{"value": 80, "units": "percentUnit"}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnitValueDef {
    pub value: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
