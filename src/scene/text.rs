use crate::document::model::{BlendOptionsDef, TextDef};
use crate::scene::model::Justification;
use tracing::warn;

const DEFAULT_FONT_NAME: &str = "Arial";
const DEFAULT_FONT_STYLE: &str = "Black";
const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Normalized text styling pulled from a host text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Six lowercase hex digits, `rrggbb`.
    pub color: String,
    /// `<fontName>-<fontStyleName>`.
    pub font: String,
    pub justification: Justification,
    pub font_size: f64,
    /// Default string content authored in the document.
    pub text: String,
    /// Layer opacity in `0..=1`.
    pub alpha: f64,
}

/// Extract normalized styling from a host text object.
///
/// Every field falls back to its default when the corresponding source data
/// is absent or malformed; a broken text layer is logged and must never stop
/// sibling processing.
pub fn extract(text: &TextDef, blend: Option<&BlendOptionsDef>) -> TextStyle {
    let mut color = String::from("000000");
    let mut font_name = String::from(DEFAULT_FONT_NAME);
    let mut font_style = String::from(DEFAULT_FONT_STYLE);
    let mut font_size = DEFAULT_FONT_SIZE;

    let alpha = blend
        .and_then(|b| b.opacity)
        .map(|o| o.value / 100.0)
        .unwrap_or(1.0);

    match text
        .text_style_range
        .first()
        .and_then(|r| r.text_style.as_ref())
    {
        Some(style) => {
            if let Some(name) = &style.font_name {
                font_name = name.clone();
            }
            if let Some(style_name) = &style.font_style_name {
                font_style = style_name.clone();
            }
            match style.size {
                Some(size) => font_size = size.value(),
                None => warn!(text = %text.text_key, "text style has no size"),
            }
            if let Some(c) = style.color {
                color = format_color(
                    c.red.unwrap_or(0.0),
                    c.green.unwrap_or(0.0),
                    c.blue.unwrap_or(0.0),
                );
            }
        }
        None => {
            warn!(text = %text.text_key, "text layer has no usable style range, using defaults");
        }
    }

    let justification = match text
        .paragraph_style_range
        .as_ref()
        .and_then(|ranges| ranges.first())
        .and_then(|r| r.paragraph_style.as_ref())
        .and_then(|s| s.align.as_deref())
    {
        None => {
            warn!(text = %text.text_key, "text layer has no paragraph alignment, using left");
            Justification::Left
        }
        Some("left") => Justification::Left,
        Some("right") => Justification::Right,
        Some("center") => Justification::Center,
        Some(other) => {
            warn!(align = other, "unrecognized paragraph alignment, using left");
            Justification::Left
        }
    };

    // A horizontal scale on the text transform scales the effective font size.
    if let Some(transform) = text.transform {
        font_size *= transform.xx;
    }

    TextStyle {
        color,
        font: format!("{font_name}-{font_style}"),
        justification,
        font_size,
        text: text.text_key.clone(),
        alpha,
    }
}

fn format_color(red: f64, green: f64, blue: f64) -> String {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    format!(
        "{:02x}{:02x}{:02x}",
        channel(red),
        channel(green),
        channel(blue)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
