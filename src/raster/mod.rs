pub mod compare;

use crate::document::model::{DocumentDef, LayerDef, LayerId};
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::foundation::geom::{Bounds, RootSize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Rasterized layer pixels: straight-alpha RGBA8 plus the document-space
/// bounds the pixels were sampled from.
#[derive(Clone, Debug)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
    pub bounds: Bounds,
}

impl Pixmap {
    /// Create a validated pixmap; the buffer must hold exactly
    /// `width * height` RGBA8 pixels.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>, bounds: Bounds) -> LayercastResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8.len() != expected {
            return Err(LayercastError::render(format!(
                "pixmap buffer is {} bytes, expected {expected}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
            bounds,
        })
    }

    /// Write the pixmap as a PNG cropped to its own bounds.
    pub fn save_png(&self, path: &Path) -> LayercastResult<()> {
        image::save_buffer_with_format(
            path,
            &self.rgba8,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| LayercastError::render(format!("write png '{}': {e}", path.display())))
    }

    /// Write the pixmap as a PNG padded with transparency to the full root
    /// canvas, placed at its document-space offset.
    pub fn save_png_padded(&self, path: &Path, root: RootSize) -> LayercastResult<()> {
        let canvas_w = root.width.round().max(0.0) as u32;
        let canvas_h = root.height.round().max(0.0) as u32;
        let mut canvas = vec![0u8; (canvas_w as usize) * (canvas_h as usize) * 4];

        let off_x = self.bounds.left.round() as i64;
        let off_y = self.bounds.top.round() as i64;
        for y in 0..self.height as i64 {
            let dst_y = y + off_y;
            if dst_y < 0 || dst_y >= canvas_h as i64 {
                continue;
            }
            for x in 0..self.width as i64 {
                let dst_x = x + off_x;
                if dst_x < 0 || dst_x >= canvas_w as i64 {
                    continue;
                }
                let src = ((y as usize) * (self.width as usize) + x as usize) * 4;
                let dst = ((dst_y as usize) * (canvas_w as usize) + dst_x as usize) * 4;
                canvas[dst..dst + 4].copy_from_slice(&self.rgba8[src..src + 4]);
            }
        }

        image::save_buffer_with_format(
            path,
            &canvas,
            canvas_w,
            canvas_h,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| LayercastError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// The external rasterization engine: fetch pixels for one layer.
///
/// Implementations must be shareable across the render-queue worker threads.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, layer: LayerId) -> LayercastResult<Pixmap>;
}

/// Rasterizer backed by pre-rendered `<layer_id>.png` files in a directory.
///
/// Layer bounds come from the document dump, so padded exports place pixels
/// correctly without any sidecar metadata.
pub struct DirectoryRasterizer {
    dir: PathBuf,
    bounds_by_id: HashMap<LayerId, Bounds>,
}

impl DirectoryRasterizer {
    pub fn new(dir: impl Into<PathBuf>, doc: &DocumentDef) -> Self {
        fn collect(layers: &[LayerDef], map: &mut HashMap<LayerId, Bounds>) {
            for layer in layers {
                match &layer.layers {
                    Some(children) => collect(children, map),
                    None => {
                        map.insert(layer.id, layer.effective_bounds());
                    }
                }
            }
        }

        let mut bounds_by_id = HashMap::new();
        collect(&doc.layers, &mut bounds_by_id);
        Self {
            dir: dir.into(),
            bounds_by_id,
        }
    }
}

impl Rasterizer for DirectoryRasterizer {
    fn rasterize(&self, layer: LayerId) -> LayercastResult<Pixmap> {
        let bounds = *self.bounds_by_id.get(&layer).ok_or_else(|| {
            LayercastError::render(format!("layer {} is not in the document", layer.0))
        })?;

        let path = self.dir.join(format!("{}.png", layer.0));
        let img = image::open(&path)
            .map_err(|e| LayercastError::render(format!("read png '{}': {e}", path.display())))?
            .into_rgba8();

        let (width, height) = img.dimensions();
        Pixmap::new(width, height, img.into_raw(), bounds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pixmap.rs"]
mod tests;
