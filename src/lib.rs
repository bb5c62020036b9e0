//! Layercast converts a layered design-document tree into a normalized
//! scene-graph description for runtime UI/game engines, plus a queue of image
//! layers to rasterize.
//!
//! The pipeline is one-directional and rebuilt from scratch on every export:
//!
//! - Parse a host document dump into a [`DocumentDef`]
//! - Walk the layer tree with [`build_scene`] (naming conventions, coordinate
//!   transform, text styles, group flattening, pivot extraction)
//! - Write the metadata JSON and hand the render queue to an
//!   [`ExportSession`], which rasterizes concurrently, diffs against the
//!   previous export, and sweeps stale assets
#![forbid(unsafe_code)]

pub mod document;
pub mod export;
pub mod foundation;
pub mod raster;
pub mod scene;

pub use crate::foundation::error::{LayercastError, LayercastResult};
pub use crate::foundation::geom::{Bounds, RootSize};

pub use crate::document::model::{DocumentDef, LayerDef, LayerId};
pub use crate::export::coordinator::{EntryOutcome, ExportOptions, ExportReport};
pub use crate::export::session::{ExportCommand, ExportOutcome, ExportSession};
pub use crate::raster::compare::{ImageCompare, MagickCompare};
pub use crate::raster::{DirectoryRasterizer, Pixmap, Rasterizer};
pub use crate::scene::builder::build_scene;
pub use crate::scene::coords::CoordMode;
pub use crate::scene::model::{
    Justification, RenderRequest, SceneDescription, SceneNode,
};
