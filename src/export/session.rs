use crate::document::model::DocumentDef;
use crate::export::coordinator::{self, ExportOptions, ExportReport};
use crate::export::files;
use crate::foundation::error::LayercastResult;
use crate::foundation::geom::RootSize;
use crate::raster::Rasterizer;
use crate::raster::compare::ImageCompare;
use crate::scene::builder::build_scene;
use crate::scene::coords::CoordMode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Plugin id under which per-document options are stored in the host file.
const PLUGIN_ID: &str = "layercast";

/// The command that triggered an export; fixes coordinate mode, metadata
/// emission and cropping for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportCommand {
    /// Centered coordinates, metadata, cropped images.
    SpriteKit,
    /// Top-left coordinates, metadata, cropped images.
    NativeUi,
    /// Cropped images only, no metadata.
    ImagesCropped,
    /// Images padded to the full document canvas, no metadata.
    ImagesFull,
}

impl ExportCommand {
    pub fn mode(self) -> CoordMode {
        match self {
            Self::NativeUi => CoordMode::TopLeft,
            Self::SpriteKit | Self::ImagesCropped | Self::ImagesFull => CoordMode::Centered,
        }
    }

    pub fn export_metadata(self) -> bool {
        matches!(self, Self::SpriteKit | Self::NativeUi)
    }

    pub fn crop_to_layer(self) -> bool {
        !matches!(self, Self::ImagesFull)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SpriteKit => "SpriteKit",
            Self::NativeUi => "Native UI",
            Self::ImagesCropped => "Cropped Images Only",
            Self::ImagesFull => "Full Sized Images",
        }
    }
}

/// Result of one export trigger.
#[derive(Debug)]
pub enum ExportOutcome {
    Completed {
        /// User-facing completion notice.
        notice: String,
        /// Metadata file path, when the command exports metadata.
        metadata_path: Option<PathBuf>,
        report: ExportReport,
    },
    /// A previous export was still outstanding; this trigger was dropped.
    Rejected { notice: String },
}

impl ExportOutcome {
    pub fn notice(&self) -> &str {
        match self {
            Self::Completed { notice, .. } | Self::Rejected { notice } => notice,
        }
    }
}

/// Gate and orchestration for exports: one at a time, rebuilt from scratch on
/// every trigger.
#[derive(Default)]
pub struct ExportSession {
    in_flight: AtomicBool,
}

impl ExportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one full export cycle: build the scene graph, write metadata,
    /// resolve the render queue, sweep stale assets.
    ///
    /// A trigger while a previous export is outstanding is rejected with a
    /// user-visible notice, not queued.
    pub fn export(
        &self,
        doc: &DocumentDef,
        export_root: &Path,
        command: ExportCommand,
        rasterizer: &Arc<dyn Rasterizer>,
        compare: &Arc<dyn ImageCompare>,
        opts: ExportOptions,
    ) -> LayercastResult<ExportOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(command = command.label(), "export rejected, already processing");
            return Ok(ExportOutcome::Rejected {
                notice: format!("ALREADY PROCESSING: {}", command.label()),
            });
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!(command = command.label(), document = %doc.base_name(), "starting export");

        let mode = effective_mode(doc, command);
        let (description, queue) = build_scene(doc, mode)?;
        let root = RootSize::from_bounds(doc.bounds)?;

        let old_files = files::prepare_export_dir(export_root)?;

        let metadata_path = if command.export_metadata() {
            let path = export_root.join(format!("{}.txt", doc.base_name()));
            files::write_metadata(&path, &description)?;
            Some(path)
        } else {
            None
        };

        let opts = ExportOptions {
            crop_to_layer: command.crop_to_layer(),
            ..opts
        };
        let report =
            coordinator::resolve_queue(export_root, old_files, queue, rasterizer, compare, root, opts);

        let notice = format!("EXPORT COMPLETE: {} ({})", command.label(), report.summary());
        info!("{notice}");
        Ok(ExportOutcome::Completed {
            notice,
            metadata_path,
            report,
        })
    }
}

/// Per-document options may pin the coordinate system regardless of which
/// command triggered the export.
fn effective_mode(doc: &DocumentDef, command: ExportCommand) -> CoordMode {
    let Some(options) = doc.plugin_options(PLUGIN_ID) else {
        return command.mode();
    };
    match options.get("coordinateSystem").and_then(|v| v.as_str()) {
        Some("spritekit") => CoordMode::Centered,
        Some("native_ui") => CoordMode::TopLeft,
        Some(other) => {
            warn!(value = other, "unrecognized coordinateSystem override, ignoring");
            command.mode()
        }
        None => command.mode(),
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
