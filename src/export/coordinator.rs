use crate::foundation::geom::RootSize;
use crate::raster::compare::ImageCompare;
use crate::raster::{Pixmap, Rasterizer};
use crate::scene::model::RenderRequest;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// File extension managed by the coordinator. The stale sweep only ever
/// deletes files with this extension so sidecars (`.png.meta`, metadata
/// `.txt`) survive.
const MANAGED_EXT: &str = ".png";

/// Per-export knobs for the render queue.
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    /// Upper bound on the whole queue drain. Entries still outstanding at
    /// the deadline are logged and abandoned rather than stalling forever.
    pub render_timeout: Duration,
    /// `true` crops each PNG to its layer bounds; `false` pads it with
    /// transparency to the full document canvas.
    pub crop_to_layer: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            render_timeout: Duration::from_secs(120),
            crop_to_layer: true,
        }
    }
}

/// How a single queue entry resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    /// No previous file existed; the render was written directly.
    Written,
    /// Pixels matched the previous export; the old file was kept.
    Unchanged,
    /// Pixels differed (or the compare tool failed); the new render replaced
    /// the old file.
    Replaced,
    /// Rasterization or a file operation failed; logged, nothing written.
    Failed,
}

/// Outcome of one coordinator run.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Per-entry outcomes in completion order.
    pub entries: Vec<(String, EntryOutcome)>,
    /// Entries abandoned at the render deadline.
    pub abandoned: usize,
    /// Stale files deleted by the sweep.
    pub swept: usize,
}

impl ExportReport {
    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// One-line human summary for the completion notice.
    pub fn summary(&self) -> String {
        format!(
            "{} written, {} unchanged, {} replaced, {} failed, {} abandoned, {} swept",
            self.count(EntryOutcome::Written),
            self.count(EntryOutcome::Unchanged),
            self.count(EntryOutcome::Replaced),
            self.count(EntryOutcome::Failed),
            self.abandoned,
            self.swept,
        )
    }
}

struct EntryJob {
    file_name: String,
    request: RenderRequest,
    out_path: PathBuf,
    temp_path: PathBuf,
    old_path: Option<PathBuf>,
}

/// Resolve the whole render queue against the previous export.
///
/// Every entry is dispatched concurrently; completion is a single structured
/// drain over a channel with a deadline, so there is no shared countdown to
/// race on and a hung rasterization call cannot stall the export forever.
/// After the drain, previously exported files the queue no longer mentions
/// are swept, restricted to the managed extension.
pub fn resolve_queue(
    export_root: &Path,
    old_files: HashMap<String, PathBuf>,
    queue: Vec<RenderRequest>,
    rasterizer: &Arc<dyn Rasterizer>,
    compare: &Arc<dyn ImageCompare>,
    root: RootSize,
    opts: ExportOptions,
) -> ExportReport {
    let mut report = ExportReport::default();

    // Every queued name is protected from the sweep up front, matching the
    // dispatch-time bookkeeping of the catalogue: an entry that fails or is
    // abandoned must not get its previous export deleted.
    let protected: HashSet<String> = queue
        .iter()
        .map(|r| format!("{}{MANAGED_EXT}", r.name))
        .collect();

    let total = queue.len();
    let (tx, rx) = mpsc::channel::<(String, EntryOutcome)>();

    for request in queue {
        let file_name = format!("{}{MANAGED_EXT}", request.name);
        let job = EntryJob {
            out_path: export_root.join(&file_name),
            temp_path: export_root.join(format!("{}__TEMP{MANAGED_EXT}", request.name)),
            old_path: old_files.get(&file_name).cloned(),
            file_name,
            request,
        };
        let tx = tx.clone();
        let rasterizer = Arc::clone(rasterizer);
        let compare = Arc::clone(compare);
        thread::spawn(move || {
            let outcome = resolve_entry(&job, rasterizer.as_ref(), compare.as_ref(), root, opts);
            let _ = tx.send((job.file_name, outcome));
        });
    }
    drop(tx);

    let deadline = Instant::now() + opts.render_timeout;
    let mut completed = 0usize;
    while completed < total {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((file_name, outcome)) => {
                debug!(file = %file_name, ?outcome, "render queue entry resolved");
                report.entries.push((file_name, outcome));
                completed += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                report.abandoned = total - completed;
                error!(
                    outstanding = report.abandoned,
                    "render queue deadline reached, abandoning outstanding entries"
                );
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                report.abandoned = total - completed;
                error!(
                    outstanding = report.abandoned,
                    "render workers disappeared before completing"
                );
                break;
            }
        }
    }

    report.swept = sweep_stale(&old_files, &protected);
    report
}

fn resolve_entry(
    job: &EntryJob,
    rasterizer: &dyn Rasterizer,
    compare: &dyn ImageCompare,
    root: RootSize,
    opts: ExportOptions,
) -> EntryOutcome {
    let pixmap = match rasterizer.rasterize(job.request.layer_id) {
        Ok(p) => p,
        Err(e) => {
            error!(layer = %job.request.name, error = %e, "rasterization failed");
            return EntryOutcome::Failed;
        }
    };

    match &job.old_path {
        None => match save(&pixmap, &job.out_path, root, opts) {
            Ok(()) => EntryOutcome::Written,
            Err(e) => {
                error!(file = %job.file_name, error = %e, "write failed");
                EntryOutcome::Failed
            }
        },
        Some(old_path) => {
            if let Err(e) = save(&pixmap, &job.temp_path, root, opts) {
                error!(file = %job.file_name, error = %e, "temp write failed");
                return EntryOutcome::Failed;
            }

            let identical = match compare.pixel_difference(&job.temp_path, old_path) {
                Ok(diff) => diff == 0,
                Err(e) => {
                    // The diff tool is best-effort: on failure the fresh
                    // render wins.
                    warn!(file = %job.file_name, error = %e, "image compare failed, accepting new render");
                    false
                }
            };

            if identical {
                if let Err(e) = fs::remove_file(&job.temp_path) {
                    warn!(file = %job.file_name, error = %e, "failed to delete unchanged temp file");
                }
                return EntryOutcome::Unchanged;
            }

            if let Err(e) =
                fs::remove_file(old_path).and_then(|()| fs::rename(&job.temp_path, old_path))
            {
                error!(file = %job.file_name, error = %e, "failed to replace previous export");
                return EntryOutcome::Failed;
            }
            EntryOutcome::Replaced
        }
    }
}

fn save(
    pixmap: &Pixmap,
    path: &Path,
    root: RootSize,
    opts: ExportOptions,
) -> crate::foundation::error::LayercastResult<()> {
    if opts.crop_to_layer {
        pixmap.save_png(path)
    } else {
        pixmap.save_png_padded(path, root)
    }
}

fn sweep_stale(old_files: &HashMap<String, PathBuf>, protected: &HashSet<String>) -> usize {
    let mut swept = 0;
    for (name, path) in old_files {
        if protected.contains(name) || !name.ends_with(MANAGED_EXT) {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(file = %name, "swept stale export");
                swept += 1;
            }
            Err(e) => warn!(file = %name, error = %e, "failed to sweep stale export"),
        }
    }
    swept
}

#[cfg(test)]
#[path = "../../tests/unit/export/coordinator.rs"]
mod tests;
