use crate::foundation::error::{LayercastError, LayercastResult};
use crate::scene::model::SceneDescription;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prepare the export directory and catalogue what is already there.
///
/// Nothing is deleted up front: previously exported files are recorded by
/// name so the coordinator can diff fresh renders against them and leave
/// unchanged files untouched (source control stays quiet when pixels did not
/// change). A listing failure is logged and yields an empty catalogue; the
/// export continues without diffing.
pub fn prepare_export_dir(root: &Path) -> LayercastResult<HashMap<String, PathBuf>> {
    if !root.exists() {
        fs::create_dir_all(root).map_err(|e| {
            LayercastError::render(format!("create export dir '{}': {e}", root.display()))
        })?;
        debug!(dir = %root.display(), "created export directory");
        return Ok(HashMap::new());
    }

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %root.display(), error = %e, "unable to list export directory, skipping diff catalogue");
            return Ok(HashMap::new());
        }
    };

    let mut old_files = HashMap::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            old_files.insert(name.to_string(), path.clone());
        }
    }
    debug!(dir = %root.display(), count = old_files.len(), "catalogued previous export files");
    Ok(old_files)
}

/// Write the scene description as UTF-8 JSON.
pub fn write_metadata(path: &Path, description: &SceneDescription) -> LayercastResult<()> {
    let json = serde_json::to_string(description)
        .map_err(|e| LayercastError::serde(format!("serialize scene description: {e}")))?;
    fs::write(path, json).map_err(|e| {
        LayercastError::render(format!("write metadata '{}': {e}", path.display()))
    })?;
    debug!(path = %path.display(), "wrote metadata");
    Ok(())
}
