//! Filesystem helpers for the batch pipeline: best-effort deletion with a
//! global flush hint, and collision-free destination naming.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Remove `path` if it exists, then optionally ask the OS to flush pending
/// filesystem writes. All failures are logged and swallowed; deletion is
/// never fatal to the caller.
pub async fn remove_with_sync<P: AsRef<Path>>(path: P, sync_after: bool) {
    let path = path.as_ref();

    if !path.exists() {
        debug!("File {} does not exist, nothing to delete", path.display());
        return;
    }

    info!("Deleting file {}", path.display());
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to delete {}: {}", path.display(), e);
        return;
    }

    if sync_after {
        // Global flush hint, not a per-file guarantee.
        match Command::new("sync").status().await {
            Ok(status) if status.success() => {
                debug!("Filesystem sync completed after deleting {}", path.display());
            }
            Ok(status) => warn!("sync exited with status {}", status),
            Err(e) => warn!("Failed to run sync: {}", e),
        }
    }
}

/// Return `dir/file_name` if unused, otherwise the first free name with an
/// incrementing numeric suffix before the extension (`movie_1.mkv`,
/// `movie_2.mkv`, ...). Existing files are never overwritten.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_string());

    let mut count = 1;
    loop {
        let suffixed = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, count, ext),
            None => format!("{}_{}", stem, count),
        };
        let candidate = dir.join(suffixed);
        if !candidate.exists() {
            return candidate;
        }
        count += 1;
    }
}
