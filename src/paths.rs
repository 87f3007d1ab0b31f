//! Placement of the files shared between the daemon and the cycle command.
//!
//! Both live in `$XDG_RUNTIME_DIR` when it is usable. Otherwise they fall back
//! to the system temp directory, suffixed with the numeric uid so users on a
//! shared host do not clobber each other.

use std::path::{Path, PathBuf};

const STATE_FILE_STEM: &str = "sway_mru";
const PAUSE_FILE_STEM: &str = "sway_mru_pause";

/// Path of the recency list file
pub fn state_path() -> PathBuf {
    resolve(dirs::runtime_dir(), &std::env::temp_dir(), current_uid(), STATE_FILE_STEM, ".json")
}

/// Path of the pause marker file
pub fn pause_path() -> PathBuf {
    resolve(dirs::runtime_dir(), &std::env::temp_dir(), current_uid(), PAUSE_FILE_STEM, "")
}

/// The runtime directory, if one is configured and actually exists
fn usable_runtime_dir(runtime_dir: Option<PathBuf>) -> Option<PathBuf> {
    runtime_dir.filter(|dir| dir.is_dir())
}

fn resolve(
    runtime_dir: Option<PathBuf>,
    temp_dir: &Path,
    uid: u32,
    stem: &str,
    extension: &str,
) -> PathBuf {
    match usable_runtime_dir(runtime_dir) {
        Some(dir) => dir.join(format!("{}{}", stem, extension)),
        None => temp_dir.join(format!("{}_{}{}", stem, uid, extension)),
    }
}

fn current_uid() -> u32 {
    // SAFETY: getuid has no preconditions and cannot fail
    unsafe { libc::getuid() }
}
