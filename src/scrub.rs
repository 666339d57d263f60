// Anti-forensic metadata scrubbing
//
// Runs after the final pass and before unlinking. Every step is best-effort:
// a failure here is logged and the wipe carries on with whatever path is left.

use crate::crypto::random_scrub_name;
use std::fs::{self, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

const MAX_RENAME_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct AntiForensicScrubber {
    name_length: usize,
}

impl Default for AntiForensicScrubber {
    fn default() -> Self {
        Self::new(12)
    }
}

impl AntiForensicScrubber {
    pub fn new(name_length: usize) -> Self {
        Self {
            name_length: name_length.max(1),
        }
    }

    /// Reset timestamps to the epoch, then rename to a random name in the same
    /// directory. Returns the path the file now lives at.
    pub fn scrub(&self, path: &Path) -> PathBuf {
        if let Err(e) = reset_timestamps(path) {
            debug!(path = %path.display(), error = %e, "Could not reset timestamps");
        }

        match self.rename_randomly(path) {
            Ok(renamed) => renamed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Rename failed, deleting under original name");
                path.to_path_buf()
            }
        }
    }

    fn rename_randomly(&self, path: &Path) -> io::Result<PathBuf> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        for _ in 0..MAX_RENAME_ATTEMPTS {
            let candidate = dir.join(random_scrub_name(self.name_length));
            // Never clobber an unrelated file that happens to share the name
            if fs::symlink_metadata(&candidate).is_ok() {
                continue;
            }
            fs::rename(path, &candidate)?;
            debug!(from = %path.display(), to = %candidate.display(), "Renamed before unlink");
            return Ok(candidate);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "no free scrub name after repeated attempts",
        ))
    }
}

fn reset_timestamps(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    let times = FileTimes::new()
        .set_accessed(UNIX_EPOCH)
        .set_modified(UNIX_EPOCH);
    file.set_times(times)
}
