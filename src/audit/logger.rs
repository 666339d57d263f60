use super::record::AuditRecord;
use crate::{SanitizationStandard, WipeResult};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use sysinfo::System;
use tracing::{debug, error};

/// Who ran the wipe, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditIdentity {
    pub user: String,
    pub hostname: String,
}

impl AuditIdentity {
    /// `USER`/`USERNAME` and the host name, falling back to "unknown"
    pub fn current() -> Self {
        let user = env::var("USER")
            .or_else(|_| env::var("USERNAME"))
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let hostname = System::host_name().unwrap_or_else(|| "unknown".to_string());

        Self { user, hostname }
    }
}

/// Append-only JSON Lines audit log.
///
/// Each record is written with its own open-append-close cycle, so a crash
/// can at worst truncate the last line and never interleaves two records.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    path: PathBuf,
    identity: AuditIdentity,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_identity(path, AuditIdentity::current())
    }

    pub fn with_identity(path: impl Into<PathBuf>, identity: AuditIdentity) -> Self {
        Self {
            path: path.into(),
            identity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identity(&self) -> &AuditIdentity {
        &self.identity
    }

    /// Record one wipe attempt. Never fails: a write error is reported through
    /// `tracing` and otherwise dropped.
    pub fn record(
        &self,
        path: &Path,
        size_before: u64,
        hash_before: &str,
        standard: SanitizationStandard,
        result: &WipeResult,
    ) {
        let record = AuditRecord::new(path, size_before, hash_before, standard, result, &self.identity);

        if let Err(e) = self.append(&record) {
            error!(
                log = %self.path.display(),
                file = %record.file,
                error = %e,
                "Failed to write audit record"
            );
        }
    }

    /// Append a single record as one newline-terminated line
    pub fn append(&self, record: &AuditRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    /// Every well-formed record, oldest first. Malformed lines are skipped and
    /// a missing log reads as empty.
    pub fn read_records(&self) -> io::Result<Vec<AuditRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                // Invalid UTF-8 counts as malformed
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(log = %self.path.display(), skipped, "Skipped malformed audit lines");
        }

        Ok(records)
    }
}
