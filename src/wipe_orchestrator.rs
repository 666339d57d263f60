// Wipe Orchestrator - runs a target through the full sanitization state machine
//
//   Start → Classifying → Hashing → Overwriting(1..k) → Verifying? → Scrubbing
//         → Deleting → Logged
//
// Any unrecoverable error jumps straight to Logged(Failed). Every attempted file
// produces exactly one WipeResult and one audit record.

use crate::algorithms::{PassPlan, StrategySelector};
use crate::audit::{AuditLogger, HASH_ERROR, UNKNOWN_HASH};
use crate::config::EngineConfig;
use crate::crypto::sha256_file;
use crate::drives::{DiskInfoProvider, StorageClassifier, SystemDiskInfo};
use crate::io::{FsOpener, PassExecutor, PassLedger, PassProgress, TargetOpener};
use crate::scrub::AntiForensicScrubber;
use crate::verification::EntropyVerifier;
use crate::{
    absolutize, is_interrupted, EngineResult, SanitizationStandard, StorageProfile,
    VerificationStatus, WipeError, WipeResult,
};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What `wipe` would do to a file, computed without touching it
#[derive(Debug, Clone)]
pub struct WipePreview {
    pub path: PathBuf,
    pub size: u64,
    pub profile: StorageProfile,
    pub plan: PassPlan,
    pub strategy_label: String,
}

impl WipePreview {
    /// Bytes the plan will write
    pub fn bytes_to_write(&self) -> u64 {
        self.size * self.plan.len() as u64
    }
}

/// Aggregate of a batch run
#[derive(Debug, Clone, Default)]
pub struct WipeSummary {
    pub total_files: usize,
    pub files_wiped: usize,
    pub files_failed: usize,
    /// Bytes written for files that were wiped successfully
    pub total_bytes_overwritten: u64,
    pub total_duration: Duration,
    /// First `max_reported_errors` error strings
    pub errors: Vec<String>,
    /// Errors beyond the cap, counted but not kept
    pub errors_omitted: usize,
    pub results: Vec<WipeResult>,
    max_errors: usize,
}

impl WipeSummary {
    pub fn new(max_errors: usize) -> Self {
        Self {
            max_errors,
            ..Default::default()
        }
    }

    pub fn push_error(&mut self, error: String) {
        if self.errors.len() < self.max_errors {
            self.errors.push(error);
        } else {
            self.errors_omitted += 1;
        }
    }

    fn absorb(&mut self, result: WipeResult) {
        if result.success {
            self.files_wiped += 1;
            self.total_bytes_overwritten += result.bytes_written_total;
        } else {
            self.files_failed += 1;
            self.push_error(format!(
                "{}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        self.results.push(result);
    }

    pub fn all_succeeded(&self) -> bool {
        self.files_failed == 0 && self.errors.is_empty()
    }
}

/// Mutable state of one attempt, filled in as the state machine advances so
/// a failure at any point still yields a complete result and audit record.
struct Attempt {
    size: u64,
    hash: String,
    strategy_label: String,
    ledger: PassLedger,
    verified: VerificationStatus,
}

impl Attempt {
    fn new() -> Self {
        Self {
            size: 0,
            hash: UNKNOWN_HASH.to_string(),
            strategy_label: "Unknown".to_string(),
            ledger: PassLedger::default(),
            verified: VerificationStatus::Skipped,
        }
    }
}

/// Main wipe orchestrator
pub struct WipeOrchestrator<P: DiskInfoProvider = SystemDiskInfo, O: TargetOpener = FsOpener> {
    config: EngineConfig,
    classifier: StorageClassifier<P>,
    selector: StrategySelector,
    opener: O,
    verifier: EntropyVerifier,
    scrubber: AntiForensicScrubber,
    audit: AuditLogger,
}

impl WipeOrchestrator {
    /// Orchestrator over the real system tools and filesystem
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(config, SystemDiskInfo, FsOpener)
    }
}

impl<P: DiskInfoProvider, O: TargetOpener> WipeOrchestrator<P, O> {
    pub fn with_parts(config: EngineConfig, provider: P, opener: O) -> Self {
        let audit = AuditLogger::new(config.audit_log_path.clone());
        Self {
            classifier: StorageClassifier::new(provider),
            selector: StrategySelector,
            opener,
            verifier: EntropyVerifier::from_config(&config),
            scrubber: AntiForensicScrubber::new(config.scrub_name_length),
            audit,
            config,
        }
    }

    /// Replace the audit logger (fixed identity, different log path)
    pub fn with_audit_logger(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Storage medium backing `path`. Never fails.
    pub fn classify(&self, path: &Path) -> StorageProfile {
        self.classifier.classify(path)
    }

    /// Resolve what a wipe of `path` would do, without modifying it
    pub fn plan(&self, path: &Path, standard: SanitizationStandard) -> EngineResult<WipePreview> {
        let path = absolutize(path);
        let metadata = regular_file_metadata(&path)?;
        let profile = self.classifier.classify(&path);

        Ok(WipePreview {
            size: metadata.len(),
            profile,
            plan: self.selector.select(profile, standard),
            strategy_label: self.selector.label(profile, standard),
            path,
        })
    }

    /// Wipe a single file. Always returns a result and always writes one
    /// audit record, whatever state the attempt failed in.
    pub fn wipe(
        &self,
        path: &Path,
        standard: SanitizationStandard,
        verify: bool,
        on_progress: &mut dyn FnMut(&PassProgress),
    ) -> WipeResult {
        let started = Instant::now();
        let path = absolutize(path);
        let mut attempt = Attempt::new();

        info!(path = %path.display(), standard = %standard, verify, "Starting wipe");

        let outcome = self.run_states(&path, standard, verify, &mut attempt, on_progress);

        let result = WipeResult {
            path: path.clone(),
            success: outcome.is_ok(),
            file_size: attempt.size,
            passes_completed: attempt.ledger.passes_completed,
            bytes_written_total: attempt.ledger.bytes_written,
            duration_secs: started.elapsed().as_secs_f64(),
            verified: attempt.verified,
            strategy_label: attempt.strategy_label.clone(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            failure: outcome.as_ref().err().map(WipeError::kind),
        };

        match &outcome {
            Ok(()) => info!(
                path = %path.display(),
                passes = result.passes_completed,
                bytes = result.bytes_written_total,
                verified = %result.verified,
                "Wipe complete"
            ),
            Err(e) => warn!(path = %path.display(), kind = %e.kind(), error = %e, "Wipe failed"),
        }

        self.audit
            .record(&path, attempt.size, &attempt.hash, standard, &result);

        result
    }

    fn run_states(
        &self,
        path: &Path,
        standard: SanitizationStandard,
        verify: bool,
        attempt: &mut Attempt,
        on_progress: &mut dyn FnMut(&PassProgress),
    ) -> EngineResult<()> {
        if is_interrupted() {
            return Err(WipeError::Interrupted);
        }

        let metadata = regular_file_metadata(path)?;
        attempt.size = metadata.len();

        // Classifying
        let profile = self.classifier.classify(path);
        let plan = self.selector.select(profile, standard);
        attempt.strategy_label = self.selector.label(profile, standard);
        debug!(path = %path.display(), profile = %profile, plan = %plan, "Pass plan selected");

        // Hashing
        attempt.hash = match sha256_file(path, self.config.hash_chunk_size) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Pre-wipe hash failed");
                HASH_ERROR.to_string()
            }
        };

        // Overwriting
        ensure_writable(path, &metadata);
        let mut sink = self.opener.open(path).map_err(|e| open_error(path, e))?;
        let executor = PassExecutor::new(self.config.chunk_size_for(profile));
        executor.run(&mut sink, attempt.size, &plan, &mut attempt.ledger, on_progress)?;
        drop(sink);

        // Verifying
        let mut deferred = None;
        if verify && attempt.size > 0 {
            let expected = plan.final_pass();
            let report = self.verifier.verify(path, expected);

            if report.passed {
                attempt.verified = VerificationStatus::Passed;
            } else {
                attempt.verified = VerificationStatus::Failed;
                let failure = WipeError::VerificationFailure {
                    expected,
                    average: report.average_entropy,
                };
                if !self.config.delete_on_verification_failure {
                    warn!(path = %path.display(), "Verification failed, keeping file for inspection");
                    return Err(failure);
                }
                deferred = Some(failure);
            }
        }

        // Scrubbing
        let final_path = self.scrubber.scrub(path);

        // Deleting
        fs::remove_file(&final_path).map_err(WipeError::DeleteFailure)?;
        debug!(path = %final_path.display(), "Unlinked");

        match deferred {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Wipe a file or every file under a directory, then remove the emptied
    /// directories. One file failing never stops the batch.
    pub fn wipe_target(
        &self,
        target: &Path,
        standard: SanitizationStandard,
        verify: bool,
        on_progress: &mut dyn FnMut(&Path, &PassProgress),
    ) -> WipeSummary {
        let started = Instant::now();
        let target = absolutize(target);
        let mut summary = WipeSummary::new(self.config.max_reported_errors);

        if fs::symlink_metadata(&target).is_err() {
            summary.push_error(format!("Target not found: {}", target.display()));
            return summary;
        }

        // Membership is captured once, up front
        let files = collect_files(&target);
        summary.total_files = files.len();
        info!(target = %target.display(), files = files.len(), "Collected wipe targets");

        for file in &files {
            let result = self.wipe(file, standard, verify, &mut |progress| {
                on_progress(file, progress)
            });
            summary.absorb(result);
        }

        if target.is_dir() {
            remove_empty_dirs(&target);
        }

        summary.total_duration = started.elapsed();
        summary
    }
}

fn regular_file_metadata(path: &Path) -> EngineResult<Metadata> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_file() => Ok(metadata),
        _ => Err(WipeError::TargetNotFound(path.to_path_buf())),
    }
}

fn open_error(path: &Path, e: io::Error) -> WipeError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        WipeError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        }
    } else {
        WipeError::io("open for writing", e)
    }
}

/// Give the owner write permission on a read-only file
fn ensure_writable(path: &Path, metadata: &Metadata) {
    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }

    match fs::set_permissions(path, permissions) {
        Ok(()) => debug!(path = %path.display(), "Relaxed read-only permission"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not relax permissions"),
    }
}

/// Every regular file under `target`, depth-first: files in subdirectories come
/// before the files of their parent, siblings in name order. A file expands to
/// itself and a missing path to nothing. Symlinks are never followed or collected.
pub fn collect_files(target: &Path) -> Vec<PathBuf> {
    let target = absolutize(target);
    let mut files = Vec::new();

    match fs::symlink_metadata(&target) {
        Ok(metadata) if metadata.is_file() => files.push(target),
        Ok(metadata) if metadata.is_dir() => walk(&target, &mut files),
        _ => {}
    }

    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot list directory");
            return;
        }
    };

    let mut children: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    children.sort();

    let mut here = Vec::new();
    for child in children {
        match fs::symlink_metadata(&child) {
            Ok(metadata) if metadata.is_dir() => walk(&child, files),
            Ok(metadata) if metadata.is_file() => here.push(child),
            _ => {}
        }
    }

    files.extend(here);
}

/// Remove empty directories bottom-up, `root` included. Best effort.
pub fn remove_empty_dirs(root: &Path) {
    remove_empty_children(root);
    if fs::remove_dir(root).is_ok() {
        debug!(dir = %root.display(), "Removed empty directory");
    }
}

fn remove_empty_children(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let is_dir = fs::symlink_metadata(&path)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            remove_empty_children(&path);
            // Fails harmlessly when something survived inside
            if fs::remove_dir(&path).is_ok() {
                debug!(dir = %path.display(), "Removed empty directory");
            }
        }
    }
}
