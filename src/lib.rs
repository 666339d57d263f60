// Allow uppercase acronyms for industry-standard terms like HDD, SSD
#![allow(clippy::upper_case_acronyms)]

pub mod algorithms;
pub mod audit;
pub mod config;
pub mod crypto;
pub mod drives;
pub mod error;
pub mod io;
pub mod scrub;
pub mod ui;
pub mod verification;
pub mod wipe_orchestrator;

// Re-export the main entry points for convenience
pub use audit::{AuditLogger, AuditRecord};
pub use config::EngineConfig;
pub use drives::{DiskInfoProvider, StorageClassifier, SystemDiskInfo};
pub use error::FailureKind;
pub use wipe_orchestrator::{collect_files, WipeOrchestrator, WipePreview, WipeSummary};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

// Global flag for handling Ctrl+C interrupts
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Set the interrupt flag (called by signal handler)
pub fn set_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Check if an interrupt has been received
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reset the interrupt flag (primarily for testing)
pub fn reset_interrupted() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("Target not found or not a regular file: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("Permission denied on {}: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O failure during {operation}: {source}")]
    IoFailure {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Entropy verification failed: average {average:.3} bits/byte for expected {expected} pattern")]
    VerificationFailure { expected: PassKind, average: f64 },

    #[error("Wipe successful but delete failed: {0}")]
    DeleteFailure(#[source] std::io::Error),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WipeError {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        WipeError::IoFailure {
            operation: operation.into(),
            source,
        }
    }
}

pub type EngineResult<T> = Result<T, WipeError>;

/// Storage medium backing a wipe target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageProfile {
    HDD,
    SSD,
    NVMe,
    Network,
    Unknown,
}

impl StorageProfile {
    /// Flash media get a single random pass regardless of standard
    pub fn is_flash(&self) -> bool {
        matches!(self, StorageProfile::SSD | StorageProfile::NVMe)
    }

    /// Family name used in strategy labels
    pub fn strategy_family(&self) -> &'static str {
        match self {
            StorageProfile::SSD | StorageProfile::NVMe => "SSD/NVMe",
            StorageProfile::Network => "Network",
            StorageProfile::HDD | StorageProfile::Unknown => "HDD",
        }
    }
}

impl fmt::Display for StorageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageProfile::HDD => write!(f, "HDD"),
            StorageProfile::SSD => write!(f, "SSD"),
            StorageProfile::NVMe => write!(f, "NVMe"),
            StorageProfile::Network => write!(f, "Network"),
            StorageProfile::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Sanitization tier requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SanitizationStandard {
    /// NIST SP 800-88 Clear: single pass
    #[serde(rename = "clear")]
    Clear,
    /// NIST SP 800-88 Purge: medium-aware, 3 passes on magnetic media
    #[serde(rename = "purge")]
    Purge,
    /// DoD 5220.22-M: 3 passes (0x00, 0xFF, random)
    #[serde(rename = "dod")]
    DoDLegacy,
}

impl SanitizationStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizationStandard::Clear => "clear",
            SanitizationStandard::Purge => "purge",
            SanitizationStandard::DoDLegacy => "dod",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SanitizationStandard::Clear => "NIST SP 800-88 Clear",
            SanitizationStandard::Purge => "NIST SP 800-88 Purge",
            SanitizationStandard::DoDLegacy => "DoD 5220.22-M (3-pass)",
        }
    }
}

impl fmt::Display for SanitizationStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizationStandard {
    type Err = WipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clear" | "nist-clear" => Ok(SanitizationStandard::Clear),
            "purge" | "nist-purge" => Ok(SanitizationStandard::Purge),
            "dod" | "dod5220" | "dod-legacy" => Ok(SanitizationStandard::DoDLegacy),
            other => Err(WipeError::Config(format!(
                "unknown sanitization standard '{}' (expected clear, purge or dod)",
                other
            ))),
        }
    }
}

/// Byte pattern written by a single overwrite pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassKind {
    Zeros,
    Ones,
    Random,
}

impl PassKind {
    /// Constant fill byte, or `None` for random data
    pub fn fill_byte(&self) -> Option<u8> {
        match self {
            PassKind::Zeros => Some(0x00),
            PassKind::Ones => Some(0xFF),
            PassKind::Random => None,
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Zeros => write!(f, "zeros"),
            PassKind::Ones => write!(f, "ones"),
            PassKind::Random => write!(f, "random"),
        }
    }
}

/// Outcome of the optional post-wipe entropy check.
///
/// Serialized as `true`, `false` or `"skipped"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Passed,
    Failed,
    Skipped,
}

impl Serialize for VerificationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VerificationStatus::Passed => serializer.serialize_bool(true),
            VerificationStatus::Failed => serializer.serialize_bool(false),
            VerificationStatus::Skipped => serializer.serialize_str("skipped"),
        }
    }
}

impl<'de> Deserialize<'de> for VerificationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(VerificationStatus::Passed),
            Repr::Flag(false) => Ok(VerificationStatus::Failed),
            Repr::Text(text) if text.eq_ignore_ascii_case("skipped") => {
                Ok(VerificationStatus::Skipped)
            }
            Repr::Text(text) => Err(serde::de::Error::custom(format!(
                "invalid verification status '{}'",
                text
            ))),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Passed => write!(f, "passed"),
            VerificationStatus::Failed => write!(f, "failed"),
            VerificationStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of wiping a single file. Produced exactly once per attempted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeResult {
    pub path: PathBuf,
    pub success: bool,
    pub file_size: u64,
    pub passes_completed: u32,
    pub bytes_written_total: u64,
    pub duration_secs: f64,
    pub verified: VerificationStatus,
    pub strategy_label: String,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
}

/// Resolve `path` against the current directory without touching the filesystem
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod lib_tests;
