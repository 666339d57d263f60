/// Classification of `WipeError` into the per-file failure taxonomy
use crate::WipeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a single file's wipe did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Path did not exist (or was not a regular file) at wipe time
    TargetNotFound,

    /// Write access could not be obtained, even after relaxing permissions
    PermissionDenied,

    /// Seek/write/sync failed mid-pass; remaining passes were aborted
    IoFailure,

    /// Entropy check did not meet its threshold after all passes succeeded
    VerificationFailure,

    /// Overwrite and scrub succeeded but the final unlink failed
    DeleteFailure,

    /// Cancelled by an external interrupt
    Interrupted,

    /// Engine configuration rejected before any I/O
    Configuration,
}

impl FailureKind {
    /// Get human-readable description of the failure kind
    pub fn description(&self) -> &'static str {
        match self {
            FailureKind::TargetNotFound => "Target does not exist",
            FailureKind::PermissionDenied => "Write access denied",
            FailureKind::IoFailure => "Overwrite aborted; content partially overwritten",
            FailureKind::VerificationFailure => "Overwrite pattern not confirmed on disk",
            FailureKind::DeleteFailure => "Content destroyed but file could not be removed",
            FailureKind::Interrupted => "Cancelled before the file was fully wiped",
            FailureKind::Configuration => "Invalid engine configuration",
        }
    }

    /// Content was fully overwritten even though the operation failed
    pub fn is_partial_success(&self) -> bool {
        matches!(self, FailureKind::DeleteFailure)
    }

    /// Whether a file that hit this failure may still hold original content
    pub fn may_leave_recoverable_data(&self) -> bool {
        matches!(
            self,
            FailureKind::PermissionDenied | FailureKind::IoFailure | FailureKind::Interrupted
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::TargetNotFound => write!(f, "TargetNotFound"),
            FailureKind::PermissionDenied => write!(f, "PermissionDenied"),
            FailureKind::IoFailure => write!(f, "IOFailure"),
            FailureKind::VerificationFailure => write!(f, "VerificationFailure"),
            FailureKind::DeleteFailure => write!(f, "DeleteFailure"),
            FailureKind::Interrupted => write!(f, "Interrupted"),
            FailureKind::Configuration => write!(f, "Configuration"),
        }
    }
}

impl WipeError {
    /// Classify this error into the per-file failure taxonomy
    pub fn kind(&self) -> FailureKind {
        match self {
            WipeError::TargetNotFound(_) => FailureKind::TargetNotFound,
            WipeError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            WipeError::IoFailure { .. } => FailureKind::IoFailure,
            WipeError::VerificationFailure { .. } => FailureKind::VerificationFailure,
            WipeError::DeleteFailure(_) => FailureKind::DeleteFailure,
            WipeError::Interrupted => FailureKind::Interrupted,
            WipeError::Config(_) => FailureKind::Configuration,
        }
    }
}
