use super::logger::AuditIdentity;
use crate::{absolutize, SanitizationStandard, VerificationStatus, WipeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One line of the audit log. Field names are part of the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub file: String,
    pub size_bytes: u64,
    pub sha256_before: String,
    pub standard: SanitizationStandard,
    pub passes: u32,
    pub verified: VerificationStatus,
    pub duration_sec: f64,
    pub user: String,
    pub hostname: String,
    pub success: bool,
    pub error: Option<String>,
    pub strategy: String,
}

impl AuditRecord {
    pub fn new(
        path: &Path,
        size_bytes: u64,
        sha256_before: &str,
        standard: SanitizationStandard,
        result: &WipeResult,
        identity: &AuditIdentity,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            file: absolutize(path).to_string_lossy().into_owned(),
            size_bytes,
            sha256_before: sha256_before.to_string(),
            standard,
            passes: result.passes_completed,
            verified: result.verified,
            duration_sec: result.duration_secs,
            user: identity.user.clone(),
            hostname: identity.hostname.clone(),
            success: result.success,
            error: result.error.clone(),
            strategy: result.strategy_label.clone(),
        }
    }
}
