/// Common test helper functions
use oblivion_wipe::audit::AuditIdentity;
use oblivion_wipe::io::TargetOpener;
use oblivion_wipe::{AuditLogger, DiskInfoProvider, EngineConfig, WipeOrchestrator};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create `dir/name` (and its parents) holding `size` bytes of recognizable data
pub fn create_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    let content: Vec<u8> = b"CONFIDENTIAL ".iter().copied().cycle().take(size).collect();
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Verify that a file contains only `byte`
pub fn verify_all_bytes(path: &Path, byte: u8) -> std::io::Result<bool> {
    let mut file = fs::File::open(path)?;
    let mut buffer = vec![0u8; 4096];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        if buffer[..bytes_read].iter().any(|&b| b != byte) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Small chunks so multi-chunk behavior shows up on small files; audit log in `dir`
pub fn test_config(dir: &TempDir) -> EngineConfig {
    EngineConfig {
        hdd_chunk_size: 1024,
        ssd_chunk_size: 1024,
        nvme_chunk_size: 1024,
        audit_log_path: audit_path(dir),
        ..Default::default()
    }
}

pub fn audit_path(dir: &TempDir) -> PathBuf {
    dir.path().join("logs").join("audit.jsonl")
}

pub fn orchestrator<P: DiskInfoProvider, O: TargetOpener>(
    config: EngineConfig,
    provider: P,
    opener: O,
) -> WipeOrchestrator<P, O> {
    let identity = AuditIdentity {
        user: "integration".to_string(),
        hostname: "ci-host".to_string(),
    };
    let logger = AuditLogger::with_identity(config.audit_log_path.clone(), identity);
    WipeOrchestrator::with_parts(config, provider, opener).with_audit_logger(logger)
}
