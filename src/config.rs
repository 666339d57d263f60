// Engine configuration
//
// Layered the usual way: built-in defaults, then an optional TOML file, then
// OBLIVION_* environment variables.

use crate::{EngineResult, StorageProfile, WipeError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MIB: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Write chunk for magnetic, network and unknown media
    pub hdd_chunk_size: usize,
    /// Write chunk for SATA/SAS flash
    pub ssd_chunk_size: usize,
    /// Write chunk for NVMe flash
    pub nvme_chunk_size: usize,
    /// Read chunk for the pre-wipe content hash
    pub hash_chunk_size: usize,
    /// Number of blocks sampled by the entropy verifier
    pub verify_samples: usize,
    /// Size of each sampled block
    pub verify_block_size: usize,
    /// Minimum average entropy (bits/byte) when the last pass was random
    pub random_entropy_threshold: f64,
    /// Maximum average entropy (bits/byte) when the last pass was a constant fill
    pub constant_entropy_threshold: f64,
    /// Append-only JSON Lines audit log
    pub audit_log_path: PathBuf,
    /// Scrub and delete even when verification fails
    pub delete_on_verification_failure: bool,
    /// Cap on error strings kept in a batch summary
    pub max_reported_errors: usize,
    /// Length of the random name a file is renamed to before unlinking
    pub scrub_name_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hdd_chunk_size: 4 * MIB,
            ssd_chunk_size: 8 * MIB,
            nvme_chunk_size: 16 * MIB,
            hash_chunk_size: MIB,
            verify_samples: 20,
            verify_block_size: 4096,
            random_entropy_threshold: 7.0,
            constant_entropy_threshold: 0.1,
            audit_log_path: default_audit_log_path(),
            delete_on_verification_failure: false,
            max_reported_errors: 20,
            scrub_name_length: 12,
        }
    }
}

impl EngineConfig {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// An explicit `path` must exist; otherwise the per-user config file is
    /// used when present.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(explicit) => {
                builder = builder.add_source(config::File::from(explicit).required(true));
            }
            None => {
                if let Some(user_file) = default_config_file() {
                    builder = builder.add_source(config::File::from(user_file).required(false));
                }
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("OBLIVION").try_parsing(true));

        let settings = builder
            .build()
            .map_err(|e| WipeError::Config(e.to_string()))?;
        let config: EngineConfig = settings
            .try_deserialize()
            .map_err(|e| WipeError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the engine loop forever or sample nothing
    pub fn validate(&self) -> EngineResult<()> {
        let sizes = [
            ("hdd_chunk_size", self.hdd_chunk_size),
            ("ssd_chunk_size", self.ssd_chunk_size),
            ("nvme_chunk_size", self.nvme_chunk_size),
            ("hash_chunk_size", self.hash_chunk_size),
            ("verify_samples", self.verify_samples),
            ("verify_block_size", self.verify_block_size),
            ("scrub_name_length", self.scrub_name_length),
        ];

        for (name, value) in sizes {
            if value == 0 {
                return Err(WipeError::Config(format!("{} must be greater than zero", name)));
            }
        }

        if !(0.0..=8.0).contains(&self.random_entropy_threshold)
            || !(0.0..=8.0).contains(&self.constant_entropy_threshold)
        {
            return Err(WipeError::Config(
                "entropy thresholds must lie within 0.0..=8.0 bits/byte".to_string(),
            ));
        }

        Ok(())
    }

    /// Write chunk for a storage medium: larger buffers for flash
    pub fn chunk_size_for(&self, profile: StorageProfile) -> usize {
        match profile {
            StorageProfile::NVMe => self.nvme_chunk_size,
            StorageProfile::SSD => self.ssd_chunk_size,
            StorageProfile::HDD | StorageProfile::Network | StorageProfile::Unknown => {
                self.hdd_chunk_size
            }
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "oblivion")
}

fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// `<data_dir>/oblivion/audit.jsonl`, or the working directory when no home exists
pub fn default_audit_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("audit.jsonl"))
        .unwrap_or_else(|| PathBuf::from("oblivion_audit.jsonl"))
}
