use super::provider::{DiskInfoProvider, Platform, SystemDiskInfo};
use crate::StorageProfile;
use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tracing::debug;

lazy_static! {
    // nvme0n1p2 -> nvme0n1, mmcblk0p1 -> mmcblk0, loop3p1 -> loop3
    static ref NUMBERED_DEVICE: Regex =
        Regex::new(r"^((?:nvme\d+n\d+)|(?:mmcblk\d+)|(?:loop\d+))(?:p\d+)?$").unwrap();
    // sda1 -> sda, vdb2 -> vdb, xvda1 -> xvda
    static ref LETTERED_PARTITION: Regex = Regex::new(r"^([a-z]+)\d+$").unwrap();
    static ref SOLID_STATE: Regex = Regex::new(r"(?m)^\s*Solid State:\s+(Yes|No)\s*$").unwrap();
    static ref PROTOCOL: Regex = Regex::new(r"(?m)^\s*Protocol:\s+(.+?)\s*$").unwrap();
}

const NETWORK_FILESYSTEMS: &[&str] = &[
    "nfs", "nfs4", "cifs", "smb3", "smbfs", "sshfs", "fuse.sshfs", "9p", "afs", "ceph",
    "glusterfs", "fuse.glusterfs", "webdav", "davfs",
];

/// One row of `df -P` (or `df -PT`) output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: String,
    pub fs_type: Option<String>,
}

/// Turns a path into the `StorageProfile` of the medium backing it.
///
/// Probing failures of any kind resolve to `Unknown`; `classify` never errors.
pub struct StorageClassifier<P: DiskInfoProvider = SystemDiskInfo> {
    provider: P,
}

impl Default for StorageClassifier<SystemDiskInfo> {
    fn default() -> Self {
        Self::new(SystemDiskInfo)
    }
}

impl<P: DiskInfoProvider> StorageClassifier<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify the medium backing `path`, failing soft to `Unknown`
    pub fn classify(&self, path: &Path) -> StorageProfile {
        match self.try_classify(path) {
            Ok(profile) => {
                debug!(path = %path.display(), profile = %profile, "Classified storage medium");
                profile
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Storage probe failed, assuming Unknown");
                StorageProfile::Unknown
            }
        }
    }

    fn try_classify(&self, path: &Path) -> Result<StorageProfile> {
        match self.provider.platform() {
            Platform::Linux => self.classify_linux(path),
            Platform::Windows => self.classify_windows(path),
            Platform::MacOS => self.classify_macos(path),
            Platform::Other => Ok(StorageProfile::Unknown),
        }
    }

    /// mount point -> block device -> rotational flag
    fn classify_linux(&self, path: &Path) -> Result<StorageProfile> {
        let df = self
            .provider
            .run_command("df", &["-P".to_string(), "-T".to_string(), path_arg(path)])?;
        let mount = parse_df_output(&df, true).ok_or_else(|| anyhow!("Unparseable df output"))?;

        if is_network_mount(&mount) {
            return Ok(StorageProfile::Network);
        }

        let device_name = Path::new(&mount.source)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Mount source '{}' is not a device", mount.source))?;
        let base = parent_block_device(device_name);

        let rotational = self
            .provider
            .read_file(Path::new(&format!("/sys/block/{}/queue/rotational", base)))?;

        Ok(profile_from_rotational(&base, &rotational))
    }

    /// MediaType property via Get-PhysicalDisk, refined to NVMe from the model
    fn classify_windows(&self, path: &Path) -> Result<StorageProfile> {
        let raw = path.to_string_lossy();
        if raw.starts_with(r"\\") && !raw.starts_with(r"\\?\") {
            return Ok(StorageProfile::Network);
        }

        let letter = windows_drive_letter(&raw)
            .ok_or_else(|| anyhow!("No drive letter in '{}'", raw))?;

        let media_type = self.powershell(&physical_disk_query(letter, "MediaType"))?;
        let profile = profile_from_media_type(&media_type);

        if profile == StorageProfile::SSD {
            let model = self.powershell(&physical_disk_query(letter, "Model"))?;
            if model.to_uppercase().contains("NVME") {
                return Ok(StorageProfile::NVMe);
            }
        }

        Ok(profile)
    }

    /// "Solid State" flag from `diskutil info`, refined to NVMe from the protocol
    fn classify_macos(&self, path: &Path) -> Result<StorageProfile> {
        if let Ok(df) = self.provider.run_command("df", &["-P".to_string(), path_arg(path)]) {
            if let Some(mount) = parse_df_output(&df, false) {
                if is_network_mount(&mount) {
                    return Ok(StorageProfile::Network);
                }
            }
        }

        let info = self
            .provider
            .run_command("diskutil", &["info".to_string(), path_arg(path)])?;

        Ok(profile_from_diskutil(&info))
    }

    fn powershell(&self, script: &str) -> Result<String> {
        let args = [
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            script.to_string(),
        ];
        Ok(self.provider.run_command("powershell", &args)?.trim().to_string())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Parse the data row of `df -P` output. With `typed`, the second column is the fs type.
pub(crate) fn parse_df_output(output: &str, typed: bool) -> Option<MountEntry> {
    let row = output
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())?;
    let mut fields = row.split_whitespace();

    let source = fields.next()?.to_string();
    let fs_type = if typed {
        Some(fields.next()?.to_string())
    } else {
        None
    };

    Some(MountEntry { source, fs_type })
}

/// Remote mount sources (`host:/export`, `//host/share`) or network filesystem types
pub(crate) fn is_network_mount(mount: &MountEntry) -> bool {
    if let Some(fs_type) = &mount.fs_type {
        if NETWORK_FILESYSTEMS.contains(&fs_type.to_lowercase().as_str()) {
            return true;
        }
    }

    let source = mount.source.as_str();
    if source.starts_with("//") || source.starts_with(r"\\") {
        return true;
    }

    // host:/path, but not /dev/... or a bare device name
    match source.split_once(":/") {
        Some((host, _)) => !host.is_empty() && !host.contains('/'),
        None => false,
    }
}

/// Strip the partition suffix from a block device name
pub(crate) fn parent_block_device(device: &str) -> String {
    if let Some(caps) = NUMBERED_DEVICE.captures(device) {
        return caps[1].to_string();
    }
    if let Some(caps) = LETTERED_PARTITION.captures(device) {
        return caps[1].to_string();
    }
    device.to_string()
}

pub(crate) fn profile_from_rotational(device: &str, rotational: &str) -> StorageProfile {
    match rotational.trim() {
        "0" if device.contains("nvme") => StorageProfile::NVMe,
        "0" => StorageProfile::SSD,
        "1" => StorageProfile::HDD,
        _ => StorageProfile::Unknown,
    }
}

/// Map Get-PhysicalDisk MediaType. "Unspecified" (typical for virtual disks) is
/// treated as magnetic so it still gets the full overwrite.
pub(crate) fn profile_from_media_type(media_type: &str) -> StorageProfile {
    let media_type = media_type.to_uppercase();
    if media_type.contains("SSD") {
        StorageProfile::SSD
    } else if media_type.contains("HDD") || media_type.contains("UNSPECIFIED") {
        StorageProfile::HDD
    } else {
        StorageProfile::Unknown
    }
}

pub(crate) fn profile_from_diskutil(info: &str) -> StorageProfile {
    let solid_state = match SOLID_STATE.captures(info) {
        Some(caps) => &caps[1] == "Yes",
        None => return StorageProfile::Unknown,
    };

    if !solid_state {
        return StorageProfile::HDD;
    }

    let nvme_protocol = PROTOCOL
        .captures(info)
        .map(|caps| {
            let protocol = caps[1].to_string();
            protocol.contains("PCI-Express") || protocol.contains("NVMe")
        })
        .unwrap_or(false);

    if nvme_protocol || info.contains("NVMe") {
        StorageProfile::NVMe
    } else {
        StorageProfile::SSD
    }
}

pub(crate) fn windows_drive_letter(path: &str) -> Option<char> {
    let trimmed = path.strip_prefix(r"\\?\").unwrap_or(path);
    let mut chars = trimmed.chars();
    let letter = chars.next()?;
    if letter.is_ascii_alphabetic() && chars.next() == Some(':') {
        Some(letter.to_ascii_uppercase())
    } else {
        None
    }
}

fn physical_disk_query(letter: char, property: &str) -> String {
    format!(
        "Get-PhysicalDisk | Where-Object {{ (Get-Partition | Where-Object DriveLetter -eq '{}').DiskNumber -eq $_.DeviceId }} | Select-Object -ExpandProperty {}",
        letter, property
    )
}
