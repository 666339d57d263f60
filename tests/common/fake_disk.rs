/// Fake storage used by the integration tests
///
/// - `CannedDisk`: answers classification probes with fixed Linux tool output
/// - `FailingOpener`: real file whose writes fail with ENOSPC past a byte budget
/// - `LyingOpener`: real file that silently stores a low-entropy pattern
///   instead of whatever the executor writes
use oblivion_wipe::drives::Platform;
use oblivion_wipe::io::{TargetOpener, WipeSink};
use oblivion_wipe::{DiskInfoProvider, StorageProfile};
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

/// Provider reporting the same medium for every path
#[derive(Debug, Clone, Copy)]
pub struct CannedDisk {
    pub profile: StorageProfile,
}

impl CannedDisk {
    pub fn hdd() -> Self {
        Self { profile: StorageProfile::HDD }
    }

    pub fn ssd() -> Self {
        Self { profile: StorageProfile::SSD }
    }

    pub fn nvme() -> Self {
        Self { profile: StorageProfile::NVMe }
    }

    fn device(&self) -> (&'static str, &'static str) {
        match self.profile {
            StorageProfile::HDD => ("/dev/sda2", "ext4"),
            StorageProfile::SSD => ("/dev/sdb1", "ext4"),
            StorageProfile::NVMe => ("/dev/nvme0n1p2", "ext4"),
            StorageProfile::Network => ("fileserver:/export/home", "nfs4"),
            StorageProfile::Unknown => ("/dev/mapper/cryptroot", "ext4"),
        }
    }
}

impl DiskInfoProvider for CannedDisk {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn run_command(&self, program: &str, _args: &[String]) -> io::Result<String> {
        if program != "df" {
            return Err(io::Error::new(io::ErrorKind::NotFound, program.to_string()));
        }
        let (source, fs_type) = self.device();
        Ok(format!(
            "Filesystem Type 1024-blocks Used Available Capacity Mounted on\n{} {} 1000000 5000 995000 1% /\n",
            source, fs_type
        ))
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        let path = path.to_string_lossy();
        match self.profile {
            StorageProfile::HDD if path.contains("/sda/") => Ok("1\n".to_string()),
            StorageProfile::SSD if path.contains("/sdb/") => Ok("0\n".to_string()),
            StorageProfile::NVMe if path.contains("/nvme0n1/") => Ok("0\n".to_string()),
            _ => Err(io::Error::new(io::ErrorKind::NotFound, path.into_owned())),
        }
    }
}

fn open_for_write(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

/// Opens files whose writes fail once `budget` bytes have been written
#[derive(Debug, Clone, Copy)]
pub struct FailingOpener {
    pub budget: u64,
}

pub struct FailingFile {
    file: File,
    written: u64,
    budget: u64,
}

impl TargetOpener for FailingOpener {
    type Sink = FailingFile;

    fn open(&self, path: &Path) -> io::Result<FailingFile> {
        Ok(FailingFile {
            file: open_for_write(path)?,
            written: 0,
            budget: self.budget,
        })
    }
}

impl Write for FailingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.budget.saturating_sub(self.written);
        if remaining == 0 {
            return Err(io::Error::other("No space left on device (os error 28)"));
        }
        let len = (buf.len() as u64).min(remaining) as usize;
        let n = self.file.write(&buf[..len])?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FailingFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl WipeSink for FailingFile {
    fn sync(&mut self) -> io::Result<()> {
        self.file.sync()
    }
}

/// Opens files that store a repeating 0,1,2,3 pattern whatever is written
#[derive(Debug, Clone, Copy, Default)]
pub struct LyingOpener;

pub struct LyingFile {
    file: File,
    position: u64,
}

impl TargetOpener for LyingOpener {
    type Sink = LyingFile;

    fn open(&self, path: &Path) -> io::Result<LyingFile> {
        Ok(LyingFile {
            file: open_for_write(path)?,
            position: 0,
        })
    }
}

impl Write for LyingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let fake: Vec<u8> = (0..buf.len() as u64)
            .map(|i| ((self.position + i) % 4) as u8)
            .collect();
        let n = self.file.write(&fake)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LyingFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.position = self.file.seek(pos)?;
        Ok(self.position)
    }
}

impl WipeSink for LyingFile {
    fn sync(&mut self) -> io::Result<()> {
        self.file.sync()
    }
}
