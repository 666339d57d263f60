use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

/// Operating system family, used to pick a probing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOS,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else {
            Platform::Other
        }
    }
}

/// Narrow interface to the OS facilities the classifier queries.
///
/// The classifier only ever sees text, so its decision logic can be tested
/// with canned outputs instead of real system tools.
#[cfg_attr(test, mockall::automock)]
pub trait DiskInfoProvider {
    /// Platform whose tools this provider fronts
    fn platform(&self) -> Platform;

    /// Run an external tool and return its stdout. A non-zero exit is an error.
    fn run_command(&self, program: &str, args: &[String]) -> io::Result<String>;

    /// Read a small text file (sysfs attribute)
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

/// Provider backed by the real system tools (`df`, sysfs, PowerShell, `diskutil`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDiskInfo;

impl DiskInfoProvider for SystemDiskInfo {
    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn run_command(&self, program: &str, args: &[String]) -> io::Result<String> {
        let output = Command::new(program).args(args).output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
