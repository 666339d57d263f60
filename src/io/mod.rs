// Overwrite I/O
//
// - pass_executor.rs: PassExecutor, the per-pass write/sync loop
// - WipeSink / TargetOpener: the seam between the executor and the disk, so the
//   pass ordering can be observed with an instrumented fake

pub mod pass_executor;


pub use pass_executor::{PassExecutor, PassLedger, PassProgress};

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, Write};
use std::path::Path;

/// Writable, seekable destination of overwrite passes
pub trait WipeSink: Write + Seek {
    /// Flush buffers and force the data to the medium
    fn sync(&mut self) -> io::Result<()>;
}

impl WipeSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

/// Opens a wipe target for in-place overwriting
pub trait TargetOpener {
    type Sink: WipeSink;

    fn open(&self, path: &Path) -> io::Result<Self::Sink>;
}

/// Opens real files for writing, without truncation
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl TargetOpener for FsOpener {
    type Sink = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new().write(true).open(path)
    }
}
