use super::WipeSink;
use crate::algorithms::PassPlan;
use crate::crypto::secure_random_bytes;
use crate::{is_interrupted, EngineResult, PassKind, WipeError};
use std::io::SeekFrom;
use tracing::debug;

/// Snapshot handed to the progress callback after every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassProgress {
    /// 1-based index of the running pass
    pub pass_index: usize,
    pub pass_count: usize,
    pub pass_kind: PassKind,
    /// Bytes written so far in this pass
    pub bytes_done: u64,
    pub file_size: u64,
}

/// Running totals of a multi-pass overwrite.
///
/// Threaded through the executor by the caller so the counts survive an
/// aborted run: after a failure in pass 2, `passes_completed` is still 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassLedger {
    pub passes_completed: u32,
    pub bytes_written: u64,
}

/// Streams each pass of a plan over the first `file_size` bytes of a sink
#[derive(Debug, Clone, Copy)]
pub struct PassExecutor {
    chunk_size: usize,
}

impl PassExecutor {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Run every pass of `plan` in order and return the total bytes written.
    ///
    /// Each pass starts at offset 0 and ends with a sync; the next pass does
    /// not begin until that sync returns. Any seek, write or sync error aborts
    /// the remaining passes.
    pub fn run<S: WipeSink + ?Sized>(
        &self,
        sink: &mut S,
        file_size: u64,
        plan: &PassPlan,
        ledger: &mut PassLedger,
        on_progress: &mut dyn FnMut(&PassProgress),
    ) -> EngineResult<u64> {
        if file_size == 0 {
            return Ok(ledger.bytes_written);
        }

        let buffer_len = (self.chunk_size as u64).min(file_size) as usize;
        let mut buffer = vec![0u8; buffer_len];

        for (index, kind) in plan.iter().enumerate() {
            let pass_index = index + 1;
            self.run_pass(
                sink,
                file_size,
                kind,
                pass_index,
                plan.len(),
                &mut buffer,
                ledger,
                on_progress,
            )?;
            ledger.passes_completed += 1;
            debug!(pass = pass_index, pattern = %kind, bytes = file_size, "Pass committed");
        }

        Ok(ledger.bytes_written)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_pass<S: WipeSink + ?Sized>(
        &self,
        sink: &mut S,
        file_size: u64,
        kind: PassKind,
        pass_index: usize,
        pass_count: usize,
        buffer: &mut [u8],
        ledger: &mut PassLedger,
        on_progress: &mut dyn FnMut(&PassProgress),
    ) -> EngineResult<()> {
        sink.seek(SeekFrom::Start(0))
            .map_err(|e| WipeError::io(format!("seek before pass {}", pass_index), e))?;

        if let Some(byte) = kind.fill_byte() {
            buffer.fill(byte);
        }

        let mut done = 0u64;
        while done < file_size {
            if is_interrupted() {
                return Err(WipeError::Interrupted);
            }

            let len = (file_size - done).min(buffer.len() as u64) as usize;
            let chunk = &mut buffer[..len];

            if kind == PassKind::Random {
                secure_random_bytes(chunk)
                    .map_err(|e| WipeError::io(format!("random fill in pass {}", pass_index), e))?;
            }

            sink.write_all(chunk).map_err(|e| {
                WipeError::io(format!("write at offset {} in pass {}", done, pass_index), e)
            })?;

            done += len as u64;
            ledger.bytes_written += len as u64;

            on_progress(&PassProgress {
                pass_index,
                pass_count,
                pass_kind: kind,
                bytes_done: done,
                file_size,
            });
        }

        sink.sync()
            .map_err(|e| WipeError::io(format!("sync after pass {}", pass_index), e))
    }
}
