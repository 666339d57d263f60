/// Failure taxonomy for sanitization operations
///
/// Every attempted file yields exactly one `WipeResult`. When the attempt fails,
/// the `WipeError` that stopped it is classified into a `FailureKind` so that
/// callers (batch summaries, the audit trail, the CLI) can tell an aborted
/// overwrite apart from a wipe that only failed to unlink.
///
/// # Propagation policy
///
/// ```text
///  classification / audit failure ──► logged, never escalates
///  overwrite I/O failure          ──► aborts that file, file NOT deleted
///  verification failure           ──► gates deletion (configurable)
///  delete failure                 ──► partial success, content destroyed
///  one file failing               ──► never stops a directory batch
/// ```
pub mod classification;

pub use classification::FailureKind;
