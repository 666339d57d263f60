// Audit trail
//
// - record.rs: AuditRecord, one JSON object per attempted file
// - logger.rs: AuditLogger, append-only JSON Lines writer and tolerant reader

pub mod logger;
pub mod record;


pub use logger::{AuditIdentity, AuditLogger};
pub use record::AuditRecord;

/// Hash placeholder when the target did not exist
pub const UNKNOWN_HASH: &str = "unknown";

/// Hash placeholder when the target existed but could not be read
pub const HASH_ERROR: &str = "hash_error";
