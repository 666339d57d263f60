// Storage medium detection
//
// Organized structure:
// - provider.rs: DiskInfoProvider seam over external tools and sysfs
// - detection.rs: StorageClassifier and the per-platform output parsers

pub mod detection;
pub mod provider;


pub use detection::StorageClassifier;
pub use provider::{DiskInfoProvider, Platform, SystemDiskInfo};
