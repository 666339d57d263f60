/// Common test utilities and fake infrastructure
///
/// This module provides shared functionality for integration tests including:
/// - Canned storage providers (no shelling out)
/// - Faulty and dishonest disk openers
/// - Test helper functions
#[allow(dead_code)]
pub mod fake_disk;
#[allow(dead_code)]
pub mod test_helpers;
