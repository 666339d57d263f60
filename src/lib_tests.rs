// Tests for lib.rs core types and enums
//
// Tests cover: interrupt handling, error display, standard parsing, the
// verification status encoding and strategy families.

use super::*;
use serial_test::serial;

// ==================== INTERRUPT HANDLING TESTS ====================

#[test]
#[serial]
fn test_interrupt_initially_not_set() {
    reset_interrupted();
    assert!(
        !is_interrupted(),
        "Interrupt flag should initially be not set"
    );
}

#[test]
#[serial]
fn test_set_interrupt_flag() {
    reset_interrupted();
    set_interrupted();
    assert!(is_interrupted(), "Interrupt flag should be set");
    reset_interrupted();
}

#[test]
#[serial]
fn test_interrupt_flag_reset() {
    set_interrupted();
    reset_interrupted();
    assert!(!is_interrupted(), "Flag should be cleared after reset");
}

// ==================== ERROR DISPLAY TESTS ====================

#[test]
fn test_error_messages() {
    let err = WipeError::TargetNotFound(PathBuf::from("/tmp/missing.txt"));
    assert!(err.to_string().contains("/tmp/missing.txt"));

    let err = WipeError::io("write at offset 0 in pass 1", std::io::Error::other("disk full"));
    assert_eq!(
        err.to_string(),
        "I/O failure during write at offset 0 in pass 1: disk full"
    );

    let err = WipeError::VerificationFailure {
        expected: PassKind::Random,
        average: 2.0,
    };
    assert_eq!(
        err.to_string(),
        "Entropy verification failed: average 2.000 bits/byte for expected random pattern"
    );

    assert_eq!(WipeError::Interrupted.to_string(), "Operation interrupted by user");
}

#[test]
fn test_error_source_chain() {
    use std::error::Error;

    let err = WipeError::DeleteFailure(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
    assert!(err.source().is_some());
    assert!(WipeError::Interrupted.source().is_none());
}

// ==================== SANITIZATION STANDARD TESTS ====================

#[test]
fn test_standard_parsing() {
    assert_eq!("clear".parse::<SanitizationStandard>().unwrap(), SanitizationStandard::Clear);
    assert_eq!("PURGE".parse::<SanitizationStandard>().unwrap(), SanitizationStandard::Purge);
    assert_eq!(" dod ".parse::<SanitizationStandard>().unwrap(), SanitizationStandard::DoDLegacy);
    assert_eq!("dod5220".parse::<SanitizationStandard>().unwrap(), SanitizationStandard::DoDLegacy);
    assert!(matches!(
        "gutmann".parse::<SanitizationStandard>(),
        Err(WipeError::Config(_))
    ));
}

#[test]
fn test_standard_round_trips_through_display() {
    for standard in [
        SanitizationStandard::Clear,
        SanitizationStandard::Purge,
        SanitizationStandard::DoDLegacy,
    ] {
        assert_eq!(standard.to_string().parse::<SanitizationStandard>().unwrap(), standard);
    }
}

#[test]
fn test_standard_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SanitizationStandard::DoDLegacy).unwrap(), "\"dod\"");
    assert_eq!(serde_json::to_string(&SanitizationStandard::Clear).unwrap(), "\"clear\"");
}

// ==================== VERIFICATION STATUS TESTS ====================

#[test]
fn test_verification_status_encoding() {
    assert_eq!(serde_json::to_string(&VerificationStatus::Passed).unwrap(), "true");
    assert_eq!(serde_json::to_string(&VerificationStatus::Failed).unwrap(), "false");
    assert_eq!(serde_json::to_string(&VerificationStatus::Skipped).unwrap(), "\"skipped\"");
}

#[test]
fn test_verification_status_decoding() {
    let parse = |s: &str| serde_json::from_str::<VerificationStatus>(s);

    assert_eq!(parse("true").unwrap(), VerificationStatus::Passed);
    assert_eq!(parse("false").unwrap(), VerificationStatus::Failed);
    assert_eq!(parse("\"Skipped\"").unwrap(), VerificationStatus::Skipped);
    assert!(parse("\"maybe\"").is_err());
    assert!(parse("1").is_err());
}

// ==================== STORAGE PROFILE TESTS ====================

#[test]
fn test_strategy_families() {
    assert_eq!(StorageProfile::HDD.strategy_family(), "HDD");
    assert_eq!(StorageProfile::Unknown.strategy_family(), "HDD");
    assert_eq!(StorageProfile::SSD.strategy_family(), "SSD/NVMe");
    assert_eq!(StorageProfile::NVMe.strategy_family(), "SSD/NVMe");
    assert_eq!(StorageProfile::Network.strategy_family(), "Network");
}

#[test]
fn test_flash_profiles() {
    assert!(StorageProfile::SSD.is_flash());
    assert!(StorageProfile::NVMe.is_flash());
    assert!(!StorageProfile::HDD.is_flash());
    assert!(!StorageProfile::Network.is_flash());
    assert!(!StorageProfile::Unknown.is_flash());
}

#[test]
fn test_pass_kind_fill_bytes() {
    assert_eq!(PassKind::Zeros.fill_byte(), Some(0x00));
    assert_eq!(PassKind::Ones.fill_byte(), Some(0xFF));
    assert_eq!(PassKind::Random.fill_byte(), None);
}

#[test]
fn test_absolutize() {
    let relative = absolutize(Path::new("some/file.txt"));
    assert!(relative.is_absolute());
    assert!(relative.ends_with("some/file.txt"));

    let absolute = PathBuf::from("/already/absolute");
    assert_eq!(absolutize(&absolute), absolute);
}
