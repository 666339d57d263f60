use super::strategy::PassPlan;
use crate::PassKind;

/// DoD 5220.22-M three-pass overwrite
pub struct DoDWipe;

impl DoDWipe {
    /// DoD 5220.22-M standard pass 1 pattern (all zeros)
    pub const PASS_1_PATTERN: u8 = 0x00;

    /// DoD 5220.22-M standard pass 2 pattern (all ones)
    pub const PASS_2_PATTERN: u8 = 0xFF;

    /// DoD 5220.22-M requires exactly 3 passes
    pub const PASS_COUNT: usize = 3;

    /// Zeros, ones, then random, in that order
    pub const PASSES: [PassKind; Self::PASS_COUNT] = [PassKind::Zeros, PassKind::Ones, PassKind::Random];

    pub fn plan() -> PassPlan {
        PassPlan::from_passes(&Self::PASSES)
    }
}
