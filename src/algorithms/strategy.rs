use super::dod::DoDWipe;
use crate::{PassKind, SanitizationStandard, StorageProfile};
use std::fmt;

/// Ordered, non-empty sequence of overwrite passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPlan {
    passes: Vec<PassKind>,
}

impl PassPlan {
    /// Single-pass plan
    pub fn single(kind: PassKind) -> Self {
        Self { passes: vec![kind] }
    }

    /// Zeros, ones, random
    pub fn dod() -> Self {
        DoDWipe::plan()
    }

    /// Build a plan from an explicit pass list; an empty list becomes `[Zeros]`
    pub fn from_passes(passes: &[PassKind]) -> Self {
        if passes.is_empty() {
            return Self::single(PassKind::Zeros);
        }
        Self {
            passes: passes.to_vec(),
        }
    }

    pub fn passes(&self) -> &[PassKind] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Pattern left on disk once the plan completes
    pub fn final_pass(&self) -> PassKind {
        self.passes.last().copied().unwrap_or(PassKind::Zeros)
    }

    pub fn iter(&self) -> impl Iterator<Item = PassKind> + '_ {
        self.passes.iter().copied()
    }
}

impl fmt::Display for PassPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.passes.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Maps (medium, standard) to a pass plan.
///
/// | Profile        | Standard        | Plan                  |
/// |----------------|-----------------|-----------------------|
/// | SSD, NVMe      | any             | [Random]              |
/// | HDD, Unknown   | Clear           | [Zeros]               |
/// | HDD, Unknown   | Purge, DoD      | [Zeros, Ones, Random] |
/// | anything else  | any             | [Zeros]               |
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector;

impl StrategySelector {
    pub fn select(&self, profile: StorageProfile, standard: SanitizationStandard) -> PassPlan {
        select(profile, standard)
    }

    /// Human label recorded in results and the audit log, e.g. `HDD (dod)`
    pub fn label(&self, profile: StorageProfile, standard: SanitizationStandard) -> String {
        strategy_label(profile, standard)
    }
}

/// Pure lookup; total over every (profile, standard) pair
pub fn select(profile: StorageProfile, standard: SanitizationStandard) -> PassPlan {
    use SanitizationStandard::*;
    use StorageProfile::*;

    match (profile, standard) {
        // Repeated overwrites only add wear on flash
        (SSD | NVMe, _) => PassPlan::single(PassKind::Random),
        (HDD | Unknown, Clear) => PassPlan::single(PassKind::Zeros),
        (HDD | Unknown, Purge | DoDLegacy) => PassPlan::dod(),
        _ => PassPlan::single(PassKind::Zeros),
    }
}

pub fn strategy_label(profile: StorageProfile, standard: SanitizationStandard) -> String {
    format!("{} ({})", profile.strategy_family(), standard)
}
