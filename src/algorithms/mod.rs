// Pass plan resolution
//
// - strategy.rs: StrategySelector lookup table and PassPlan
// - dod.rs: DoD 5220.22-M pattern constants

pub mod dod;
pub mod strategy;


pub use dod::DoDWipe;
pub use strategy::{select, PassPlan, StrategySelector};
