//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod companion;
mod gear;

pub use base_stats::BaseStatsSource;
pub use companion::CompanionSource;
pub use gear::GearSource;

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a StatBlock
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Suggested priorities:
    /// - Base stats: -100
    /// - Gear: 0
    /// - Companions: 100
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
