#![warn(missing_docs)]
//! Core primitives shared across the workspace: item descriptions, the tick
//! counter, and weighted random selection.

pub mod item;
pub mod material;
pub mod weighted;

use serde::{Deserialize, Serialize};

pub use item::{ItemCreator, ItemFlags, ItemOptions, ItemStack, MAX_STACK_SIZE};
pub use material::{Material, MaterialError, DEFAULT_NAMESPACE};
pub use weighted::WeightedRandomBag;

/// Fixed tick type (20 ticks per second, 50 ms per tick).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick of any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Ticks elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
