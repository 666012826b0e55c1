//! Protective devices that absorb part of a surge.

use serde::{Deserialize, Serialize};

/// Anything that can soak up surge energy.
///
/// Implementations must return an amount in `0..=energy`. The surge engine
/// checks this and reports a violation instead of clamping.
pub trait SurgeMitigator {
    fn mitigate_surge(&mut self, energy: f64) -> f64;
}

/// A one-shot fuse.
///
/// Absorbs up to `capacity` from a surge and blows if it absorbed anything.
/// A blown fuse passes the whole surge through until it is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuse {
    pub capacity: f64,
    pub blown: bool,
}

impl Fuse {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            blown: false,
        }
    }

    /// Energy this fuse can still absorb.
    pub fn remaining_capacity(&self) -> f64 {
        if self.blown { 0.0 } else { self.capacity.max(0.0) }
    }

    /// Swap in a fresh fuse element.
    pub fn replace(&mut self) {
        self.blown = false;
    }
}

impl SurgeMitigator for Fuse {
    fn mitigate_surge(&mut self, energy: f64) -> f64 {
        if energy <= 0.0 {
            return 0.0;
        }
        let absorbed = energy.min(self.remaining_capacity());
        if absorbed > 0.0 {
            self.blown = true;
        }
        absorbed
    }
}
