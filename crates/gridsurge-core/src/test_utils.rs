//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use std::collections::VecDeque;

use crate::grid::PowerGrid;
use crate::id::{BuildingId, NetworkId, Position};
use crate::rng::{RandomSource, SimRng};
use crate::world::{Capability, CapabilityQuery, DamageKind, Network, SurgeEffects};

// ===========================================================================
// Scripted randomness
// ===========================================================================

/// A [`RandomSource`] whose `index` and `range` answers are scripted.
///
/// Scripted answers are consumed in order. Once a script runs out the
/// fallback [`SimRng`] takes over. Every `range` request is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    indices: VecDeque<usize>,
    ranges: VecDeque<i32>,
    range_requests: Vec<(i32, i32)>,
    fallback: SimRng,
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self {
            indices: VecDeque::new(),
            ranges: VecDeque::new(),
            range_requests: Vec::new(),
            fallback: SimRng::new(0),
        }
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn with_ranges(mut self, values: impl IntoIterator<Item = i32>) -> Self {
        self.ranges.extend(values);
        self
    }

    pub fn range_requests(&self) -> &[(i32, i32)] {
        &self.range_requests
    }
}

impl RandomSource for ScriptedRng {
    fn next_u64(&mut self) -> u64 {
        self.fallback.next_u64()
    }

    fn index(&mut self, len: usize) -> usize {
        match self.indices.pop_front() {
            Some(i) => i.min(len.saturating_sub(1)),
            None => self.fallback.index(len),
        }
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        self.range_requests.push((lo, hi));
        match self.ranges.pop_front() {
            Some(v) => v,
            None => self.fallback.range(lo, hi),
        }
    }
}

// ===========================================================================
// Instrumented world
// ===========================================================================

/// A collaborator misbehaviour to inject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    /// Every fuse reports absorbing this amount, whatever it was offered.
    Absorb(f64),
    /// Every storage device reports holding this charge, both when read and
    /// when drained.
    Drain(f64),
}

/// A [`PowerGrid`] wrapper that records fuse calls and can inject faults.
#[derive(Debug, Clone, Default)]
pub struct InstrumentedGrid {
    pub inner: PowerGrid,
    pub fault: Option<Fault>,
    /// `(fuse, offered)` for every `mitigate_surge` call, in order.
    pub mitigate_calls: Vec<(BuildingId, f64)>,
}

impl InstrumentedGrid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapabilityQuery for InstrumentedGrid {
    fn find_all(&self, capability: Capability) -> Vec<BuildingId> {
        self.inner.find_all(capability)
    }

    fn has_capability(&self, building: BuildingId, capability: Capability) -> bool {
        self.inner.has_capability(building, capability)
    }

    fn network_of(&self, building: BuildingId) -> Option<Network> {
        self.inner.network_of(building)
    }

    fn stored_energy(&self, building: BuildingId) -> Option<f64> {
        let stored = self.inner.stored_energy(building)?;
        match self.fault {
            Some(Fault::Drain(lie)) => Some(lie),
            _ => Some(stored),
        }
    }

    fn position(&self, building: BuildingId) -> Option<Position> {
        self.inner.position(building)
    }

    fn max_hit_points(&self, building: BuildingId) -> Option<u32> {
        self.inner.max_hit_points(building)
    }

    fn is_destroyed(&self, building: BuildingId) -> bool {
        self.inner.is_destroyed(building)
    }
}

impl SurgeEffects for InstrumentedGrid {
    fn drain_storage(&mut self, building: BuildingId) -> Option<f64> {
        let drained = self.inner.drain_storage(building)?;
        match self.fault {
            Some(Fault::Drain(lie)) => Some(lie),
            _ => Some(drained),
        }
    }

    fn mitigate_surge(&mut self, fuse: BuildingId, energy: f64) -> f64 {
        self.mitigate_calls.push((fuse, energy));
        let absorbed = self.inner.mitigate_surge(fuse, energy);
        match self.fault {
            Some(Fault::Absorb(lie)) => lie,
            _ => absorbed,
        }
    }

    fn apply_explosion(&mut self, center: Position, radius: f64, kind: DamageKind) {
        self.inner.apply_explosion(center, radius, kind);
    }

    fn apply_damage(&mut self, target: BuildingId, kind: DamageKind, amount: u32) {
        self.inner.apply_damage(target, kind, amount);
    }
}

// ===========================================================================
// Grid builders
// ===========================================================================

/// Handles into a single-network grid built by [`single_network`].
#[derive(Debug, Clone)]
pub struct SingleNetwork {
    pub network: NetworkId,
    pub batteries: Vec<BuildingId>,
    pub conduits: Vec<BuildingId>,
    pub fuses: Vec<BuildingId>,
}

/// Build one network laid out along the x axis: batteries, then conduits,
/// then fuses, one cell apart.
pub fn single_network(
    grid: &mut PowerGrid,
    charges: &[f64],
    conduits: usize,
    fuse_capacities: &[f64],
) -> SingleNetwork {
    let network = grid.create_network();
    let mut x = 0;
    let mut next_cell = || {
        let p = Position::new(x, 0);
        x += 1;
        p
    };

    let batteries = charges
        .iter()
        .map(|c| grid.add_battery(network, next_cell(), *c))
        .collect();
    let conduits = (0..conduits)
        .map(|_| grid.add_conduit(network, next_cell()))
        .collect();
    let fuses = fuse_capacities
        .iter()
        .map(|cap| grid.add_fuse(network, next_cell(), *cap))
        .collect();

    SingleNetwork {
        network,
        batteries,
        conduits,
        fuses,
    }
}
