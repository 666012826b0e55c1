//! The narrow interface between surge resolution and the host world.
//!
//! The host owns buildings, network topology, battery charge, fuses and hit
//! points. Surge resolution reaches them only through two traits:
//!
//! - [`CapabilityQuery`]: read-only lookups by capability.
//! - [`SurgeEffects`]: the mutations an incident performs.
//!
//! [`HostWorld`] is implemented for anything providing both.

use serde::{Deserialize, Serialize};

use crate::id::{BuildingId, NetworkId, Position};

/// What a building can do, as far as a surge is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Holds charge that a surge drains.
    Storage,
    /// A plain transmission segment; the only valid surge victim.
    Conduit,
    /// A transmission segment that can absorb part of a surge.
    Fuse,
}

/// Damage delivered by explosions and direct hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Incendiary.
    Flame,
    /// High explosive.
    Bomb,
}

/// An owned snapshot of one connected power network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: NetworkId,
    /// Transmission segments in the host's enumeration order.
    pub transmitters: Vec<BuildingId>,
    /// Storage devices connected to this network.
    pub storage: Vec<BuildingId>,
}

/// Read-only capability lookups over the host world.
pub trait CapabilityQuery {
    /// Every building with the given capability, in a stable order.
    fn find_all(&self, capability: Capability) -> Vec<BuildingId>;

    fn has_capability(&self, building: BuildingId, capability: Capability) -> bool;

    /// The network the building is connected to, if any.
    fn network_of(&self, building: BuildingId) -> Option<Network>;

    /// Current charge of a storage device. `None` if it is not storage.
    fn stored_energy(&self, building: BuildingId) -> Option<f64>;

    fn position(&self, building: BuildingId) -> Option<Position>;

    fn max_hit_points(&self, building: BuildingId) -> Option<u32>;

    /// Unknown buildings count as destroyed.
    fn is_destroyed(&self, building: BuildingId) -> bool;
}

/// Mutations performed by a surge.
pub trait SurgeEffects {
    /// Empty a storage device and return what it held.
    fn drain_storage(&mut self, building: BuildingId) -> Option<f64>;

    /// Offer `energy` to a fuse and return the amount it absorbed.
    fn mitigate_surge(&mut self, fuse: BuildingId, energy: f64) -> f64;

    fn apply_explosion(&mut self, center: Position, radius: f64, kind: DamageKind);

    fn apply_damage(&mut self, target: BuildingId, kind: DamageKind, amount: u32);
}

/// A host world that can both answer queries and receive surge effects.
pub trait HostWorld: CapabilityQuery + SurgeEffects {}

impl<T: CapabilityQuery + SurgeEffects + ?Sized> HostWorld for T {}
