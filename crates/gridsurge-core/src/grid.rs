//! In-memory host world.
//!
//! [`PowerGrid`] owns buildings, declared power networks, battery charge,
//! fuses and hit points, and implements [`CapabilityQuery`] and
//! [`SurgeEffects`] over them. It lets the incident run end to end without a
//! game engine.
//!
//! # Design
//!
//! - Buildings live in a slotmap keyed by [`BuildingId`].
//! - Networks are declared by the caller; topology is never computed.
//! - Each network keeps its transmitters and storage in insertion order.
//!   That order is the enumeration order the surge engine sees.
//! - Explosions damage every building whose cell lies within the radius.
//!   Buildings reaching zero hit points are removed from the grid.
//! - Every applied effect is appended to an effect log for inspection.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::fuse::{Fuse, SurgeMitigator};
use crate::id::{BuildingId, NetworkId, Position};
use crate::world::{Capability, CapabilityQuery, DamageKind, Network, SurgeEffects};

/// Default hit points of a conduit segment.
pub const CONDUIT_MAX_HIT_POINTS: u32 = 80;
/// Default hit points of a battery.
pub const BATTERY_MAX_HIT_POINTS: u32 = 100;
/// Default hit points of a fuse.
pub const FUSE_MAX_HIT_POINTS: u32 = 80;

/// Damage an explosion deals to each building it reaches.
pub fn explosion_damage(kind: DamageKind) -> u32 {
    match kind {
        DamageKind::Flame => 10,
        DamageKind::Bomb => 50,
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// What a building does on the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildingRole {
    /// A storage device and its current charge.
    Battery { charge: f64 },
    /// A plain transmission segment.
    Conduit,
    /// A transmission segment with a fuse attached.
    Fuse(Fuse),
    /// Anything else occupying a cell (walls, furniture, ...).
    Structure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub role: BuildingRole,
    pub position: Position,
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub network: Option<NetworkId>,
}

impl Building {
    fn has(&self, capability: Capability) -> bool {
        matches!(
            (capability, &self.role),
            (Capability::Storage, BuildingRole::Battery { .. })
                | (Capability::Conduit, BuildingRole::Conduit)
                | (Capability::Fuse, BuildingRole::Fuse(_))
        )
    }
}

// ---------------------------------------------------------------------------
// Power network
// ---------------------------------------------------------------------------

/// A declared power network: transmission segments plus storage devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerNetwork {
    /// Conduits and fuses, in insertion order.
    pub transmitters: Vec<BuildingId>,
    /// Batteries, in insertion order.
    pub storage: Vec<BuildingId>,
}

impl PowerNetwork {
    pub fn add_transmitter(&mut self, node: BuildingId) {
        if !self.transmitters.contains(&node) {
            self.transmitters.push(node);
        }
    }

    pub fn add_storage(&mut self, node: BuildingId) {
        if !self.storage.contains(&node) {
            self.storage.push(node);
        }
    }

    /// Remove a node from any role in this network.
    pub fn remove_node(&mut self, node: BuildingId) {
        self.transmitters.retain(|n| *n != node);
        self.storage.retain(|n| *n != node);
    }
}

// ---------------------------------------------------------------------------
// Effect log
// ---------------------------------------------------------------------------

/// An effect the grid applied on behalf of a surge.
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedEffect {
    Explosion {
        center: Position,
        radius: f64,
        kind: DamageKind,
    },
    Damage {
        target: BuildingId,
        kind: DamageKind,
        amount: u32,
    },
    Destroyed {
        building: BuildingId,
        position: Position,
    },
}

// ---------------------------------------------------------------------------
// Power grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PowerGrid {
    buildings: SlotMap<BuildingId, Building>,
    networks: BTreeMap<NetworkId, PowerNetwork>,
    effects: Vec<AppliedEffect>,
    next_network_id: u32,
}

impl PowerGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new, empty power network and return its ID.
    pub fn create_network(&mut self) -> NetworkId {
        let id = NetworkId(self.next_network_id);
        self.next_network_id += 1;
        self.networks.insert(id, PowerNetwork::default());
        id
    }

    pub fn power_network(&self, id: NetworkId) -> Option<&PowerNetwork> {
        self.networks.get(&id)
    }

    /// Place a battery holding `charge` on a network.
    pub fn add_battery(&mut self, network: NetworkId, position: Position, charge: f64) -> BuildingId {
        let id = self.place(
            BuildingRole::Battery { charge },
            position,
            BATTERY_MAX_HIT_POINTS,
            Some(network),
        );
        if let Some(net) = self.networks.get_mut(&network) {
            net.add_storage(id);
        }
        id
    }

    /// Place a plain conduit segment on a network.
    pub fn add_conduit(&mut self, network: NetworkId, position: Position) -> BuildingId {
        let id = self.place(
            BuildingRole::Conduit,
            position,
            CONDUIT_MAX_HIT_POINTS,
            Some(network),
        );
        if let Some(net) = self.networks.get_mut(&network) {
            net.add_transmitter(id);
        }
        id
    }

    /// Place a fuse of the given capacity on a network.
    pub fn add_fuse(&mut self, network: NetworkId, position: Position, capacity: f64) -> BuildingId {
        let id = self.place(
            BuildingRole::Fuse(Fuse::new(capacity)),
            position,
            FUSE_MAX_HIT_POINTS,
            Some(network),
        );
        if let Some(net) = self.networks.get_mut(&network) {
            net.add_transmitter(id);
        }
        id
    }

    /// Place an unpowered structure. It only matters as explosion collateral.
    pub fn add_structure(&mut self, position: Position, max_hit_points: u32) -> BuildingId {
        self.place(BuildingRole::Structure, position, max_hit_points, None)
    }

    fn place(
        &mut self,
        role: BuildingRole,
        position: Position,
        max_hit_points: u32,
        network: Option<NetworkId>,
    ) -> BuildingId {
        self.buildings.insert(Building {
            role,
            position,
            hit_points: max_hit_points,
            max_hit_points,
            network,
        })
    }

    /// Unplug a building from its network. It stays on the map.
    pub fn disconnect(&mut self, id: BuildingId) {
        let Some(b) = self.buildings.get_mut(id) else {
            return;
        };
        if let Some(net) = b.network.take().and_then(|n| self.networks.get_mut(&n)) {
            net.remove_node(id);
        }
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id)
    }

    /// Override a building's maximum hit points and heal it to full.
    pub fn set_max_hit_points(&mut self, id: BuildingId, max_hit_points: u32) {
        if let Some(b) = self.buildings.get_mut(id) {
            b.max_hit_points = max_hit_points;
            b.hit_points = max_hit_points;
        }
    }

    pub fn hit_points(&self, id: BuildingId) -> Option<u32> {
        self.buildings.get(id).map(|b| b.hit_points)
    }

    /// Set a battery's charge. Ignored for other buildings.
    pub fn set_charge(&mut self, id: BuildingId, value: f64) {
        if let Some(Building {
            role: BuildingRole::Battery { charge },
            ..
        }) = self.buildings.get_mut(id)
        {
            *charge = value;
        }
    }

    pub fn fuse(&self, id: BuildingId) -> Option<&Fuse> {
        match self.buildings.get(id).map(|b| &b.role) {
            Some(BuildingRole::Fuse(fuse)) => Some(fuse),
            _ => None,
        }
    }

    pub fn fuse_mut(&mut self, id: BuildingId) -> Option<&mut Fuse> {
        match self.buildings.get_mut(id).map(|b| &mut b.role) {
            Some(BuildingRole::Fuse(fuse)) => Some(fuse),
            _ => None,
        }
    }

    /// Total charge held by every battery on a network.
    pub fn network_charge(&self, id: NetworkId) -> f64 {
        self.networks
            .get(&id)
            .map(|net| {
                net.storage
                    .iter()
                    .filter_map(|b| self.stored_energy(*b))
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Effects applied so far, oldest first.
    pub fn effects(&self) -> &[AppliedEffect] {
        &self.effects
    }

    /// Drain the effect log.
    pub fn take_effects(&mut self) -> Vec<AppliedEffect> {
        std::mem::take(&mut self.effects)
    }

    fn damage(&mut self, target: BuildingId, amount: u32) {
        let Some(b) = self.buildings.get_mut(target) else {
            return;
        };
        b.hit_points = b.hit_points.saturating_sub(amount);
        if b.hit_points == 0 {
            self.destroy(target);
        }
    }

    fn destroy(&mut self, target: BuildingId) {
        let Some(b) = self.buildings.remove(target) else {
            return;
        };
        if let Some(net) = b.network.and_then(|n| self.networks.get_mut(&n)) {
            net.remove_node(target);
        }
        self.effects.push(AppliedEffect::Destroyed {
            building: target,
            position: b.position,
        });
    }
}

impl CapabilityQuery for PowerGrid {
    fn find_all(&self, capability: Capability) -> Vec<BuildingId> {
        self.buildings
            .iter()
            .filter(|(_, b)| b.has(capability))
            .map(|(id, _)| id)
            .collect()
    }

    fn has_capability(&self, building: BuildingId, capability: Capability) -> bool {
        self.buildings
            .get(building)
            .is_some_and(|b| b.has(capability))
    }

    fn network_of(&self, building: BuildingId) -> Option<Network> {
        let id = self.buildings.get(building)?.network?;
        let net = self.networks.get(&id)?;
        Some(Network {
            id,
            transmitters: net.transmitters.clone(),
            storage: net.storage.clone(),
        })
    }

    fn stored_energy(&self, building: BuildingId) -> Option<f64> {
        match self.buildings.get(building)?.role {
            BuildingRole::Battery { charge } => Some(charge),
            _ => None,
        }
    }

    fn position(&self, building: BuildingId) -> Option<Position> {
        self.buildings.get(building).map(|b| b.position)
    }

    fn max_hit_points(&self, building: BuildingId) -> Option<u32> {
        self.buildings.get(building).map(|b| b.max_hit_points)
    }

    fn is_destroyed(&self, building: BuildingId) -> bool {
        !self.buildings.contains_key(building)
    }
}

impl SurgeEffects for PowerGrid {
    fn drain_storage(&mut self, building: BuildingId) -> Option<f64> {
        match &mut self.buildings.get_mut(building)?.role {
            BuildingRole::Battery { charge } => Some(std::mem::replace(charge, 0.0)),
            _ => None,
        }
    }

    fn mitigate_surge(&mut self, fuse: BuildingId, energy: f64) -> f64 {
        self.fuse_mut(fuse)
            .map(|f| f.mitigate_surge(energy))
            .unwrap_or(0.0)
    }

    fn apply_explosion(&mut self, center: Position, radius: f64, kind: DamageKind) {
        self.effects.push(AppliedEffect::Explosion {
            center,
            radius,
            kind,
        });
        let amount = explosion_damage(kind);
        let caught: Vec<BuildingId> = self
            .buildings
            .iter()
            .filter(|(_, b)| b.position.distance(center) <= radius)
            .map(|(id, _)| id)
            .collect();
        for id in caught {
            self.damage(id, amount);
        }
    }

    fn apply_damage(&mut self, target: BuildingId, kind: DamageKind, amount: u32) {
        if self.buildings.contains_key(target) {
            self.effects.push(AppliedEffect::Damage {
                target,
                kind,
                amount,
            });
        }
        self.damage(target, amount);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, z: i32) -> Position {
        Position::new(x, z)
    }

    #[test]
    fn networks_get_sequential_ids() {
        let mut grid = PowerGrid::new();
        assert_eq!(grid.create_network(), NetworkId(0));
        assert_eq!(grid.create_network(), NetworkId(1));
    }

    #[test]
    fn buildings_join_their_network() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let battery = grid.add_battery(net, at(0, 0), 120.0);
        let conduit = grid.add_conduit(net, at(1, 0));
        let fuse = grid.add_fuse(net, at(2, 0), 300.0);

        let network = grid.network_of(conduit).unwrap();
        assert_eq!(network.id, net);
        assert_eq!(network.storage, vec![battery]);
        assert_eq!(network.transmitters, vec![conduit, fuse]);
        assert_eq!(grid.network_of(battery), grid.network_of(fuse));
    }

    #[test]
    fn structures_have_no_network() {
        let mut grid = PowerGrid::new();
        let wall = grid.add_structure(at(5, 5), 300);
        assert!(grid.network_of(wall).is_none());
        assert!(grid.stored_energy(wall).is_none());
    }

    #[test]
    fn disconnect_leaves_building_in_place() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let battery = grid.add_battery(net, at(0, 0), 120.0);

        grid.disconnect(battery);

        assert!(grid.network_of(battery).is_none());
        assert!(grid.power_network(net).unwrap().storage.is_empty());
        assert_eq!(grid.stored_energy(battery), Some(120.0));
    }

    #[test]
    fn find_all_filters_by_capability() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let battery = grid.add_battery(net, at(0, 0), 10.0);
        let conduit = grid.add_conduit(net, at(1, 0));
        let fuse = grid.add_fuse(net, at(2, 0), 300.0);

        assert_eq!(grid.find_all(Capability::Storage), vec![battery]);
        assert_eq!(grid.find_all(Capability::Conduit), vec![conduit]);
        assert_eq!(grid.find_all(Capability::Fuse), vec![fuse]);
        assert!(grid.has_capability(fuse, Capability::Fuse));
        assert!(!grid.has_capability(fuse, Capability::Conduit));
    }

    #[test]
    fn drain_empties_battery() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let battery = grid.add_battery(net, at(0, 0), 75.5);

        assert_eq!(grid.drain_storage(battery), Some(75.5));
        assert_eq!(grid.stored_energy(battery), Some(0.0));
        assert_eq!(grid.drain_storage(battery), Some(0.0));
    }

    #[test]
    fn drain_of_non_battery_is_none() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let conduit = grid.add_conduit(net, at(0, 0));
        assert_eq!(grid.drain_storage(conduit), None);
    }

    #[test]
    fn network_charge_sums_batteries() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let other = grid.create_network();
        grid.add_battery(net, at(0, 0), 100.0);
        grid.add_battery(net, at(1, 0), 25.0);
        grid.add_battery(other, at(9, 9), 1000.0);

        assert_eq!(grid.network_charge(net), 125.0);
        assert_eq!(grid.network_charge(other), 1000.0);
    }

    #[test]
    fn mitigate_routes_to_fuse() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let fuse = grid.add_fuse(net, at(0, 0), 100.0);
        let conduit = grid.add_conduit(net, at(1, 0));

        assert_eq!(grid.mitigate_surge(fuse, 400.0), 100.0);
        assert!(grid.fuse(fuse).unwrap().blown);
        assert_eq!(grid.mitigate_surge(conduit, 400.0), 0.0);
    }

    #[test]
    fn explosion_damages_buildings_in_radius() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let near = grid.add_conduit(net, at(0, 0));
        let edge = grid.add_conduit(net, at(2, 0));
        let far = grid.add_conduit(net, at(5, 0));

        grid.apply_explosion(at(0, 0), 2.0, DamageKind::Flame);

        assert_eq!(grid.hit_points(near), Some(CONDUIT_MAX_HIT_POINTS - 10));
        assert_eq!(grid.hit_points(edge), Some(CONDUIT_MAX_HIT_POINTS - 10));
        assert_eq!(grid.hit_points(far), Some(CONDUIT_MAX_HIT_POINTS));
        assert_eq!(
            grid.effects()[0],
            AppliedEffect::Explosion {
                center: at(0, 0),
                radius: 2.0,
                kind: DamageKind::Flame
            }
        );
    }

    #[test]
    fn lethal_damage_destroys_and_unlinks() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let conduit = grid.add_conduit(net, at(3, 3));

        grid.apply_damage(conduit, DamageKind::Bomb, 200);

        assert!(grid.is_destroyed(conduit));
        assert!(grid.power_network(net).unwrap().transmitters.is_empty());
        assert_eq!(
            grid.effects(),
            &[
                AppliedEffect::Damage {
                    target: conduit,
                    kind: DamageKind::Bomb,
                    amount: 200
                },
                AppliedEffect::Destroyed {
                    building: conduit,
                    position: at(3, 3)
                },
            ]
        );
    }

    #[test]
    fn damage_to_destroyed_building_is_ignored() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let conduit = grid.add_conduit(net, at(0, 0));
        grid.apply_damage(conduit, DamageKind::Bomb, 500);
        let logged = grid.effects().len();

        grid.apply_damage(conduit, DamageKind::Bomb, 5);
        assert_eq!(grid.effects().len(), logged);
    }

    #[test]
    fn zero_damage_is_logged_but_harmless() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let conduit = grid.add_conduit(net, at(0, 0));

        grid.apply_damage(conduit, DamageKind::Bomb, 0);
        assert_eq!(grid.hit_points(conduit), Some(CONDUIT_MAX_HIT_POINTS));
        assert_eq!(grid.take_effects().len(), 1);
        assert!(grid.effects().is_empty());
    }

    #[test]
    fn set_max_hit_points_heals() {
        let mut grid = PowerGrid::new();
        let net = grid.create_network();
        let conduit = grid.add_conduit(net, at(0, 0));
        grid.apply_damage(conduit, DamageKind::Flame, 30);

        grid.set_max_hit_points(conduit, 400);
        assert_eq!(grid.hit_points(conduit), Some(400));
        assert_eq!(grid.max_hit_points(conduit), Some(400));
    }
}
