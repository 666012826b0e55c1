//! Network resolution: from a battery to the segments a surge can hit.

use crate::id::BuildingId;
use crate::world::{Capability, CapabilityQuery, Network};

/// The network the storage device is connected to.
pub fn resolve_network<W>(world: &W, device: BuildingId) -> Option<Network>
where
    W: CapabilityQuery + ?Sized,
{
    world.network_of(device)
}

/// Plain conduits on the network. Only these can be surge victims.
pub fn victims<'a, W>(world: &'a W, network: &'a Network) -> impl Iterator<Item = BuildingId> + 'a
where
    W: CapabilityQuery + ?Sized,
{
    network
        .transmitters
        .iter()
        .copied()
        .filter(move |id| world.has_capability(*id, Capability::Conduit))
}

/// Fuse-bearing segments on the network, in enumeration order.
pub fn fuses<'a, W>(world: &'a W, network: &'a Network) -> impl Iterator<Item = BuildingId> + 'a
where
    W: CapabilityQuery + ?Sized,
{
    network
        .transmitters
        .iter()
        .copied()
        .filter(move |id| world.has_capability(*id, Capability::Fuse))
}
