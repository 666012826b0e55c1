//! Candidate selection: batteries charged enough to short out.

use crate::config::SurgeConfig;
use crate::id::BuildingId;
use crate::world::{Capability, CapabilityQuery};

/// Storage devices holding strictly more than `config.min_stored_energy`.
///
/// Lazy: charge is read as the iterator advances. Call again to restart.
pub fn usable_storage_devices<'a, W>(
    world: &'a W,
    config: &'a SurgeConfig,
) -> impl Iterator<Item = BuildingId> + 'a
where
    W: CapabilityQuery + ?Sized,
{
    world
        .find_all(Capability::Storage)
        .into_iter()
        .filter(move |id| {
            world
                .stored_energy(*id)
                .is_some_and(|e| e > config.min_stored_energy)
        })
}

/// Whether any storage device qualifies. If not, the incident cannot fire.
pub fn has_usable_storage<W>(world: &W, config: &SurgeConfig) -> bool
where
    W: CapabilityQuery + ?Sized,
{
    usable_storage_devices(world, config).next().is_some()
}
