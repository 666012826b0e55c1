//! Gridsurge Core -- short-circuit surge resolution for colony power grids.
//!
//! A charged battery shorts out. Its whole network is drained into a single
//! surge, fuses on the network absorb what they can, and whatever is left
//! explodes at a random conduit.
//!
//! # Pipeline
//!
//! Each call to [`incident::ShortCircuitIncident::try_execute`] runs:
//!
//! 1. **Select** -- [`selector`] finds batteries above the charge threshold.
//! 2. **Resolve** -- [`network`] finds the battery's network, its conduits
//!    (possible victims) and its fuses.
//! 3. **Surge** -- [`surge`] drains every battery on the network and
//!    cascades the energy through the fuses in order.
//! 4. **Outcome** -- [`outcome`] turns residual energy into explosions and
//!    direct damage and classifies the incident.
//! 5. **Report** -- [`report`] renders a player-facing letter.
//!
//! # Host boundary
//!
//! The host world is reached only through [`world::CapabilityQuery`] and
//! [`world::SurgeEffects`]; randomness only through [`rng::RandomSource`].
//! [`grid::PowerGrid`] is an in-memory host used by tests and demos.
//!
//! ```rust,ignore
//! let mut grid = PowerGrid::new();
//! let net = grid.create_network();
//! grid.add_battery(net, Position::new(0, 0), 400.0);
//! grid.add_conduit(net, Position::new(1, 0));
//! grid.add_fuse(net, Position::new(2, 0), 100.0);
//!
//! let incident = ShortCircuitIncident::default();
//! let report = incident.try_execute(&mut grid, &mut SimRng::new(7))?;
//! ```

pub mod config;
pub mod error;
pub mod fuse;
pub mod grid;
pub mod id;
pub mod incident;
pub mod network;
pub mod outcome;
pub mod report;
pub mod rng;
pub mod selector;
pub mod surge;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
