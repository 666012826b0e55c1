//! The surge engine: drain a network and cascade the energy through fuses.
//!
//! 1. Every storage device's charge is checked, then every device is
//!    drained into one pool. A bad reading fails the surge before anything
//!    is drained.
//! 2. The pool is offered to each fuse in enumeration order. Each fuse
//!    returns what it absorbed and the pool shrinks by that amount.
//! 3. The cascade stops the first time the pool reaches zero or below.
//!    Remaining fuses are never offered anything.
//!
//! Fuse results are checked, never clamped. A fuse that reports more than
//! it was offered breaks energy conservation and fails the surge.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::SurgeConfig;
use crate::error::ContractViolation;
use crate::id::BuildingId;
use crate::network::fuses;
use crate::world::{HostWorld, Network};

/// The energy ledger of one surge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeResult {
    /// Everything drained from the network's storage.
    pub total_energy_drained: f64,
    /// What got past the fuses.
    pub residual_energy: f64,
    /// The conduit that takes the hit.
    pub victim: BuildingId,
    /// Fuses that were offered energy, in order.
    pub fuses_invoked: Vec<BuildingId>,
}

impl SurgeResult {
    pub fn mitigated_amount(&self) -> f64 {
        self.total_energy_drained - self.residual_energy
    }
}

/// Drain the network and run the fuse cascade.
pub fn run_surge<W>(
    world: &mut W,
    network: &Network,
    victim: BuildingId,
    config: &SurgeConfig,
) -> Result<SurgeResult, ContractViolation>
where
    W: HostWorld + ?Sized,
{
    for &device in &network.storage {
        check_charge(device, world.stored_energy(device))?;
    }
    let mut total = 0.0;
    for &device in &network.storage {
        total += check_charge(device, world.drain_storage(device))?;
    }
    let total_historic = total;

    let cascade: Vec<BuildingId> = fuses(&*world, network).collect();
    let mut fuses_invoked = Vec::with_capacity(cascade.len());
    for fuse in cascade {
        let absorbed = world.mitigate_surge(fuse, total);
        fuses_invoked.push(fuse);
        check_absorption(fuse, total, absorbed, config).inspect_err(|violation| {
            error!(target: "gridsurge::surge", %violation, "fuse contract violated");
        })?;
        total -= absorbed;
        debug!(
            target: "gridsurge::surge",
            fuse = ?fuse,
            absorbed,
            remaining = total,
            "fuse absorbed surge"
        );
        if total <= 0.0 {
            break;
        }
    }

    Ok(SurgeResult {
        total_energy_drained: total_historic,
        residual_energy: total,
        victim,
        fuses_invoked,
    })
}

fn check_charge(device: BuildingId, energy: Option<f64>) -> Result<f64, ContractViolation> {
    let checked = match energy {
        None => Err(ContractViolation::UnknownBuilding(device)),
        Some(energy) if !energy.is_finite() => Err(ContractViolation::NonFiniteStoredEnergy {
            building: device,
            energy,
        }),
        Some(energy) if energy < 0.0 => Err(ContractViolation::NegativeStoredEnergy {
            building: device,
            energy,
        }),
        Some(energy) => Ok(energy),
    };
    checked.inspect_err(|violation| {
        error!(target: "gridsurge::surge", %violation, "storage contract violated");
    })
}

fn check_absorption(
    fuse: BuildingId,
    offered: f64,
    absorbed: f64,
    config: &SurgeConfig,
) -> Result<(), ContractViolation> {
    if !absorbed.is_finite() {
        return Err(ContractViolation::NonFiniteAbsorption { fuse, absorbed });
    }
    if absorbed < 0.0 {
        return Err(ContractViolation::NegativeAbsorption { fuse, absorbed });
    }
    if absorbed > offered + config.epsilon {
        return Err(ContractViolation::FuseOverdraw {
            fuse,
            offered,
            absorbed,
        });
    }
    Ok(())
}
