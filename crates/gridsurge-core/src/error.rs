use crate::id::BuildingId;

/// A collaborator broke its numeric contract during surge resolution.
///
/// These are not "incident not applicable" outcomes: the energy ledger can no
/// longer be trusted, so the incident stops at the first one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    /// A battery reported a charge below zero.
    #[error("storage {building:?} reported negative charge {energy}")]
    NegativeStoredEnergy { building: BuildingId, energy: f64 },

    /// A battery reported NaN or infinite charge.
    #[error("storage {building:?} reported non-finite charge {energy}")]
    NonFiniteStoredEnergy { building: BuildingId, energy: f64 },

    /// The world listed a building it cannot resolve.
    #[error("building {0:?} is not known to the host world")]
    UnknownBuilding(BuildingId),

    /// A fuse absorbed more energy than it was offered.
    #[error("fuse {fuse:?} absorbed {absorbed} of {offered} offered")]
    FuseOverdraw {
        fuse: BuildingId,
        offered: f64,
        absorbed: f64,
    },

    /// A fuse reported absorbing a negative amount.
    #[error("fuse {fuse:?} reported negative absorption {absorbed}")]
    NegativeAbsorption { fuse: BuildingId, absorbed: f64 },

    /// A fuse reported NaN or infinite absorption.
    #[error("fuse {fuse:?} reported non-finite absorption {absorbed}")]
    NonFiniteAbsorption { fuse: BuildingId, absorbed: f64 },
}
