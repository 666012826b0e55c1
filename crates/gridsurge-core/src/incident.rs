//! The short-circuit incident: the scheduler-facing entry point.
//!
//! Sequences the pipeline in dependency order:
//!
//! 1. pick a usable battery at random,
//! 2. resolve its network and pick a victim conduit at random,
//! 3. run the surge,
//! 4. resolve the outcome.
//!
//! "Not applicable" (no usable battery, no network, no conduit) is an
//! ordinary `Ok(None)` / `Ok(false)`. Only collaborator contract violations
//! surface as errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SurgeConfig;
use crate::error::ContractViolation;
use crate::id::{BuildingId, NetworkId, Position};
use crate::network::{resolve_network, victims};
use crate::outcome::{Classification, DamageAction, SeverityTags, resolve_outcome};
use crate::report::{LetterSink, Translator, compose_letter};
use crate::rng::{RandomSource, choose};
use crate::selector::{has_usable_storage, usable_storage_devices};
use crate::surge::run_surge;
use crate::world::HostWorld;

/// Everything a reporter needs about one resolved incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortCircuitReport {
    pub network: NetworkId,
    pub classification: Classification,
    pub total_energy_drained: f64,
    pub residual_energy: f64,
    pub mitigated_amount: f64,
    pub explosion_radius: f64,
    pub severity: SeverityTags,
    pub victim: BuildingId,
    /// Where the victim stood when the surge hit.
    pub location: Position,
    pub fuses_invoked: Vec<BuildingId>,
    pub damage: Vec<DamageAction>,
}

/// The short-circuit incident worker.
#[derive(Debug, Clone, Default)]
pub struct ShortCircuitIncident {
    pub config: SurgeConfig,
}

impl ShortCircuitIncident {
    pub fn new(config: SurgeConfig) -> Self {
        Self { config }
    }

    /// True iff some battery holds enough charge to short out.
    pub fn can_fire_now<W>(&self, world: &W) -> bool
    where
        W: HostWorld + ?Sized,
    {
        has_usable_storage(world, &self.config)
    }

    /// Run the incident. Returns whether it happened.
    pub fn execute<W, R>(&self, world: &mut W, rng: &mut R) -> Result<bool, ContractViolation>
    where
        W: HostWorld + ?Sized,
        R: RandomSource + ?Sized,
    {
        Ok(self.try_execute(world, rng)?.is_some())
    }

    /// Run the incident and return its report, or `None` if not applicable.
    pub fn try_execute<W, R>(
        &self,
        world: &mut W,
        rng: &mut R,
    ) -> Result<Option<ShortCircuitReport>, ContractViolation>
    where
        W: HostWorld + ?Sized,
        R: RandomSource + ?Sized,
    {
        let candidates: Vec<BuildingId> = usable_storage_devices(&*world, &self.config).collect();
        let Some(&battery) = choose(rng, &candidates) else {
            debug!(target: "gridsurge::incident", "no usable storage; not applicable");
            return Ok(None);
        };

        let Some(network) = resolve_network(&*world, battery) else {
            debug!(target: "gridsurge::incident", ?battery, "storage has no network; not applicable");
            return Ok(None);
        };

        let conduits: Vec<BuildingId> = victims(&*world, &network).collect();
        let Some(&victim) = choose(rng, &conduits) else {
            debug!(
                target: "gridsurge::incident",
                network = ?network.id,
                "network has no conduit; not applicable"
            );
            return Ok(None);
        };
        let location = world
            .position(victim)
            .ok_or(ContractViolation::UnknownBuilding(victim))?;

        let surge = run_surge(world, &network, victim, &self.config)?;
        let outcome = resolve_outcome(world, &surge, rng, &self.config)?;

        info!(
            target: "gridsurge::incident",
            network = ?network.id,
            victim = ?victim,
            classification = ?outcome.classification,
            total = surge.total_energy_drained,
            residual = surge.residual_energy,
            radius = outcome.explosion_radius,
            large = outcome.severity.large,
            huge = outcome.severity.huge,
            "short circuit resolved"
        );

        Ok(Some(ShortCircuitReport {
            network: network.id,
            classification: outcome.classification,
            total_energy_drained: surge.total_energy_drained,
            residual_energy: surge.residual_energy,
            mitigated_amount: surge.mitigated_amount(),
            explosion_radius: outcome.explosion_radius,
            severity: outcome.severity,
            victim,
            location,
            fuses_invoked: surge.fuses_invoked,
            damage: outcome.damage,
        }))
    }

    /// Run the incident and, if it happened, deliver a letter about it.
    pub fn fire<W, R, T, S>(
        &self,
        world: &mut W,
        rng: &mut R,
        translator: &T,
        sink: &mut S,
    ) -> Result<bool, ContractViolation>
    where
        W: HostWorld + ?Sized,
        R: RandomSource + ?Sized,
        T: Translator + ?Sized,
        S: LetterSink + ?Sized,
    {
        let Some(report) = self.try_execute(world, rng)? else {
            return Ok(false);
        };
        sink.receive_letter(compose_letter(&report, translator));
        Ok(true)
    }
}
