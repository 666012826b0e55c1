//! Outcome resolution: turn residual surge energy into damage.
//!
//! A surge that got past the fuses explodes at the victim conduit:
//!
//! - an incendiary explosion of radius `min(sqrt(residual * 0.05), 14.9)`,
//! - a high-explosive blast of 30% of that radius when it exceeds 3.5,
//! - a 200-point direct hit if the victim survived both.
//!
//! A fully absorbed surge only roughs up the victim: a direct hit of up to
//! 10% of its maximum hit points.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SurgeConfig;
use crate::error::ContractViolation;
use crate::id::{BuildingId, Position};
use crate::rng::RandomSource;
use crate::surge::SurgeResult;
use crate::world::{DamageKind, HostWorld};

/// How much of the surge the fuses absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Nothing got through.
    FullMitigation,
    /// Some energy was absorbed, the rest exploded.
    PartialMitigation,
    /// No energy was absorbed.
    FullSurge,
}

/// Size tags for the explosion. Both can be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityTags {
    pub large: bool,
    pub huge: bool,
}

/// One damage effect applied to the world, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DamageAction {
    Explosion {
        center: Position,
        radius: f64,
        kind: DamageKind,
    },
    DirectHit {
        target: BuildingId,
        kind: DamageKind,
        amount: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeOutcome {
    pub classification: Classification,
    /// Primary explosion radius; 0 when the surge was fully absorbed.
    pub explosion_radius: f64,
    pub severity: SeverityTags,
    pub damage: Vec<DamageAction>,
}

/// Primary explosion radius for a residual energy. Zero once the residual is
/// within `config.epsilon` of nothing.
pub fn explosion_radius(residual_energy: f64, config: &SurgeConfig) -> f64 {
    if residual_energy <= config.epsilon {
        return 0.0;
    }
    (residual_energy * config.radius_per_energy)
        .sqrt()
        .min(config.max_explosion_radius)
}

/// A residual within `config.epsilon` of zero is rounding left by fuses that
/// together matched the surge, and counts as fully mitigated.
pub fn classify(result: &SurgeResult, config: &SurgeConfig) -> Classification {
    if result.residual_energy <= config.epsilon {
        Classification::FullMitigation
    } else if (result.residual_energy - result.total_energy_drained).abs() < config.epsilon {
        Classification::FullSurge
    } else {
        Classification::PartialMitigation
    }
}

pub fn severity(radius: f64, config: &SurgeConfig) -> SeverityTags {
    SeverityTags {
        large: radius > config.large_radius,
        huge: radius > config.huge_radius,
    }
}

/// Apply the surge's damage to the world and classify the incident.
///
/// Storage and fuse state are not touched here; the surge engine already did.
pub fn resolve_outcome<W, R>(
    world: &mut W,
    result: &SurgeResult,
    rng: &mut R,
    config: &SurgeConfig,
) -> Result<SurgeOutcome, ContractViolation>
where
    W: HostWorld + ?Sized,
    R: RandomSource + ?Sized,
{
    let victim = result.victim;
    let classification = classify(result, config);
    let mut damage = Vec::new();

    if classification == Classification::FullMitigation {
        let max_hit_points = world
            .max_hit_points(victim)
            .ok_or(ContractViolation::UnknownBuilding(victim))?;
        let ceiling = (config.mitigated_damage_fraction * f64::from(max_hit_points)).floor() as i32;
        let amount = rng.range(0, ceiling).max(0) as u32;
        hit(world, &mut damage, victim, DamageKind::Bomb, amount);
        return Ok(SurgeOutcome {
            classification,
            explosion_radius: 0.0,
            severity: SeverityTags::default(),
            damage,
        });
    }

    let center = world
        .position(victim)
        .ok_or(ContractViolation::UnknownBuilding(victim))?;
    let radius = explosion_radius(result.residual_energy, config);

    explode(world, &mut damage, center, radius, DamageKind::Flame);
    if radius > config.secondary_blast_threshold {
        explode(
            world,
            &mut damage,
            center,
            radius * config.secondary_blast_scale,
            DamageKind::Bomb,
        );
    }
    if !world.is_destroyed(victim) {
        hit(world, &mut damage, victim, DamageKind::Bomb, config.direct_hit_damage);
    }

    Ok(SurgeOutcome {
        classification,
        explosion_radius: radius,
        severity: severity(radius, config),
        damage,
    })
}

fn explode<W>(
    world: &mut W,
    log: &mut Vec<DamageAction>,
    center: Position,
    radius: f64,
    kind: DamageKind,
) where
    W: HostWorld + ?Sized,
{
    debug!(target: "gridsurge::outcome", ?center, radius, ?kind, "explosion");
    world.apply_explosion(center, radius, kind);
    log.push(DamageAction::Explosion {
        center,
        radius,
        kind,
    });
}

fn hit<W>(world: &mut W, log: &mut Vec<DamageAction>, target: BuildingId, kind: DamageKind, amount: u32)
where
    W: HostWorld + ?Sized,
{
    debug!(target: "gridsurge::outcome", ?target, ?kind, amount, "direct hit");
    world.apply_damage(target, kind, amount);
    log.push(DamageAction::DirectHit {
        target,
        kind,
        amount,
    });
}
