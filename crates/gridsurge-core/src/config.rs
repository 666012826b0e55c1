//! Tunable constants for surge resolution.
//!
//! [`SurgeConfig::default`] reproduces the stock incident. Every field is
//! `#[serde(default)]` so data files only need to list what they override.

use serde::{Deserialize, Serialize};

/// Numeric parameters of the short-circuit incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeConfig {
    /// A battery is a candidate only when it stores strictly more than this.
    pub min_stored_energy: f64,
    /// Residual energy is scaled by this before taking the square root.
    pub radius_per_energy: f64,
    /// Upper bound on the primary explosion radius.
    pub max_explosion_radius: f64,
    /// Primary radius above which a secondary blast is added.
    pub secondary_blast_threshold: f64,
    /// Secondary blast radius as a fraction of the primary radius.
    pub secondary_blast_scale: f64,
    /// Direct hit applied to a victim that survives both explosions.
    pub direct_hit_damage: u32,
    /// Radius above which the incident is tagged large.
    pub large_radius: f64,
    /// Radius above which the incident is tagged huge.
    pub huge_radius: f64,
    /// Fully mitigated surges roll damage in `0..floor(fraction * max_hp)`.
    pub mitigated_damage_fraction: f64,
    /// Tolerance for energy comparisons (classification, fuse contracts).
    pub epsilon: f64,
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            min_stored_energy: 50.0,
            radius_per_energy: 0.05,
            max_explosion_radius: 14.9,
            secondary_blast_threshold: 3.5,
            secondary_blast_scale: 0.3,
            direct_hit_damage: 200,
            large_radius: 5.0,
            huge_radius: 8.0,
            mitigated_damage_fraction: 0.1,
            epsilon: 1e-6,
        }
    }
}

/// A config field that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid surge config field '{field}': {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl SurgeConfig {
    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("min_stored_energy", self.min_stored_energy),
            ("radius_per_energy", self.radius_per_energy),
            ("max_explosion_radius", self.max_explosion_radius),
            ("secondary_blast_threshold", self.secondary_blast_threshold),
            ("secondary_blast_scale", self.secondary_blast_scale),
            ("large_radius", self.large_radius),
            ("huge_radius", self.huge_radius),
            ("mitigated_damage_fraction", self.mitigated_damage_fraction),
            ("epsilon", self.epsilon),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError {
                    field,
                    reason: "must be finite",
                });
            }
            if value < 0.0 {
                return Err(ConfigError {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        Ok(())
    }
}
