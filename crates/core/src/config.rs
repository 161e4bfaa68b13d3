//! Simulation configuration
//!
//! Constants fixed at startup: grid cell size, random ignition limits and the
//! timing of the combustion state machine. Every field has a default, so a
//! partial JSON file only needs to name what it overrides.

use crate::core_types::Seconds;
use crate::error::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};

/// Default grid cell edge length in world units
pub const DEFAULT_CELL_SIZE: i32 = 20;
/// Default exclusive upper bound for `start_random_fire` ignition count
pub const DEFAULT_MAX_RANDOM_FIRE_HITS: u32 = 5;
/// Default time an object stays on fire after its propagation attempt
pub const DEFAULT_ON_FIRE_DURATION: Seconds = Seconds::new(0.1);
/// Default propagation delay at zero wind
pub const DEFAULT_BASE_IGNITION_DELAY: Seconds = Seconds::new(1.3);
/// Default floor for the propagation delay
pub const DEFAULT_MIN_IGNITION_DELAY: Seconds = Seconds::new(0.05);
/// Default width of the random delay jitter window
pub const DEFAULT_IGNITION_JITTER: Seconds = Seconds::new(0.3);

/// Startup configuration for a `FireSimulation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Edge length of a grid cell in world units
    pub cell_size: i32,
    /// Exclusive upper bound of the ignition count drawn by `start_random_fire`
    pub max_random_fire_hits: u32,
    /// How long an object stays on fire after attempting to spread
    pub on_fire_duration: Seconds,
    /// Propagation delay before wind speed is subtracted
    pub base_ignition_delay: Seconds,
    /// Lower clamp for the propagation delay
    pub min_ignition_delay: Seconds,
    /// Width of the uniform jitter added to the propagation delay
    pub ignition_jitter: Seconds,
    /// Records to preallocate in the object pool
    pub pool_preload: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            max_random_fire_hits: DEFAULT_MAX_RANDOM_FIRE_HITS,
            on_fire_duration: DEFAULT_ON_FIRE_DURATION,
            base_ignition_delay: DEFAULT_BASE_IGNITION_DELAY,
            min_ignition_delay: DEFAULT_MIN_IGNITION_DELAY,
            ignition_jitter: DEFAULT_IGNITION_JITTER,
            pool_preload: 0,
        }
    }
}

impl SimulationConfig {
    pub fn with_cell_size(mut self, cell_size: i32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_max_random_fire_hits(mut self, hits: u32) -> Self {
        self.max_random_fire_hits = hits;
        self
    }

    pub fn with_on_fire_duration(mut self, duration: Seconds) -> Self {
        self.on_fire_duration = duration;
        self
    }

    pub fn with_base_ignition_delay(mut self, delay: Seconds) -> Self {
        self.base_ignition_delay = delay;
        self
    }

    pub fn with_ignition_jitter(mut self, jitter: Seconds) -> Self {
        self.ignition_jitter = jitter;
        self
    }

    /// Preallocate pool records, typically one per terrain unit
    pub fn with_pool_preload(mut self, records: usize) -> Self {
        self.pool_preload = records;
        self
    }

    /// Check every field is inside its valid range
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidConfig` naming the first bad field
    pub fn validate(&self) -> SimResult<()> {
        if self.cell_size <= 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.max_random_fire_hits < 2 {
            return Err(SimulationError::InvalidConfig(format!(
                "max_random_fire_hits is an exclusive bound and must be at least 2, got {}",
                self.max_random_fire_hits
            )));
        }
        let durations = [
            ("on_fire_duration", self.on_fire_duration),
            ("base_ignition_delay", self.base_ignition_delay),
            ("min_ignition_delay", self.min_ignition_delay),
            ("ignition_jitter", self.ignition_jitter),
        ];
        for (name, value) in durations {
            if !value.is_finite() || *value < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {}",
                    *value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.max_random_fire_hits, 5);
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        let config = SimulationConfig::default().with_cell_size(0);
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_random_fire_range() {
        let config = SimulationConfig::default().with_max_random_fire_hits(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_duration() {
        let config = SimulationConfig::default().with_on_fire_duration(Seconds::from(f32::NAN));
        assert!(config.validate().is_err());
    }
}
