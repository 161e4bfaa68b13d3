//! Wind and humidity model that biases fire propagation
//!
//! The environment is plain configuration mutated from the UI layer. The
//! engine reads it on every propagation decision through three derived
//! predicates:
//!
//! - [`EnvironmentModel::wind_allows`]: which cardinal neighbours may be reached
//! - [`EnvironmentModel::ignition_delay`]: how long a burning object waits
//!   before trying to spread (stronger wind spreads faster)
//! - [`EnvironmentModel::spread_chance`]: probability that a spread attempt
//!   happens at all (drier air spreads more)

use crate::core_types::{CardinalDirection, Degrees, Percent, Seconds};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Wind and humidity state read by the fire spread engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentModel {
    /// Normalised wind speed (0-1)
    wind_speed: f32,
    /// Compass direction the wind carries fire towards (0-360)
    wind_direction: Degrees,
    /// Relative humidity (0-100%)
    humidity: Percent,
    /// Wind blows fire in every direction regardless of `wind_direction`
    all_directions_wind: bool,
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self {
            wind_speed: 0.0,
            wind_direction: Degrees::new(0.0),
            humidity: Percent::new(0.0),
            all_directions_wind: true,
        }
    }
}

impl EnvironmentModel {
    /// Create an environment with explicit values, clamped into range
    #[must_use]
    pub fn new(
        wind_speed: f32,
        wind_direction: Degrees,
        humidity: Percent,
        all_directions_wind: bool,
    ) -> Self {
        let mut env = Self::default();
        env.set_wind_speed(wind_speed);
        env.set_wind_direction(wind_direction);
        env.set_humidity(humidity);
        env.set_all_directions_wind(all_directions_wind);
        env
    }

    #[must_use]
    pub fn wind_speed(&self) -> f32 {
        self.wind_speed
    }

    #[must_use]
    pub fn wind_direction(&self) -> Degrees {
        self.wind_direction
    }

    #[must_use]
    pub fn humidity(&self) -> Percent {
        self.humidity
    }

    #[must_use]
    pub fn all_directions_wind(&self) -> bool {
        self.all_directions_wind
    }

    /// Set wind speed, clamped to 0-1. Non-finite input is treated as calm.
    pub fn set_wind_speed(&mut self, wind_speed: f32) {
        self.wind_speed = if wind_speed.is_finite() {
            wind_speed.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Set wind direction, clamped to 0-360. Non-finite input is treated as 0°.
    pub fn set_wind_direction(&mut self, direction: Degrees) {
        self.wind_direction = if direction.is_finite() {
            direction.clamped_compass()
        } else {
            Degrees::new(0.0)
        };
    }

    /// Set humidity, clamped to 0-100%. Non-finite input is treated as dry air.
    pub fn set_humidity(&mut self, humidity: Percent) {
        self.humidity = if humidity.is_finite() {
            humidity.clamped()
        } else {
            Percent::new(0.0)
        };
    }

    pub fn set_all_directions_wind(&mut self, enabled: bool) {
        self.all_directions_wind = enabled;
    }

    /// Whether fire may propagate towards `direction` under the current wind.
    ///
    /// Each direction owns a 180° arc with inclusive boundaries:
    ///
    /// | direction | enabled when                  |
    /// |-----------|-------------------------------|
    /// | North     | `dir <= 90 \|\| dir >= 270`   |
    /// | South     | `90 <= dir <= 270`            |
    /// | West      | `dir >= 180 \|\| dir == 0`    |
    /// | East      | `dir <= 180 \|\| dir == 360`  |
    ///
    /// The arcs overlap, so a wind on a boundary angle enables two adjacent
    /// directions at once. That overlap may be an accident of the inclusive
    /// comparisons rather than an intended blend; it is kept as is.
    #[must_use]
    pub fn wind_allows(&self, direction: CardinalDirection) -> bool {
        if self.all_directions_wind {
            return true;
        }
        let dir = *self.wind_direction;
        match direction {
            CardinalDirection::North => dir <= 90.0 || dir >= 270.0,
            CardinalDirection::South => (90.0..=270.0).contains(&dir),
            CardinalDirection::West => dir >= 180.0 || dir == 0.0,
            CardinalDirection::East => dir <= 180.0 || dir == 360.0,
        }
    }

    /// Delay before a freshly ignited object attempts to spread.
    ///
    /// `base - wind_speed + U[0, jitter)`, never below `min`.
    pub fn ignition_delay<R: Rng>(
        &self,
        base: Seconds,
        min: Seconds,
        jitter: Seconds,
        rng: &mut R,
    ) -> Seconds {
        let jitter = if *jitter > 0.0 {
            rng.random_range(0.0..*jitter)
        } else {
            0.0
        };
        Seconds::from(*base - self.wind_speed + jitter).at_least(min)
    }

    /// Chance that a spread attempt happens: `100 - humidity`
    #[must_use]
    pub fn spread_chance(&self) -> Percent {
        Percent::FULL - self.humidity
    }
}
