//! Data-driven game balance
//!
//! Everything here can be overridden from a JSON file; missing fields keep
//! their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StoreError;

/// Relative draw weights for interior cells of a new slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceWeights {
    pub empty: f32,
    pub obstacle: f32,
    pub coin: f32,
    pub score_gem: f32,
    pub speed_gem: f32,
    pub bonus_gem: f32,
    pub reversed_gem: f32,
}

impl Default for SliceWeights {
    fn default() -> Self {
        Self {
            empty: 62.0,
            obstacle: 16.0,
            coin: 16.0,
            score_gem: 1.5,
            speed_gem: 1.5,
            bonus_gem: 1.5,
            reversed_gem: 1.5,
        }
    }
}

impl SliceWeights {
    /// Weights in `Item::INTERIOR` order
    pub fn as_array(&self) -> [f32; 7] {
        [
            self.empty,
            self.obstacle,
            self.coin,
            self.score_gem,
            self.speed_gem,
            self.bonus_gem,
            self.reversed_gem,
        ]
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Camera ===
    pub camera_speed_init: f32,
    /// Speed gained per 10 seconds of game time
    pub camera_acceleration: f32,
    pub camera_speed_max: f32,
    /// Character lateral/vertical lane switch speed (units/sec)
    pub lane_switch_speed: f32,

    // === Scoring ===
    pub coin_value: u64,
    pub bonus_score_value: u64,

    // === Effects ===
    pub score_multiplier_duration: f64,
    pub score_multiplier_factor: f64,
    pub speed_multiplier_duration: f64,
    pub speed_multiplier_factor: f64,
    pub reversed_controls_duration: f64,
    pub bonus_display_duration: f64,

    // === Generation ===
    pub weights: SliceWeights,
    /// Slices with an empty interior generated right after a reset
    pub opening_empty_slices: usize,
    /// Chance per slice that the guaranteed safe lane drifts to a neighbour
    pub safe_lane_drift_chance: f64,
    /// Redraws of a blocked safe cell before the fallback kicks in
    pub generation_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            camera_speed_init: CAMERA_SPEED_INIT,
            camera_acceleration: CAMERA_ACCELERATION,
            camera_speed_max: CAMERA_SPEED_MAX,
            lane_switch_speed: 12.0,

            coin_value: COIN_VALUE,
            bonus_score_value: BONUS_SCORE_VALUE,

            score_multiplier_duration: SCORE_MULTIPLIER_DURATION,
            score_multiplier_factor: SCORE_MULTIPLIER_FACTOR,
            speed_multiplier_duration: SPEED_MULTIPLIER_DURATION,
            speed_multiplier_factor: SPEED_MULTIPLIER_FACTOR,
            reversed_controls_duration: REVERSED_CONTROLS_DURATION,
            bonus_display_duration: BONUS_SCORE_DISPLAY_DURATION,

            weights: SliceWeights::default(),
            opening_empty_slices: 6,
            safe_lane_drift_chance: 0.2,
            generation_attempts: 8,
        }
    }
}

impl Tuning {
    /// Base camera speed at a given game time, before effect factors
    pub fn camera_speed_at(&self, game_time: f64) -> f32 {
        let ramp = self.camera_acceleration * (game_time as f32 / 10.0);
        (self.camera_speed_init + ramp).min(self.camera_speed_max)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Replace knobs the simulation cannot run with. Each correction is
    /// logged; valid values pass through untouched.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(name: &str, value: &mut f32, fallback: f32) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning: {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        fn non_negative(name: &str, value: &mut f64, fallback: f64) {
            if !value.is_finite() {
                log::warn!("Tuning: {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            } else if *value < 0.0 {
                log::warn!("Tuning: {} = {} is negative, using 0", name, value);
                *value = 0.0;
            }
        }

        positive(
            "lane_switch_speed",
            &mut self.lane_switch_speed,
            defaults.lane_switch_speed,
        );
        positive(
            "camera_speed_init",
            &mut self.camera_speed_init,
            defaults.camera_speed_init,
        );
        if !self.camera_acceleration.is_finite() || self.camera_acceleration < 0.0 {
            log::warn!(
                "Tuning: camera_acceleration = {} is invalid, using {}",
                self.camera_acceleration,
                defaults.camera_acceleration
            );
            self.camera_acceleration = defaults.camera_acceleration;
        }
        if !self.camera_speed_max.is_finite() || self.camera_speed_max < self.camera_speed_init {
            log::warn!(
                "Tuning: camera_speed_max = {} is below camera_speed_init, using {}",
                self.camera_speed_max,
                self.camera_speed_init
            );
            self.camera_speed_max = self.camera_speed_init;
        }

        non_negative(
            "score_multiplier_duration",
            &mut self.score_multiplier_duration,
            defaults.score_multiplier_duration,
        );
        non_negative(
            "speed_multiplier_duration",
            &mut self.speed_multiplier_duration,
            defaults.speed_multiplier_duration,
        );
        non_negative(
            "reversed_controls_duration",
            &mut self.reversed_controls_duration,
            defaults.reversed_controls_duration,
        );
        non_negative(
            "bonus_display_duration",
            &mut self.bonus_display_duration,
            defaults.bonus_display_duration,
        );
        non_negative(
            "score_multiplier_factor",
            &mut self.score_multiplier_factor,
            defaults.score_multiplier_factor,
        );
        non_negative(
            "speed_multiplier_factor",
            &mut self.speed_multiplier_factor,
            defaults.speed_multiplier_factor,
        );

        if !(0.0..=1.0).contains(&self.safe_lane_drift_chance) {
            let fixed = if self.safe_lane_drift_chance.is_nan() {
                defaults.safe_lane_drift_chance
            } else {
                self.safe_lane_drift_chance.clamp(0.0, 1.0)
            };
            log::warn!(
                "Tuning: safe_lane_drift_chance = {} is out of range, using {}",
                self.safe_lane_drift_chance,
                fixed
            );
            self.safe_lane_drift_chance = fixed;
        }
        self
    }

    /// Load from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"coin_value": 3, "weights": {"obstacle": 0.0}}"#)
            .expect("valid json");
        assert_eq!(tuning.coin_value, 3);
        assert_eq!(tuning.weights.obstacle, 0.0);
        assert_eq!(tuning.weights.coin, SliceWeights::default().coin);
        assert_eq!(tuning.camera_speed_init, CAMERA_SPEED_INIT);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(Tuning::from_json("{nope"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitized_repairs_bad_knobs() {
        let tuning = Tuning::from_json(
            r#"{
                "lane_switch_speed": -1.0,
                "camera_speed_init": 6.0,
                "camera_speed_max": 2.0,
                "camera_acceleration": -3.0,
                "score_multiplier_duration": -5.0,
                "safe_lane_drift_chance": 4.0
            }"#,
        )
        .expect("valid json");
        let defaults = Tuning::default();
        assert_eq!(tuning.lane_switch_speed, defaults.lane_switch_speed);
        assert_eq!(tuning.camera_speed_init, 6.0);
        assert_eq!(tuning.camera_speed_max, 6.0);
        assert_eq!(tuning.camera_acceleration, defaults.camera_acceleration);
        assert_eq!(tuning.score_multiplier_duration, 0.0);
        assert_eq!(tuning.safe_lane_drift_chance, 1.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let mut tuning = Tuning::default();
        tuning.lane_switch_speed = 3.0;
        tuning.camera_speed_max = 20.0;
        assert_eq!(tuning.clone().sanitized(), tuning);
    }

    #[test]
    fn test_camera_speed_ramp_is_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.camera_speed_at(0.0), CAMERA_SPEED_INIT);
        assert!((tuning.camera_speed_at(20.0) - (CAMERA_SPEED_INIT + 1.0)).abs() < 1e-5);
        assert_eq!(tuning.camera_speed_at(1.0e6), CAMERA_SPEED_MAX);
    }
}
