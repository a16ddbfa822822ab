//! Timed modifiers (power-ups/power-downs)
//!
//! Each effect stores when it started and how long it lasts; activity is
//! always evaluated against the caller's game time. Nothing ticks in the
//! background, so freezing game time (pause) freezes every window too.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Timed effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    ScoreMultiplier,
    SpeedMultiplier,
    ReversedControls,
    /// Cosmetic popup window after a bonus award
    BonusScore,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::ScoreMultiplier,
        EffectKind::SpeedMultiplier,
        EffectKind::ReversedControls,
        EffectKind::BonusScore,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Fixed duration and factor for one effect kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub duration: f64,
    /// Multiplier while active (1.0 for effects with no numeric factor)
    pub factor: f64,
}

/// Activation window of one effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub activated: bool,
    pub start: f64,
    pub duration: f64,
}

impl EffectTimer {
    pub fn is_active(&self, now: f64) -> bool {
        self.activated && self.start <= now && now < self.start + self.duration
    }

    /// Seconds left in the window (0 when inactive)
    pub fn remaining(&self, now: f64) -> f64 {
        if self.is_active(now) {
            self.start + self.duration - now
        } else {
            0.0
        }
    }
}

/// All timed effects of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectTimers {
    specs: [EffectSpec; 4],
    timers: [EffectTimer; 4],
}

impl Default for EffectTimers {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl EffectTimers {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let mut specs = [EffectSpec {
            duration: 0.0,
            factor: 1.0,
        }; 4];
        specs[EffectKind::ScoreMultiplier.index()] = EffectSpec {
            duration: tuning.score_multiplier_duration,
            factor: tuning.score_multiplier_factor,
        };
        specs[EffectKind::SpeedMultiplier.index()] = EffectSpec {
            duration: tuning.speed_multiplier_duration,
            factor: tuning.speed_multiplier_factor,
        };
        specs[EffectKind::ReversedControls.index()] = EffectSpec {
            duration: tuning.reversed_controls_duration,
            factor: 1.0,
        };
        specs[EffectKind::BonusScore.index()] = EffectSpec {
            duration: tuning.bonus_display_duration,
            factor: 1.0,
        };
        Self {
            specs,
            timers: [EffectTimer::default(); 4],
        }
    }

    pub fn spec(&self, kind: EffectKind) -> EffectSpec {
        self.specs[kind.index()]
    }

    pub fn timer(&self, kind: EffectKind) -> EffectTimer {
        self.timers[kind.index()]
    }

    /// Start (or restart) an effect window at `now`. Re-activation replaces
    /// the window; durations and factors never stack.
    pub fn activate(&mut self, kind: EffectKind, now: f64) {
        let duration = self.specs[kind.index()].duration;
        self.timers[kind.index()] = EffectTimer {
            activated: true,
            start: now,
            duration,
        };
    }

    pub fn is_active(&self, kind: EffectKind, now: f64) -> bool {
        self.timers[kind.index()].is_active(now)
    }

    /// Numeric factor while active, identity otherwise
    pub fn factor(&self, kind: EffectKind, now: f64) -> f64 {
        if self.is_active(kind, now) {
            self.specs[kind.index()].factor
        } else {
            1.0
        }
    }

    pub fn remaining(&self, kind: EffectKind, now: f64) -> f64 {
        self.timers[kind.index()].remaining(now)
    }

    /// Kinds active at `now`, in declaration order
    pub fn active(&self, now: f64) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::ALL
            .into_iter()
            .filter(move |k| self.is_active(*k, now))
    }

    /// Deactivate everything (new run)
    pub fn clear(&mut self) {
        self.timers = [EffectTimer::default(); 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_match_constants() {
        let timers = EffectTimers::default();
        assert_eq!(
            timers.spec(EffectKind::ScoreMultiplier),
            EffectSpec {
                duration: SCORE_MULTIPLIER_DURATION,
                factor: SCORE_MULTIPLIER_FACTOR,
            }
        );
        assert_eq!(
            timers.spec(EffectKind::SpeedMultiplier),
            EffectSpec {
                duration: SPEED_MULTIPLIER_DURATION,
                factor: SPEED_MULTIPLIER_FACTOR,
            }
        );
        assert_eq!(
            timers.spec(EffectKind::ReversedControls).duration,
            REVERSED_CONTROLS_DURATION
        );
        assert_eq!(
            timers.spec(EffectKind::BonusScore).duration,
            BONUS_SCORE_DISPLAY_DURATION
        );
    }

    #[test]
    fn test_inactive_until_activated() {
        let timers = EffectTimers::default();
        for kind in EffectKind::ALL {
            assert!(!timers.is_active(kind, 0.0));
            assert_eq!(timers.factor(kind, 0.0), 1.0);
        }
    }

    #[test]
    fn test_factor_while_active() {
        let mut timers = EffectTimers::default();
        timers.activate(EffectKind::ScoreMultiplier, 3.0);
        timers.activate(EffectKind::SpeedMultiplier, 3.0);
        assert_eq!(timers.factor(EffectKind::ScoreMultiplier, 4.0), 2.0);
        assert_eq!(timers.factor(EffectKind::SpeedMultiplier, 4.0), 1.25);
        assert_eq!(timers.factor(EffectKind::ScoreMultiplier, 13.0), 1.0);
        assert_eq!(timers.factor(EffectKind::SpeedMultiplier, 13.5), 1.0);
    }

    #[test]
    fn test_window_is_half_open() {
        let mut timers = EffectTimers::default();
        timers.activate(EffectKind::ReversedControls, 5.0);
        assert!(!timers.is_active(EffectKind::ReversedControls, 4.999));
        assert!(timers.is_active(EffectKind::ReversedControls, 5.0));
        assert!(timers.is_active(EffectKind::ReversedControls, 14.999));
        assert!(!timers.is_active(EffectKind::ReversedControls, 15.0));
    }

    #[test]
    fn test_bonus_window_is_short() {
        let mut timers = EffectTimers::default();
        timers.activate(EffectKind::BonusScore, 0.0);
        assert!(timers.is_active(EffectKind::BonusScore, 1.5));
        assert!(!timers.is_active(EffectKind::BonusScore, 2.0));
        assert_eq!(timers.factor(EffectKind::BonusScore, 1.0), 1.0);
    }

    #[test]
    fn test_active_iterator_and_clear() {
        let mut timers = EffectTimers::default();
        timers.activate(EffectKind::SpeedMultiplier, 0.0);
        timers.activate(EffectKind::BonusScore, 0.0);
        let active: Vec<_> = timers.active(1.0).collect();
        assert_eq!(active, vec![EffectKind::SpeedMultiplier, EffectKind::BonusScore]);
        timers.clear();
        assert_eq!(timers.active(1.0).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_active_iff_inside_window(start in 0.0f64..1000.0, t in 0.0f64..1100.0) {
            let mut timers = EffectTimers::default();
            timers.activate(EffectKind::SpeedMultiplier, start);
            let expected = start <= t && t < start + SPEED_MULTIPLIER_DURATION;
            prop_assert_eq!(timers.is_active(EffectKind::SpeedMultiplier, t), expected);
        }

        #[test]
        fn prop_reactivation_restarts_window(t1 in 0.0f64..100.0, gap in 0.01f64..9.9) {
            let mut timers = EffectTimers::default();
            let t2 = t1 + gap;
            timers.activate(EffectKind::ScoreMultiplier, t1);
            timers.activate(EffectKind::ScoreMultiplier, t2);
            let d = SCORE_MULTIPLIER_DURATION;
            prop_assert!(timers.is_active(EffectKind::ScoreMultiplier, t2 + d - 1e-6));
            prop_assert!(!timers.is_active(EffectKind::ScoreMultiplier, t2 + d));
            // not stacked: factor stays the same and remaining never exceeds one window
            prop_assert_eq!(timers.factor(EffectKind::ScoreMultiplier, t2), SCORE_MULTIPLIER_FACTOR);
            prop_assert!(timers.remaining(EffectKind::ScoreMultiplier, t2) <= d + 1e-9);
        }
    }
}
