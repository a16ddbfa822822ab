//! HUD text and the read-only frame snapshot handed to renderers

use crate::sim::effects::EffectKind;
use crate::sim::scene::SceneBlockCache;
use crate::sim::state::{Camera, Character, GamePhase, GameState};

/// Strings a renderer draws over the scene
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub score: String,
    pub high_score: String,
    pub time: String,
    /// Only when the FPS counter is enabled
    pub fps: Option<String>,
    /// One label per active effect
    pub effects: Vec<String>,
    /// "Paused" / "Game Over"
    pub banner: Option<String>,
    pub prompt: Option<String>,
}

/// Label for an active effect with its remaining whole seconds
pub fn effect_label(kind: EffectKind, factor: f64, remaining: f64) -> String {
    let secs = remaining.ceil() as u64;
    match kind {
        EffectKind::ScoreMultiplier => format!("GEM (Score x{}): {}s", factor, secs),
        EffectKind::SpeedMultiplier => format!("GEM (Speed x{}): {}s", factor, secs),
        EffectKind::ReversedControls => format!("Crazy Mode: {}s", secs),
        EffectKind::BonusScore => format!("+{}", factor),
    }
}

pub fn build_hud(state: &GameState, fps: Option<u32>) -> Hud {
    let now = state.game_time;
    let effects = state
        .effects
        .active(now)
        .map(|kind| {
            let factor = match kind {
                // the popup shows points, not a factor
                EffectKind::BonusScore => state.tuning.bonus_score_value as f64,
                _ => state.effects.factor(kind, now),
            };
            effect_label(kind, factor, state.effects.remaining(kind, now))
        })
        .collect();

    let (banner, prompt) = match state.phase {
        GamePhase::Running => (None, None),
        GamePhase::Paused => (
            Some("Paused".to_string()),
            Some("Press P to resume".to_string()),
        ),
        GamePhase::Lost => (
            Some("Game Over".to_string()),
            Some("Press Q to quit, R to replay".to_string()),
        ),
    };

    Hud {
        score: format!("Score: {}", state.score),
        high_score: format!("Highscore: {}", state.high_score),
        time: format!("Time: {}", state.game_time.floor() as u64),
        fps: fps.map(|f| format!("FPS: {}", f)),
        effects,
        banner,
        prompt,
    }
}

/// Everything a renderer may read for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a SceneBlockCache,
    pub character: &'a Character,
    pub camera: &'a Camera,
    pub phase: GamePhase,
    pub hud: &'a Hud,
}

/// Rendering collaborator: draws a frame, never writes back
pub trait FrameSink {
    fn draw(&mut self, frame: &FrameView<'_>);
}
