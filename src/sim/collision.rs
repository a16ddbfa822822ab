//! Character/grid collision
//!
//! Maps the character's continuous position onto exactly one grid cell and
//! applies that cell's effect. Grid, scene cache and score/timer/phase are
//! all updated inside a single `detect_collision` call.

use glam::Vec3;

use super::effects::EffectKind;
use super::item::{Item, ItemEffect};
use super::state::{GameEvent, GamePhase, GameState};
use crate::Lane;
use crate::consts::*;

/// Result of resolving the character's cell for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Empty, border, or not running
    None,
    /// Obstacle hit; the run is over
    Lost,
    Coin { points: u64 },
    Gem { kind: EffectKind, points: u64 },
}

/// Nearest lane to a world position, clamped to the grid
pub fn lane_at(position: Vec3) -> Lane {
    let col = (position.x / LANE_WIDTH).round() + CENTER_COLUMN as f32;
    let row = ((position.y - GRAVITY_POS) / LANE_HEIGHT).round();
    Lane::new(
        row.clamp(0.0, (LANES_Y_COUNT - 1) as f32) as usize,
        col.clamp(0.0, (GRID_COLUMNS - 1) as f32) as usize,
    )
}

/// Depth slot containing world `z`, given where the window's front slice
/// begins. `None` when `z` is outside the materialized window.
pub fn depth_slot_at(z: f32, window_start_z: f32) -> Option<usize> {
    let offset = z - window_start_z;
    if offset < 0.0 {
        return None;
    }
    let slot = (offset / LANE_DEPTH).floor() as usize;
    (slot < LANES_Z_COUNT).then_some(slot)
}

/// Resolve the cell under `position` and apply its effect
pub fn detect_collision(state: &mut GameState, position: Vec3) -> CollisionOutcome {
    if state.phase != GamePhase::Running {
        return CollisionOutcome::None;
    }
    let Some(depth) = depth_slot_at(position.z, state.track.window_start_z()) else {
        return CollisionOutcome::None;
    };
    let lane = lane_at(position);
    let item = state.track.cell(depth, lane);

    match item.effect() {
        ItemEffect::None => CollisionOutcome::None,
        ItemEffect::Lose => {
            state.enter_lost();
            CollisionOutcome::Lost
        }
        ItemEffect::Coin => {
            consume(state, depth, lane);
            let factor = state
                .effects
                .factor(EffectKind::ScoreMultiplier, state.game_time);
            let points = (state.tuning.coin_value as f64 * factor).round() as u64;
            state.score += points;
            state.coins_collected += 1;
            state.events.push(GameEvent::CoinCollected { points });
            CollisionOutcome::Coin { points }
        }
        ItemEffect::Gem(kind) => {
            consume(state, depth, lane);
            state.effects.activate(kind, state.game_time);
            let points = if kind == EffectKind::BonusScore {
                state.tuning.bonus_score_value
            } else {
                0
            };
            state.score += points;
            state.gems_collected += 1;
            state.events.push(GameEvent::GemCollected { kind, points });
            log::debug!("Gem {:?} at t={:.2}", kind, state.game_time);
            CollisionOutcome::Gem { kind, points }
        }
    }
}

/// Clear the cell in the grid, the scene cache and the character snapshot
fn consume(state: &mut GameState, depth: usize, lane: Lane) {
    state.track.consume(depth, lane);
    if state.character_grid.depth == depth {
        state.character_grid.cells[lane.row][lane.col] = Item::Empty;
    }
}
