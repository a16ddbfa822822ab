//! Per-frame simulation tick
//!
//! Order within a tick: input and phase transitions, then time/camera
//! advance, then window advance, then collision. A freshly generated slice
//! is always committed before anything collides with it.

use super::autopilot;
use super::collision::{CollisionOutcome, detect_collision};
use super::state::{GameEvent, GamePhase, GameState};
use crate::PLAYABLE_COLUMNS;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Up one vertical lane
    pub jump: bool,
    /// Down one vertical lane
    pub crouch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run after losing
    pub replay: bool,
    pub quit: bool,
    /// Idle/demo mode - autopilot steers
    pub autopilot: bool,
}

impl TickInput {
    /// Clear the one-shot commands after they have been consumed
    pub fn clear_one_shots(&mut self) {
        self.move_left = false;
        self.move_right = false;
        self.jump = false;
        self.crouch = false;
        self.pause = false;
        self.replay = false;
        self.quit = false;
    }

    /// Merge newly arrived presses into pending input
    pub fn merge(&mut self, other: &TickInput) {
        self.move_left |= other.move_left;
        self.move_right |= other.move_right;
        self.jump |= other.jump;
        self.crouch |= other.crouch;
        self.pause |= other.pause;
        self.replay |= other.replay;
        self.quit |= other.quit;
        self.autopilot = other.autopilot;
    }
}

/// Advance the game by one timestep. Returns what the character ran into.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> CollisionOutcome {
    if input.quit {
        state.quit_requested = true;
        return CollisionOutcome::None;
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused at t={:.2}", state.game_time);
                return CollisionOutcome::None;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed at t={:.2}", state.game_time);
            }
            GamePhase::Lost => {}
        }
    }

    if input.replay && state.phase == GamePhase::Lost {
        state.reset_game();
        return CollisionOutcome::None;
    }

    if state.phase != GamePhase::Running {
        return CollisionOutcome::None;
    }

    let input = if input.autopilot {
        autopilot::steer(state, input)
    } else {
        input.clone()
    };
    apply_lane_input(state, &input);

    // Time and camera
    state.game_time += dt as f64;
    state.camera.speed = state.current_speed();
    state.camera.position.z += state.camera.speed * dt;

    let switch_speed = state.tuning.lane_switch_speed;
    state.character.move_toward_lane(dt, switch_speed);
    state.character.position.z = state.camera.position.z + CHARACTER_OFFSET;

    // Retire every slice the camera has fully passed
    while state.camera.position.z >= state.track.window_start_z() + LANE_DEPTH {
        state.track.advance_window(&mut state.generator);
    }

    state.refresh_character_grid();
    let position = state.character.position;
    detect_collision(state, position)
}

/// Lane changes, with left/right swapped while controls are reversed
fn apply_lane_input(state: &mut GameState, input: &TickInput) {
    let (mut left, mut right) = (input.move_left, input.move_right);
    if state.is_reversed() {
        std::mem::swap(&mut left, &mut right);
    }
    let lane = &mut state.character.lane;
    if left && !right && lane.col > *PLAYABLE_COLUMNS.start() {
        lane.col -= 1;
    }
    if right && !left && lane.col < *PLAYABLE_COLUMNS.end() {
        lane.col += 1;
    }
    if input.jump && !input.crouch && lane.row + 1 < LANES_Y_COUNT {
        lane.row += 1;
    }
    if input.crouch && !input.jump && lane.row > 0 {
        lane.row -= 1;
    }
}
