//! Idle/demo mode: steers the runner without a player
//!
//! Looks a few slices ahead in the current lane and its neighbours, avoids
//! lanes with an obstacle coming up and drifts toward pickups. Emits raw
//! input, so it pre-swaps left/right while controls are reversed.

use super::item::Item;
use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;
use crate::{Lane, PLAYABLE_COLUMNS};

/// Slices examined ahead of the character
const LOOKAHEAD: usize = 6;

/// Score a lane over the upcoming slices (higher is better)
fn lane_score(state: &GameState, lane: Lane, from_depth: usize) -> i32 {
    let mut score = 0;
    for ahead in 0..LOOKAHEAD {
        let depth = from_depth + ahead;
        if depth >= LANES_Z_COUNT {
            break;
        }
        let weight = (LOOKAHEAD - ahead) as i32;
        match state.track.cell(depth, lane) {
            Item::Obstacle => {
                score -= 1000 * weight;
                // nothing behind an obstacle matters
                break;
            }
            Item::Coin => score += 2 * weight,
            Item::ScoreGem | Item::SpeedGem | Item::BonusGem => score += 5 * weight,
            Item::ReversedGem => score -= weight,
            Item::Empty | Item::Border => {}
        }
    }
    score
}

fn neighbours(lane: Lane) -> Vec<Lane> {
    let mut out = Vec::with_capacity(4);
    if lane.col > *PLAYABLE_COLUMNS.start() {
        out.push(Lane::new(lane.row, lane.col - 1));
    }
    if lane.col < *PLAYABLE_COLUMNS.end() {
        out.push(Lane::new(lane.row, lane.col + 1));
    }
    if lane.row + 1 < LANES_Y_COUNT {
        out.push(Lane::new(lane.row + 1, lane.col));
    }
    if lane.row > 0 {
        out.push(Lane::new(lane.row - 1, lane.col));
    }
    out
}

/// Best single-step move from the character's lane, if any beats staying
pub fn choose_lane(state: &GameState) -> Lane {
    let current = state.character.lane;
    let Some(depth) = state.character_depth() else {
        return current;
    };
    let mut best = current;
    // small bias toward staying put and toward the ground row
    let mut best_score = lane_score(state, current, depth) + 1;
    for lane in neighbours(current) {
        // the slice we are in right now must be passable to switch through
        if !state.track.cell(depth, lane).is_passable() {
            continue;
        }
        let score = lane_score(state, lane, depth) - lane.row as i32;
        if score > best_score {
            best = lane;
            best_score = score;
        }
    }
    best
}

/// Fill the movement flags of `input` for the chosen lane
pub fn steer(state: &GameState, input: &TickInput) -> TickInput {
    let mut out = TickInput {
        move_left: false,
        move_right: false,
        jump: false,
        crouch: false,
        ..input.clone()
    };
    if !state.character.settled() {
        return out;
    }
    let current = state.character.lane;
    let target = choose_lane(state);
    let (mut left, mut right) = (target.col < current.col, target.col > current.col);
    if state.is_reversed() {
        std::mem::swap(&mut left, &mut right);
    }
    out.move_left = left;
    out.move_right = right;
    out.jump = target.row > current.row;
    out.crouch = target.row < current.row;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::EffectKind;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(5, 0, Tuning::default())
    }

    fn clear_ahead(state: &mut GameState) {
        for depth in 0..LANES_Z_COUNT {
            for row in 0..LANES_Y_COUNT {
                for col in PLAYABLE_COLUMNS {
                    state.track.place(depth, Lane::new(row, col), Item::Empty);
                }
            }
        }
    }

    #[test]
    fn test_stays_when_clear() {
        let mut state = state();
        clear_ahead(&mut state);
        assert_eq!(choose_lane(&state), state.character.lane);
    }

    #[test]
    fn test_dodges_obstacle() {
        let mut state = state();
        clear_ahead(&mut state);
        let depth = state.character_depth().expect("in window");
        let lane = state.character.lane;
        state.track.place(depth + 2, lane, Item::Obstacle);
        let target = choose_lane(&state);
        assert_ne!(target, lane);
        assert_eq!(target.row.abs_diff(lane.row) + target.col.abs_diff(lane.col), 1);
    }

    #[test]
    fn test_steer_swaps_when_reversed() {
        let mut state = state();
        clear_ahead(&mut state);
        let depth = state.character_depth().expect("in window");
        let lane = state.character.lane;
        // only the right-hand neighbour is attractive
        state.track.place(depth + 1, Lane::new(lane.row, lane.col + 1), Item::BonusGem);
        let input = steer(&state, &TickInput::default());
        assert!(input.move_right && !input.move_left);

        state.effects.activate(EffectKind::ReversedControls, state.game_time);
        let input = steer(&state, &TickInput::default());
        assert!(input.move_left && !input.move_right);
    }
}
