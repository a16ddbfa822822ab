//! Lane Runner - gameplay core of a lane-based infinite 3D runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane grid, slice generation, collisions, game state)
//! - `session`: Frame driver wiring the simulation to its collaborators
//! - `highscores`: High score persistence
//! - `audio`: Sound cue and music track collaborator
//! - `hud`: Read-only frame snapshots and HUD strings for renderers
//! - `tuning`: Data-driven game balance
//! - `settings`: User preferences

pub mod audio;
pub mod error;
pub mod highscores;
pub mod hud;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::StoreError;
pub use highscores::{FileHighScore, HighScoreStore, MemoryHighScore};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playable horizontal lanes
    pub const LANES_X_COUNT: usize = 3;
    /// Vertical lanes (rows)
    pub const LANES_Y_COUNT: usize = 4;
    /// Depth slots in the visible window
    pub const LANES_Z_COUNT: usize = 20;
    /// Grid columns: playable lanes plus one border column on each side
    pub const GRID_COLUMNS: usize = LANES_X_COUNT + 2;
    /// Column index of the middle playable lane
    pub const CENTER_COLUMN: usize = GRID_COLUMNS / 2;

    /// Lane pitch in world units
    pub const LANE_WIDTH: f32 = 1.5;
    pub const LANE_HEIGHT: f32 = 1.0;
    pub const LANE_DEPTH: f32 = 1.5;

    /// Renderable sizes
    pub const CUBE_SIZE: f32 = LANE_HEIGHT;
    pub const GEM_SIZE: f32 = 0.6;
    pub const COIN_SIZE: f32 = 0.2;
    pub const RING_RADIUS: f32 = 0.5;

    /// Height of the ground row's centre
    pub const GRAVITY_POS: f32 = LANE_HEIGHT;
    /// Distance the character runs ahead of the camera
    pub const CHARACTER_OFFSET: f32 = LANE_DEPTH * 1.5;

    /// Camera defaults (units/sec)
    pub const CAMERA_SPEED_INIT: f32 = 4.0;
    /// Speed gained per 10 seconds of game time
    pub const CAMERA_ACCELERATION: f32 = 0.5;
    pub const CAMERA_SPEED_MAX: f32 = 12.0;

    /// Scoring
    pub const COIN_VALUE: u64 = 1;
    pub const BONUS_SCORE_VALUE: u64 = 100;

    /// Effect windows (seconds) and factors
    pub const SCORE_MULTIPLIER_DURATION: f64 = 10.0;
    pub const SCORE_MULTIPLIER_FACTOR: f64 = 2.0;
    pub const SPEED_MULTIPLIER_DURATION: f64 = 10.0;
    pub const SPEED_MULTIPLIER_FACTOR: f64 = 1.25;
    pub const REVERSED_CONTROLS_DURATION: f64 = 10.0;
    pub const BONUS_SCORE_DISPLAY_DURATION: f64 = 2.0;

    /// Number of background music tracks
    pub const BACKGROUND_TRACK_COUNT: usize = 5;
}

use consts::*;
use glam::Vec3;

/// A discrete (row, column) lane address in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Lane {
    pub row: usize,
    pub col: usize,
}

impl Lane {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Ground row, middle playable column
    pub const fn start() -> Self {
        Self::new(0, CENTER_COLUMN)
    }

    /// True for the leftmost/rightmost border columns
    #[inline]
    pub fn is_border(&self) -> bool {
        is_border_column(self.col)
    }
}

#[inline]
pub fn is_border_column(col: usize) -> bool {
    col == 0 || col == GRID_COLUMNS - 1
}

/// First and last playable column
pub const PLAYABLE_COLUMNS: std::ops::RangeInclusive<usize> = 1..=LANES_X_COUNT;

/// World-space x of a column centre (middle lane at x = 0)
#[inline]
pub fn column_x(col: usize) -> f32 {
    (col as f32 - CENTER_COLUMN as f32) * LANE_WIDTH
}

/// World-space y of a row centre
#[inline]
pub fn row_y(row: usize) -> f32 {
    GRAVITY_POS + row as f32 * LANE_HEIGHT
}

/// World-space centre of a lane at a given absolute slice index
#[inline]
pub fn lane_center(lane: Lane, slice_id: u64) -> Vec3 {
    Vec3::new(
        column_x(lane.col),
        row_y(lane.row),
        (slice_id as f32 + 0.5) * LANE_DEPTH,
    )
}
