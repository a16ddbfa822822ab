//! Game state and core simulation types
//!
//! `GameState` is the explicit context object for one game: it owns the
//! track, the generator, the timed effects and every counter a run needs.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::depth_slot_at;
use super::effects::{EffectKind, EffectTimers};
use super::generator::SliceGenerator;
use super::item::Item;
use super::track::{Slice, Track, empty_slice};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Lane, column_x, row_y};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Run ended on an obstacle
    Lost,
}

/// Discrete things that happened during a tick, for audio/persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run: u32 },
    CoinCollected { points: u64 },
    GemCollected { kind: EffectKind, points: u64 },
    Lost { score: u64 },
    NewHighScore { score: u64 },
    MusicTrack { index: usize },
    Paused,
    Resumed,
}

/// Logical camera: only its depth and speed matter to the core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    /// Current forward speed (units/sec), effects included
    pub speed: f32,
}

impl Camera {
    pub fn new(speed: f32) -> Self {
        Self {
            position: Vec3::new(0.0, GRAVITY_POS, 0.0),
            speed,
        }
    }
}

/// The runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Lane the character is heading to
    pub lane: Lane,
    /// Continuous world position
    pub position: Vec3,
}

impl Character {
    pub fn at_start(camera: &Camera) -> Self {
        let lane = Lane::start();
        Self {
            lane,
            position: Vec3::new(
                column_x(lane.col),
                row_y(lane.row),
                camera.position.z + CHARACTER_OFFSET,
            ),
        }
    }

    /// Target lane centre in the x/y plane
    pub fn target(&self) -> (f32, f32) {
        (column_x(self.lane.col), row_y(self.lane.row))
    }

    /// Close enough to the target lane to take another step
    pub fn settled(&self) -> bool {
        let (x, y) = self.target();
        (self.position.x - x).abs() < 0.05 && (self.position.y - y).abs() < 0.05
    }

    /// Move toward the target lane centre, clamped to `max_speed`
    pub fn move_toward_lane(&mut self, dt: f32, max_speed: f32) {
        let (tx, ty) = self.target();
        let max_delta = max_speed * dt;
        self.position.x += (tx - self.position.x).clamp(-max_delta, max_delta);
        self.position.y += (ty - self.position.y).clamp(-max_delta, max_delta);
    }
}

/// Snapshot of the slice the character is currently inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterGrid {
    pub depth: usize,
    pub cells: Slice,
}

impl Default for CharacterGrid {
    fn default() -> Self {
        Self {
            depth: 0,
            cells: empty_slice(),
        }
    }
}

impl CharacterGrid {
    pub fn get(&self, lane: Lane) -> Item {
        self.cells[lane.row][lane.col]
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub track: Track,
    pub generator: SliceGenerator,
    pub camera: Camera,
    pub character: Character,
    pub character_grid: CharacterGrid,
    pub effects: EffectTimers,
    pub score: u64,
    pub high_score: u64,
    /// Seconds of running time this run (frozen while paused)
    pub game_time: f64,
    pub music_index: usize,
    /// Runs started since construction (1 after the first reset)
    pub runs: u32,
    pub coins_collected: u32,
    pub gems_collected: u32,
    pub events: Vec<GameEvent>,
    pub quit_requested: bool,
}

impl GameState {
    /// Create a game and start its first run
    pub fn new(seed: u64, high_score: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let generator = SliceGenerator::new(rng.random(), &tuning);
        let camera = Camera::new(tuning.camera_speed_init);
        let mut state = Self {
            seed,
            rng,
            phase: GamePhase::Running,
            track: Track::new(),
            generator,
            camera,
            character: Character::at_start(&camera),
            character_grid: CharacterGrid::default(),
            effects: EffectTimers::from_tuning(&tuning),
            score: 0,
            high_score,
            game_time: 0.0,
            music_index: 0,
            runs: 0,
            coins_collected: 0,
            gems_collected: 0,
            events: Vec::new(),
            quit_requested: false,
            tuning,
        };
        state.reset_game();
        state
    }

    /// Start a new run: full window regenerated, score/time/effects cleared,
    /// new background track
    pub fn reset_game(&mut self) {
        self.generator.reset();
        self.track.refill(&mut self.generator);
        self.effects.clear();
        self.score = 0;
        self.game_time = 0.0;
        self.coins_collected = 0;
        self.gems_collected = 0;
        self.camera = Camera::new(self.tuning.camera_speed_at(0.0));
        self.character = Character::at_start(&self.camera);
        self.phase = GamePhase::Running;
        self.runs += 1;

        self.music_index = self.next_music_index();
        self.events.push(GameEvent::RunStarted { run: self.runs });
        self.events.push(GameEvent::MusicTrack {
            index: self.music_index,
        });
        self.refresh_character_grid();
        log::info!(
            "Run {} started (seed {}, track {})",
            self.runs,
            self.seed,
            self.music_index
        );
    }

    fn next_music_index(&mut self) -> usize {
        if BACKGROUND_TRACK_COUNT < 2 {
            return 0;
        }
        if self.runs <= 1 {
            return self.rng.random_range(0..BACKGROUND_TRACK_COUNT);
        }
        // any track except the current one
        let step = self.rng.random_range(1..BACKGROUND_TRACK_COUNT);
        (self.music_index + step) % BACKGROUND_TRACK_COUNT
    }

    /// Enter LOST, recording a new high score if beaten
    pub fn enter_lost(&mut self) {
        if self.phase == GamePhase::Lost {
            return;
        }
        self.phase = GamePhase::Lost;
        self.events.push(GameEvent::Lost { score: self.score });
        log::info!("Run {} lost with score {}", self.runs, self.score);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore { score: self.score });
            log::info!("New high score: {}", self.score);
        }
    }

    /// Depth slot of the character in the current window
    pub fn character_depth(&self) -> Option<usize> {
        depth_slot_at(self.character.position.z, self.track.window_start_z())
    }

    /// Re-read the slice under the character
    pub fn refresh_character_grid(&mut self) {
        let Some(depth) = self.character_depth() else {
            return;
        };
        if let Some(cells) = self.track.grid().slice(depth) {
            self.character_grid = CharacterGrid { depth, cells };
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.effects
            .is_active(EffectKind::ReversedControls, self.game_time)
    }

    /// Current camera speed: time ramp times the speed effect
    pub fn current_speed(&self) -> f32 {
        let factor = self
            .effects
            .factor(EffectKind::SpeedMultiplier, self.game_time);
        self.tuning.camera_speed_at(self.game_time) * factor as f32
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
