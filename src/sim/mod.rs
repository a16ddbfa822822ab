//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Fixed lane/row/column iteration order
//! - No rendering, audio or file I/O

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod generator;
pub mod item;
pub mod scene;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{CollisionOutcome, depth_slot_at, detect_collision, lane_at};
pub use effects::{EffectKind, EffectSpec, EffectTimer, EffectTimers};
pub use generator::SliceGenerator;
pub use item::{Item, ItemEffect};
pub use scene::{BlockKind, SceneBlock, SceneBlockCache};
pub use state::{Camera, Character, CharacterGrid, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use track::{LaneGrid, Slice, Track};
