//! Frame driver
//!
//! Turns variable frame times into fixed simulation steps, keeps pending
//! input until a step consumes it, and hands the events each step produced
//! to the audio and high-score collaborators.

use serde::Serialize;

use crate::audio::{AudioSink, cue_for};
use crate::consts::*;
use crate::highscores::{HighScoreStore, read_or_zero, save_best_effort};
use crate::hud::{FrameSink, FrameView, Hud, build_hud};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator will accept (seconds)
const MAX_FRAME_DT: f32 = 0.1;
const FPS_WINDOW: usize = 60;

/// End-of-run numbers, printed by the binary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub runs: u32,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub time: f64,
    pub slices_generated: u64,
    pub coins: u32,
    pub gems: u32,
    pub generator_fallbacks: u64,
}

/// One game plus its collaborators
pub struct Session {
    state: GameState,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    settings: Settings,
    accumulator: f32,
    input: TickInput,
    hud: Hud,
    // FPS tracking
    clock: f64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Session {
    /// Reads the high score once, then starts the first run
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let high_score = read_or_zero(store.as_ref());
        log::info!("Starting session (seed {}, best {})", seed, high_score);
        let state = GameState::new(seed, high_score, tuning);
        let mut input = TickInput::default();
        input.autopilot = settings.autopilot;
        let mut session = Self {
            state,
            store,
            audio,
            settings,
            accumulator: 0.0,
            input,
            hud: Hud::default(),
            clock: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        };
        session.dispatch_events();
        session.refresh_hud();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Queue input for the next simulation step. Presses accumulate until
    /// a step consumes them.
    pub fn queue_input(&mut self, input: &TickInput) {
        self.input.merge(input);
    }

    /// Advance by one rendered frame. Returns false once quit was requested.
    pub fn frame(&mut self, dt: f32) -> bool {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
            self.dispatch_events();
        }
        if substeps == MAX_SUBSTEPS {
            // drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.track_fps(dt);
        self.refresh_hud();
        !self.state.quit_requested
    }

    /// Hand the current frame to a renderer
    pub fn render(&self, sink: &mut dyn FrameSink) {
        sink.draw(&self.frame_view());
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            scene: self.state.track.scene(),
            character: &self.state.character,
            camera: &self.state.camera,
            phase: self.state.phase,
            hud: &self.hud,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.state.seed,
            runs: self.state.runs,
            phase: self.state.phase,
            score: self.state.score,
            high_score: self.state.high_score,
            time: self.state.game_time,
            slices_generated: self.state.track.slices_generated(),
            coins: self.state.coins_collected,
            gems: self.state.gems_collected,
            generator_fallbacks: self.state.generator.fallbacks(),
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(cue) = cue_for(&event) {
                self.audio.cue(cue);
            }
            match event {
                GameEvent::NewHighScore { score } => {
                    save_best_effort(self.store.as_mut(), score);
                }
                GameEvent::MusicTrack { index } => self.audio.play_track(index),
                _ => {}
            }
        }
    }

    fn track_fps(&mut self, dt: f32) {
        self.clock += dt as f64;
        self.frame_times[self.frame_index] = self.clock;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        let elapsed = self.clock - oldest;
        if oldest > 0.0 && elapsed > 0.0 {
            self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
        }
    }

    fn refresh_hud(&mut self) {
        let fps = self.settings.show_fps.then_some(self.fps);
        self.hud = build_hud(&self.state, fps);
    }
}
