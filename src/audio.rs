//! Audio collaborator
//!
//! The core only emits cues and track changes. Playback is behind the
//! `AudioSink` trait; the bundled sink logs what it would play.

use crate::sim::effects::EffectKind;
use crate::sim::state::GameEvent;

/// Background tracks, indexed by `GameState::music_index`
pub const TRACK_NAMES: [&str; crate::consts::BACKGROUND_TRACK_COUNT] = [
    "neon-drive",
    "night-lanes",
    "afterburner",
    "glass-tunnel",
    "last-exit",
];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Coin collected
    Coin,
    /// Any gem collected
    Gem(EffectKind),
    /// Ran into an obstacle
    Lost,
    /// New high score
    HighScore,
}

/// Cue for an event, if it makes a sound
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match *event {
        GameEvent::CoinCollected { .. } => Some(SoundCue::Coin),
        GameEvent::GemCollected { kind, .. } => Some(SoundCue::Gem(kind)),
        GameEvent::Lost { .. } => Some(SoundCue::Lost),
        GameEvent::NewHighScore { .. } => Some(SoundCue::HighScore),
        _ => None,
    }
}

/// Track name for an index, wrapping out-of-range values
pub fn track_name(index: usize) -> &'static str {
    TRACK_NAMES[index % TRACK_NAMES.len()]
}

/// Fire-and-forget playback
pub trait AudioSink {
    fn cue(&mut self, cue: SoundCue);
    fn play_track(&mut self, index: usize);
}

/// Sink that logs instead of playing
#[derive(Debug, Clone)]
pub struct LoggingAudio {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<usize>,
}

impl Default for LoggingAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            current_track: None,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_track(&self) -> Option<usize> {
        self.current_track
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }
}

impl AudioSink for LoggingAudio {
    fn cue(&mut self, cue: SoundCue) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        log::debug!("sfx {:?} at volume {:.2}", cue, vol);
    }

    fn play_track(&mut self, index: usize) {
        // the index is tracked even when muted so unmuting resumes the right one
        self.current_track = Some(index);
        let vol = self.effective_volume(self.music_volume);
        log::info!("Now playing '{}' at volume {:.2}", track_name(index), vol);
    }
}
