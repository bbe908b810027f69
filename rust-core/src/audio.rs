//! Sound playback guard.
//!
//! Playback itself belongs to the host (a sound pool, an audio engine); the
//! core only decides which variant to play and whether playing is possible
//! right now. Sounds load asynchronously, so a gesture may fire before the
//! bank is ready. That gesture still counts, it just plays nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{Result, SensingError};

/// Host-side audio output. Fire and forget.
pub trait AudioSink {
    fn play_sound(&mut self, index: usize);
}

/// Sink that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sound(&mut self, _index: usize) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Number of distinct gunshot sounds. Regions wrap onto them.
    pub num_sound_variants: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            num_sound_variants: 8,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_sound_variants == 0 {
            return Err(SensingError::InvalidConfig(
                "num_sound_variants must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loading progress of the host's sound assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankState {
    Loading { loaded: usize },
    Ready,
    Failed,
}

/// Tracks asset load completions reported by the host.
#[derive(Debug, Clone)]
pub struct SoundBank {
    num_variants: usize,
    state: BankState,
}

impl SoundBank {
    pub fn new(num_variants: usize) -> Self {
        Self {
            num_variants,
            state: BankState::Loading { loaded: 0 },
        }
    }

    /// Record one asset load completion. `status` 0 means success.
    ///
    /// The first failure is returned as [`SensingError::SoundLoadFailed`];
    /// later completions on a failed bank are ignored.
    pub fn on_load_complete(&mut self, status: i32) -> Result<BankState> {
        match self.state {
            BankState::Failed => {
                debug!(status, "load completion on failed sound bank ignored");
            }
            _ if status != 0 => {
                self.state = BankState::Failed;
                error!(status, "sound effects could not be loaded");
                return Err(SensingError::SoundLoadFailed(status));
            }
            BankState::Loading { loaded } => {
                let loaded = loaded + 1;
                self.state = if loaded >= self.num_variants {
                    info!(sounds = self.num_variants, "all sound effects loaded");
                    BankState::Ready
                } else {
                    BankState::Loading { loaded }
                };
            }
            BankState::Ready => {}
        }
        Ok(self.state)
    }

    pub fn state(&self) -> BankState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BankState::Ready
    }

    pub fn num_variants(&self) -> usize {
        self.num_variants
    }

    /// Start over, as when the host releases and reloads its sound pool.
    pub fn reset(&mut self) {
        self.state = BankState::Loading { loaded: 0 };
    }
}

/// What happened to a playback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played(usize),
    /// Sounds are not loaded (yet); silently skipped.
    NotReady,
}

/// Guards an [`AudioSink`] with the bank's readiness and index range.
pub struct SoundPlayer<A> {
    bank: SoundBank,
    sink: A,
}

impl<A: AudioSink> SoundPlayer<A> {
    pub fn new(num_variants: usize, sink: A) -> Self {
        Self {
            bank: SoundBank::new(num_variants),
            sink,
        }
    }

    /// Play sound `index` if the bank is ready and the index exists.
    pub fn play(&mut self, index: usize) -> Result<PlayOutcome> {
        if !self.bank.is_ready() {
            return Ok(PlayOutcome::NotReady);
        }
        if index >= self.bank.num_variants() {
            return Err(SensingError::InvalidSoundIndex {
                index,
                available: self.bank.num_variants(),
            });
        }
        self.sink.play_sound(index);
        Ok(PlayOutcome::Played(index))
    }

    pub fn bank_mut(&mut self) -> &mut SoundBank {
        &mut self.bank
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut A {
        &mut self.sink
    }
}
