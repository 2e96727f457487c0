//! Audio system using Kira for the launch and explosion cues.

pub mod synth;

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle},
    tween::Tween,
};
use std::collections::HashMap;

/// Sounds the show can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Launch,
    Explosion,
}

/// Main audio system. Cues are synthesized once at startup and replayed from memory.
pub struct AudioSystem {
    manager: AudioManager,
    sounds: HashMap<Cue, StaticSoundData>,
    active_sounds: Vec<StaticSoundHandle>,
    muted: bool,
}

impl AudioSystem {
    /// Open the default output device and synthesize every cue.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        let mut system = Self {
            manager,
            sounds: HashMap::new(),
            active_sounds: Vec::new(),
            muted: false,
        };

        let rate = synth::SAMPLE_RATE;
        system
            .sounds
            .insert(Cue::Launch, synth::sound_data(&synth::launch_samples(rate), rate));
        let explosion = synth::explosion_samples(rate, &mut rand::thread_rng());
        system
            .sounds
            .insert(Cue::Explosion, synth::sound_data(&explosion, rate));
        log::info!("Audio ready ({} cues at {} Hz)", system.sounds.len(), rate);
        Ok(system)
    }

    /// Play a cue. Does nothing while muted.
    pub fn play(&mut self, cue: Cue) -> Result<()> {
        if self.muted {
            return Ok(());
        }
        if let Some(sound_data) = self.sounds.get(&cue) {
            let handle = self.manager.play(sound_data.clone())?;
            self.active_sounds.push(handle);
        }
        Ok(())
    }

    /// Drop handles of sounds that finished playing.
    pub fn cleanup(&mut self) {
        self.active_sounds
            .retain(|handle| handle.state() != kira::sound::PlaybackState::Stopped);
    }

    /// Stop all sounds.
    pub fn stop_all(&mut self) {
        for handle in &mut self.active_sounds {
            let _ = handle.stop(Tween::default());
        }
        self.active_sounds.clear();
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f64) {
        let _ = self
            .manager
            .main_track()
            .set_volume(volume.clamp(0.0, 1.0), Tween::default());
    }

    pub fn set_muted(&mut self, muted: bool) {
        if muted {
            self.stop_all();
        }
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn active_count(&self) -> usize {
        self.active_sounds.len()
    }
}
