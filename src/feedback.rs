use crate::game::GameEvent;
use crate::settings::Settings;

/// Vibration waveform for eating: wait 0 ms, buzz 50 ms.
pub const EAT_VIBRATION: &[u64] = &[0, 50];
/// Vibration waveform for game over, alternating wait/buzz in ms.
pub const GAME_OVER_VIBRATION: &[u64] = &[0, 100, 100, 100, 100, 200];

const EAT_VOLUME: f32 = 0.8;
const GAME_OVER_VOLUME: f32 = 1.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SoundClip {
    Eat,
    GameOver,
}

/// A side effect for the host's audio or haptic device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Sound {
        clip: SoundClip,
        volume: f32,
    },
    Vibrate {
        pattern: &'static [u64],
        intensity: f32,
    },
}

/// Translates game events into feedback, honoring the user's toggles.
#[derive(Debug, Clone, Copy)]
pub struct Feedback {
    sound_enabled: bool,
    vibration_enabled: bool,
    master_volume: f32,
    intensity: f32,
}

impl Feedback {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sound_enabled: settings.sound_enabled,
            vibration_enabled: settings.vibration_enabled,
            master_volume: f32::from(settings.sound_volume.min(100)) / 100.0,
            intensity: f32::from(settings.vibration_intensity.min(100)) / 100.0,
        }
    }

    pub fn mute(&mut self) {
        self.sound_enabled = false;
    }

    #[must_use]
    pub fn respond(&self, event: &GameEvent) -> Vec<Effect> {
        let (clip, volume, pattern) = match event {
            GameEvent::ScoreUpdated { .. } => (SoundClip::Eat, EAT_VOLUME, EAT_VIBRATION),
            GameEvent::GameOver { .. } => {
                (SoundClip::GameOver, GAME_OVER_VOLUME, GAME_OVER_VIBRATION)
            }
        };

        let mut effects = Vec::with_capacity(2);
        if self.sound_enabled && self.master_volume > 0.0 {
            effects.push(Effect::Sound {
                clip,
                volume: volume * self.master_volume,
            });
        }
        if self.vibration_enabled && self.intensity > 0.0 {
            effects.push(Effect::Vibrate {
                pattern,
                intensity: self.intensity,
            });
        }
        effects
    }
}
