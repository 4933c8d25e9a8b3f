use rigscene_common::{SoundHandle, VoiceHandle};
use std::collections::BTreeMap;

/// Errors from audio device operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("unknown sound: {0:?}")]
    UnknownSound(SoundHandle),
}

/// Audio device interface. The mixer behind it is opaque to the scene.
pub trait Audio {
    /// Load wave data by file name.
    fn load_wave(&mut self, name: &str) -> SoundHandle;

    /// Start a voice playing `sound`, looping until stopped if `looping`.
    fn play_wave(&mut self, sound: SoundHandle, looping: bool) -> Result<VoiceHandle, AudioError>;

    /// Stop a voice.
    fn stop_wave(&mut self, voice: VoiceHandle);

    fn is_playing(&self, voice: VoiceHandle) -> bool;

    /// Per-frame housekeeping.
    fn update(&mut self) {}
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    sound: SoundHandle,
    looping: bool,
    started_frame: u64,
}

/// A device that produces no sound but tracks voices.
///
/// One-shot voices end on the first `update` after they start; looping
/// voices play until stopped.
#[derive(Debug, Default)]
pub struct SilentAudio {
    sounds: BTreeMap<String, SoundHandle>,
    voices: BTreeMap<VoiceHandle, Voice>,
    next_voice: u32,
    frame: u64,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of voices currently playing.
    pub fn playing_count(&self) -> usize {
        self.voices.len()
    }

    /// Name a sound was loaded under.
    pub fn sound_name(&self, sound: SoundHandle) -> Option<&str> {
        self.sounds
            .iter()
            .find(|(_, h)| **h == sound)
            .map(|(name, _)| name.as_str())
    }
}

impl Audio for SilentAudio {
    fn load_wave(&mut self, name: &str) -> SoundHandle {
        if let Some(handle) = self.sounds.get(name) {
            return *handle;
        }
        let handle = SoundHandle(self.sounds.len() as u32);
        self.sounds.insert(name.to_string(), handle);
        tracing::debug!(name, ?handle, "loaded wave");
        handle
    }

    fn play_wave(&mut self, sound: SoundHandle, looping: bool) -> Result<VoiceHandle, AudioError> {
        if self.sound_name(sound).is_none() {
            return Err(AudioError::UnknownSound(sound));
        }
        let voice = VoiceHandle(self.next_voice);
        self.next_voice += 1;
        self.voices.insert(
            voice,
            Voice {
                sound,
                looping,
                started_frame: self.frame,
            },
        );
        tracing::info!(
            sound = self.sound_name(sound).unwrap_or_default(),
            ?voice,
            looping,
            "playing wave"
        );
        Ok(voice)
    }

    fn stop_wave(&mut self, voice: VoiceHandle) {
        if let Some(v) = self.voices.remove(&voice) {
            tracing::info!(?voice, sound = ?v.sound, "stopped wave");
        }
    }

    fn is_playing(&self, voice: VoiceHandle) -> bool {
        self.voices.contains_key(&voice)
    }

    fn update(&mut self) {
        self.frame += 1;
        let frame = self.frame;
        self.voices.retain(|_, v| v.looping || v.started_frame >= frame);
    }
}
