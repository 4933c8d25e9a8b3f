use crate::camera::FreeCamera;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::rig::Humanoid;
use rigscene_audio::Audio;
use rigscene_common::{SoundHandle, TextureHandle, VoiceHandle};
use rigscene_input::{InputSource, Key};
use rigscene_render::{DebugText, FrameSink, Pass, Sprite, TextureRegistry};

const TEXT_X: f32 = 50.0;
const CAMERA_TEXT_Y: f32 = 110.0;
const RIG_TEXT_Y: f32 = 230.0;

/// The tutorial scene.
///
/// A sprite drifts across the screen, a looping sound plays until SPACE is
/// pressed, debug text counts frames, and a humanoid rig is posed from the
/// keyboard in front of a free-fly camera.
#[derive(Debug)]
pub struct GameScene {
    config: SceneConfig,
    texture: TextureHandle,
    sprite: Sprite,
    sound: SoundHandle,
    voice: VoiceHandle,
    camera: FreeCamera,
    rig: Humanoid,
    debug_text: DebugText,
    value: u64,
}

impl GameScene {
    /// Load resources, start the sounds and build the rig.
    pub fn initialize(
        config: SceneConfig,
        textures: &mut TextureRegistry,
        audio: &mut dyn Audio,
    ) -> Result<Self, SceneError> {
        let texture = textures.load(&config.texture);
        let sprite = Sprite::new(texture, config.sprite.origin);

        let sound = audio.load_wave(&config.sound);
        audio.play_wave(sound, false)?;
        let voice = audio.play_wave(sound, true)?;

        let camera = FreeCamera::new(config.camera);
        let rig = Humanoid::new()?;

        tracing::info!(texture = %config.texture, sound = %config.sound, "scene initialized");
        Ok(Self {
            config,
            texture,
            sprite,
            sound,
            voice,
            camera,
            rig,
            debug_text: DebugText::new(),
            value: 0,
        })
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &dyn InputSource, audio: &mut dyn Audio) {
        let position = self.sprite.position() + self.config.sprite.velocity;
        self.sprite.set_position(position);

        if input.trigger_key(Key::Space) && audio.is_playing(self.voice) {
            audio.stop_wave(self.voice);
            tracing::info!(voice = ?self.voice, "looping voice stopped");
        }

        let text = &mut self.debug_text;
        text.print(self.config.greeting.as_str(), TEXT_X, 50.0, 1.0);
        text.set_pos(TEXT_X, 70.0);
        text.printf(format_args!("year:{}", self.config.year));
        self.value += 1;
        text.print(format!("Value:{}", self.value), TEXT_X, 90.0, 1.0);

        self.camera.update(input);
        self.camera.print(&mut self.debug_text, TEXT_X, CAMERA_TEXT_Y);

        self.rig.apply_input(input, &self.config.rig);
        self.rig.update();
        self.rig.print(&mut self.debug_text, TEXT_X, RIG_TEXT_Y);
    }

    /// Submit the frame: background sprites, rig models, then the sprite and
    /// debug text in front.
    pub fn draw(&mut self, sink: &mut dyn FrameSink) {
        sink.begin_pass(Pass::Background);
        sink.end_pass();
        sink.clear_depth();

        sink.begin_pass(Pass::Model);
        self.rig.draw(sink, self.camera.view(), self.texture);
        sink.end_pass();

        sink.begin_pass(Pass::Foreground);
        sink.draw_sprite(&self.sprite);
        sink.draw_text(self.debug_text.draw_all());
        sink.end_pass();
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn camera(&self) -> &FreeCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FreeCamera {
        &mut self.camera
    }

    pub fn rig(&self) -> &Humanoid {
        &self.rig
    }

    pub fn sound(&self) -> SoundHandle {
        self.sound
    }

    pub fn voice(&self) -> VoiceHandle {
        self.voice
    }

    /// Frames updated so far.
    pub fn value(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::PartId;
    use glam::{Vec2, Vec3};
    use rigscene_audio::SilentAudio;
    use rigscene_input::{InputScript, KeyboardState};
    use rigscene_render::{DrawCommand, FrameRecorder};

    struct Harness {
        scene: GameScene,
        audio: SilentAudio,
        textures: TextureRegistry,
        keyboard: KeyboardState,
        recorder: FrameRecorder,
    }

    impl Harness {
        fn new() -> Self {
            let mut audio = SilentAudio::new();
            let mut textures = TextureRegistry::new();
            let scene =
                GameScene::initialize(SceneConfig::default(), &mut textures, &mut audio).unwrap();
            Self {
                scene,
                audio,
                textures,
                keyboard: KeyboardState::new(),
                recorder: FrameRecorder::new(),
            }
        }

        fn frame(&mut self) {
            self.recorder.take();
            self.scene.update(&self.keyboard, &mut self.audio);
            self.audio.update();
            self.scene.draw(&mut self.recorder);
        }

        fn run(&mut self, script: &str, frames: u64) {
            let script = InputScript::parse(script).unwrap();
            for frame in 0..frames {
                script.apply(frame, &mut self.keyboard);
                self.frame();
            }
        }
    }

    #[test]
    fn initialize_loads_resources_and_starts_voices() {
        let h = Harness::new();
        assert_eq!(h.textures.name(h.scene.texture), Some("mario.jpg"));
        assert_eq!(h.audio.sound_name(h.scene.sound()), Some("se_sad03.wav"));
        assert!(h.audio.is_playing(h.scene.voice()));
        assert_eq!(h.audio.playing_count(), 2);
        assert_eq!(h.scene.sprite().position(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn sprite_moves_each_frame() {
        let mut h = Harness::new();
        h.run("", 3);
        assert_eq!(h.scene.sprite().position(), Vec2::new(106.0, 53.0));
    }

    #[test]
    fn space_stops_looping_voice() {
        let mut h = Harness::new();
        h.run("", 2);
        assert!(h.audio.is_playing(h.scene.voice()));
        h.run("0:space", 1);
        assert!(!h.audio.is_playing(h.scene.voice()));
        assert_eq!(h.audio.playing_count(), 0);
    }

    #[test]
    fn debug_text_counts_frames() {
        let mut h = Harness::new();
        h.run("", 2);
        let lines: Vec<&str> = h.recorder.text().map(|l| l.text.as_str()).collect();
        assert_eq!(lines[0], "Kaizokuou ni oreha naru.");
        assert_eq!(lines[1], "year:2001");
        assert_eq!(lines[2], "Value:2");
        assert!(lines.contains(&"Root:(0.00,0.00,0.00)"));
        assert_eq!(h.scene.value(), 2);
    }

    #[test]
    fn text_is_not_carried_between_frames() {
        let mut h = Harness::new();
        h.run("", 3);
        let count = h.recorder.text().count();
        h.run("", 1);
        assert_eq!(h.recorder.text().count(), count);
    }

    #[test]
    fn frame_passes_in_order() {
        let mut h = Harness::new();
        h.run("", 1);
        let cmds = h.recorder.commands();
        assert_eq!(cmds[0], DrawCommand::BeginPass(Pass::Background));
        assert_eq!(cmds[1], DrawCommand::EndPass(Pass::Background));
        assert_eq!(cmds[2], DrawCommand::ClearDepth);
        assert_eq!(cmds[3], DrawCommand::BeginPass(Pass::Model));
        assert_eq!(h.recorder.models().count(), PartId::ALL.len() - 1);
        let fg = cmds
            .iter()
            .position(|c| *c == DrawCommand::BeginPass(Pass::Foreground))
            .unwrap();
        assert!(matches!(cmds[fg + 1], DrawCommand::Sprite { .. }));
        assert!(matches!(cmds[fg + 2], DrawCommand::Text(_)));
        assert_eq!(cmds.last(), Some(&DrawCommand::EndPass(Pass::Foreground)));
    }

    #[test]
    fn models_use_current_camera() {
        let mut h = Harness::new();
        h.run("0-9:w", 10);
        let vp = h.scene.camera().view().view_projection();
        for cmd in h.recorder.commands() {
            if let DrawCommand::Model {
                view_projection, ..
            } = cmd
            {
                assert_eq!(*view_projection, vp);
            }
        }
        assert!((h.scene.camera().view().eye.z - (-48.0)).abs() < 1e-3);
    }

    #[test]
    fn held_arrow_walks_the_rig() {
        let mut h = Harness::new();
        h.run("0-9:right", 10);
        let head = h.scene.rig().world_matrix(PartId::Head).w_axis.truncate();
        assert!(head.abs_diff_eq(Vec3::new(2.0, 8.0, 0.0), 1e-4));

        // Drawn matrices are this frame's, not last frame's.
        let drawn_head = h.recorder.models().nth(2).map(|(m, _)| *m).unwrap();
        assert_eq!(drawn_head, h.scene.rig().world_matrix(PartId::Head));
    }
}
