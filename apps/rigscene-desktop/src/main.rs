use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};
use rigscene_audio::{Audio, SilentAudio};
use rigscene_input::{Key, KeyboardState};
use rigscene_render::{DrawCommand, FrameRecorder, TextureRegistry};
use rigscene_render_wgpu::{WgpuRenderer, texture_color};
use rigscene_scene::{GameScene, PartId, SceneConfig};
use rigscene_tools::HierarchyInspector;

#[derive(Parser)]
#[command(name = "rigscene-desktop", about = "Rig scene desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Space => Key::Space,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyK => Key::K,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    scene: GameScene,
    audio: SilentAudio,
    keyboard: KeyboardState,
    recorder: FrameRecorder,
    /// Last drawn frame, kept for the overlay.
    frame: Vec<DrawCommand>,
    show_inspector: bool,
}

impl AppState {
    fn new(config: SceneConfig) -> Result<Self> {
        let mut audio = SilentAudio::new();
        let mut textures = TextureRegistry::new();
        let scene = GameScene::initialize(config, &mut textures, &mut audio)?;
        Ok(Self {
            scene,
            audio,
            keyboard: KeyboardState::new(),
            recorder: FrameRecorder::new(),
            frame: Vec::new(),
            show_inspector: false,
        })
    }

    /// One scene update and draw.
    fn step(&mut self) {
        self.scene.update(&self.keyboard, &mut self.audio);
        self.audio.update();
        self.scene.draw(&mut self.recorder);
        self.frame = self.recorder.take();
        // Key events arriving before the next frame compare against this one.
        self.keyboard.begin_frame();
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = map_key(code) {
            if pressed {
                self.keyboard.press(key);
            } else {
                self.keyboard.release(key);
            }
        }
        if pressed && code == KeyCode::F1 {
            self.show_inspector = !self.show_inspector;
        }
    }

    /// Foreground sprites and debug text, then the optional inspector.
    fn draw_ui(&self, ctx: &EguiContext) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("scene_overlay"),
        ));
        let ppp = ctx.pixels_per_point();

        for command in &self.frame {
            match command {
                DrawCommand::Sprite {
                    texture,
                    position,
                    size,
                    ..
                } => {
                    let [r, g, b, a] = texture_color(*texture).map(|c| (c * 255.0) as u8);
                    let rect = egui::Rect::from_min_size(
                        egui::pos2(position.x / ppp, position.y / ppp),
                        egui::vec2(size.x / ppp, size.y / ppp),
                    );
                    painter.rect_filled(rect, 4.0, egui::Color32::from_rgba_unmultiplied(r, g, b, a));
                }
                DrawCommand::Text(lines) => {
                    for line in lines {
                        painter.text(
                            egui::pos2(line.x / ppp, line.y / ppp),
                            egui::Align2::LEFT_TOP,
                            &line.text,
                            egui::FontId::monospace(14.0 * line.scale),
                            egui::Color32::WHITE,
                        );
                    }
                }
                _ => {}
            }
        }

        if !self.show_inspector {
            return;
        }

        let rig = self.scene.rig();
        egui::SidePanel::right("inspector")
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.heading("Rig");
                ui.label(HierarchyInspector::summary(rig.hierarchy()).to_string());
                ui.separator();
                for part in PartId::ALL {
                    if let Some(info) =
                        HierarchyInspector::inspect_node(rig.hierarchy(), rig.node(part))
                    {
                        ui.monospace(format!("{:<6} {info}", part.name()));
                    }
                }
                ui.separator();
                ui.small("F1: Inspector | WASD/QE/RF/NM: Camera | Arrows/UJ/IK: Rig | Space: Stop sound");
            });
    }
}

/// Everything that only exists once a window is open.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    rig_renderer: WgpuRenderer,
    overlay_input: egui_winit::State,
    overlay_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn open(event_loop: &ActiveEventLoop, overlay: &EguiContext) -> Result<Self> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title("Rig Scene")
                    .with_inner_size(PhysicalSize::new(1280u32, 720)),
            )?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(Arc::clone(&window))?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        }))
        .ok_or_else(|| anyhow::anyhow!("no GPU adapter can present to this window"))?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("rigscene"),
                ..Default::default()
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or_default(),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let rig_renderer =
            WgpuRenderer::new(&device, format, surface_config.width, surface_config.height);
        let overlay_input = egui_winit::State::new(
            overlay.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let overlay_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(backend = adapter.get_info().backend.to_str(), ?format, "window open");
        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            rig_renderer,
            overlay_input,
            overlay_renderer,
        })
    }

    fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.surface_config.width = size.width.max(1);
        self.surface_config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
        self.rig_renderer
            .resize(&self.device, self.surface_config.width, self.surface_config.height);
    }

    /// Model pass through the rig renderer, then the egui overlay on top.
    fn present(&mut self, state: &AppState, overlay: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface out of date, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output.texture.create_view(&Default::default());

        self.rig_renderer
            .render(&self.device, &self.queue, &target, &state.frame);

        let input = self.overlay_input.take_egui_input(&self.window);
        let ui = overlay.run(input, |ctx| state.draw_ui(ctx));
        self.overlay_input
            .handle_platform_output(&self.window, ui.platform_output);
        let jobs = overlay.tessellate(ui.shapes, ui.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: ui.pixels_per_point,
        };

        for (id, delta) in &ui.textures_delta.set {
            self.overlay_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay"),
            });
        self.overlay_renderer
            .update_buffers(&self.device, &self.queue, &mut encoder, &jobs, &screen);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    ..Default::default()
                })
                .forget_lifetime();
            self.overlay_renderer.render(&mut pass, &jobs, &screen);
        }
        self.queue.submit([encoder.finish()]);
        for id in &ui.textures_delta.free {
            self.overlay_renderer.free_texture(id);
        }

        output.present();
    }
}

struct SceneWindow {
    state: AppState,
    overlay: EguiContext,
    gpu: Option<Gpu>,
}

impl ApplicationHandler for SceneWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::open(event_loop, &self.overlay) {
            Ok(gpu) => {
                self.state.scene.camera_mut().set_aspect_ratio(gpu.aspect_ratio());
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to open window: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.overlay_input.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                self.state.scene.camera_mut().set_aspect_ratio(gpu.aspect_ratio());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => self.state.handle_key(code, state.is_pressed()),
            WindowEvent::RedrawRequested => {
                self.state.step();
                gpu.present(&self.state, &self.overlay);
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("rigscene-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SceneWindow {
        state: AppState::new(config)?,
        overlay: EguiContext::default(),
        gpu: None,
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
