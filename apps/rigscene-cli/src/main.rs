use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use rigscene_audio::{Audio, SilentAudio};
use rigscene_input::{InputScript, KeyboardState};
use rigscene_render::{FrameRecorder, TextureRegistry};
use rigscene_scene::{GameScene, PartId, SceneConfig};
use rigscene_tools::HierarchyInspector;

#[derive(Parser)]
#[command(name = "rigscene-cli", about = "Run the rig scene without a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and rig layout
    Info,
    /// Print the effective scene config as JSON
    Config,
    /// Run frames and print the last frame's draw log
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Input script, e.g. "0:space,10-40:right"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Dump the last frame as JSON instead of a text log
        #[arg(long)]
        json: bool,
    },
    /// Run frames and print every rig node
    Inspect {
        /// Number of frames to run
        #[arg(short, long, default_value = "1")]
        frames: u64,
        /// Input script, e.g. "0-20:u+right"
        #[arg(short, long, default_value = "")]
        script: String,
    },
}

/// Scene plus the headless collaborators it runs against.
struct Headless {
    scene: GameScene,
    audio: SilentAudio,
    keyboard: KeyboardState,
    recorder: FrameRecorder,
}

impl Headless {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let mut audio = SilentAudio::new();
        let mut textures = TextureRegistry::new();
        let scene = GameScene::initialize(config, &mut textures, &mut audio)?;
        Ok(Self {
            scene,
            audio,
            keyboard: KeyboardState::new(),
            recorder: FrameRecorder::new(),
        })
    }

    fn run(&mut self, script: &InputScript, frames: u64) {
        for frame in 0..frames {
            script.apply(frame, &mut self.keyboard);
            self.recorder.take();
            self.scene.update(&self.keyboard, &mut self.audio);
            self.audio.update();
            self.scene.draw(&mut self.recorder);
        }
        tracing::debug!(frames, "headless run finished");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("rigscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("rig parts:");
            for part in PartId::ALL {
                let o = part.offset();
                let parent = part.parent().map_or("-", PartId::name);
                println!(
                    "  {:<6} parent={:<6} offset=({:.1}, {:.1}, {:.1})",
                    part.name(),
                    parent,
                    o.x,
                    o.y,
                    o.z
                );
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            frames,
            script,
            json,
        } => {
            let script: InputScript = script.parse().context("parsing input script")?;
            let mut headless = Headless::new(config)?;
            headless.run(&script, frames);

            if json {
                println!("{}", serde_json::to_string_pretty(headless.recorder.commands())?);
            } else {
                println!("frame {}:", headless.scene.value());
                print!("{}", headless.recorder);
                println!(
                    "voice playing: {}",
                    headless.audio.is_playing(headless.scene.voice())
                );
            }
        }
        Commands::Inspect { frames, script } => {
            let script: InputScript = script.parse().context("parsing input script")?;
            let mut headless = Headless::new(config)?;
            headless.run(&script, frames);

            let rig = headless.scene.rig();
            println!("{}", HierarchyInspector::summary(rig.hierarchy()));
            for part in PartId::ALL {
                if let Some(info) = HierarchyInspector::inspect_node(rig.hierarchy(), rig.node(part)) {
                    println!("{:<6} {info}", part.name());
                }
            }
        }
    }

    Ok(())
}
