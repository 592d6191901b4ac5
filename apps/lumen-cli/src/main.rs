use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lumen_common::{FrameContext, SceneConfig, Viewport};
use lumen_input::pointer::{PointerEvent, PointerTracker};
use lumen_kernel::SceneRenderLoop;
use lumen_render::DebugTextRenderer;
use lumen_tools::LoopInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "Headless driver for the lumen scene loop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame loop against the text renderer
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Viewport width in pixels
        #[arg(long, default_value = "1400")]
        width: f32,
        /// Viewport height in pixels
        #[arg(long, default_value = "900")]
        height: f32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Pointer position in pixels as `X,Y`; centered when omitted
        #[arg(long, value_parser = parse_pointer)]
        pointer: Option<(f32, f32)>,
        /// Scene configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the frame event log as JSON lines instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config {
        /// Scene configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn parse_pointer(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad X: {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad Y: {e}"))?;
    Ok((x, y))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(p) => SceneConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", lumen_common::crate_info());
            println!("motion: {}", lumen_motion::crate_info());
            println!("input: {}", lumen_input::crate_info());
            println!("camera: {}", lumen_camera::crate_info());
            println!("shadow: {}", lumen_shadow::crate_info());
            println!("render: {}", lumen_render::crate_info());
            println!("kernel: {}", lumen_kernel::crate_info());
            println!("tools: {}", lumen_tools::crate_info());
        }
        Commands::Simulate {
            ticks,
            width,
            height,
            dt,
            pointer,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let viewport = Viewport::new(width, height);

            let mut tracker = PointerTracker::new();
            if let Some((x, y)) = pointer {
                tracker.handle(PointerEvent::Moved { x, y });
            }
            let ctx = FrameContext::new(Some(tracker.snapshot(viewport)), viewport, dt);

            let mut scene = SceneRenderLoop::new(&config, viewport);
            let mut renderer = DebugTextRenderer::new();
            tracing::info!(
                ticks,
                width,
                height,
                occluders = renderer.layout().occluders.len(),
                "simulating"
            );

            let mut last_frame = None;
            for _ in 0..ticks {
                match scene.tick(&ctx, &mut renderer) {
                    Ok(frame) => last_frame = Some(frame),
                    Err(e) => tracing::warn!(error = %e, "frame dropped"),
                }
                if json {
                    for event in scene.drain_events() {
                        println!("{}", serde_json::to_string(&event)?);
                    }
                }
            }

            if !json {
                if let Some(frame) = last_frame {
                    print!("{frame}");
                }
                println!("{}", LoopInspector::summary(&scene));
            }
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_parses() {
        assert_eq!(parse_pointer("700,450"), Ok((700.0, 450.0)));
        assert_eq!(parse_pointer(" 1.5 , -2 "), Ok((1.5, -2.0)));
    }

    #[test]
    fn pointer_rejects_garbage() {
        assert!(parse_pointer("700").is_err());
        assert!(parse_pointer("a,b").is_err());
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "lumen-cli",
            "simulate",
            "--ticks",
            "5",
            "--pointer",
            "10,20",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                ticks,
                pointer,
                json,
                ..
            } => {
                assert_eq!(ticks, 5);
                assert_eq!(pointer, Some((10.0, 20.0)));
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn default_config_loads_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.shadow.target_samples, 100);
    }
}
