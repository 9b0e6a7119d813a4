use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use pixelsand_render::{DebugTextRenderer, Renderer, SoftwareRenderer};
use pixelsand_sim::{SimConfig, Simulation};
use pixelsand_tools::SimInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixelsand-cli", about = "Headless tool for pixelsand simulations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Simulation config file (YAML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct GravityArgs {
    /// Gravity along x (positive pulls right)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    gx: f32,
    /// Gravity along y (positive pulls up)
    #[arg(long, default_value = "-16", allow_hyphen_values = true)]
    gy: f32,
    /// Shake strength
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    gz: f32,
}

impl GravityArgs {
    fn vector(self) -> Vec3 {
        Vec3::new(self.gx, self.gy, self.gz)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the simulation and print a summary
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        #[command(flatten)]
        gravity: GravityArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also print the grid as text
        #[arg(long)]
        ascii: bool,
        /// Also report the particle at this index
        #[arg(long)]
        particle: Option<usize>,
    },
    /// Run twice from the same seed and compare state hashes
    Replay {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "500")]
        ticks: u64,
        /// Seed override
        #[arg(short, long)]
        seed: Option<u64>,
        #[command(flatten)]
        gravity: GravityArgs,
    },
    /// Run the simulation, then render the final frame to a PNG
    Render {
        /// Number of ticks to simulate before rendering
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        #[command(flatten)]
        gravity: GravityArgs,
        /// Output PNG path
        #[arg(short, long, default_value = "pixelsand.png")]
        out: PathBuf,
        /// Pixels per grid cell
        #[arg(long, default_value = "16")]
        scale: u32,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

/// Pixel size of a `width x height` grid drawn at `scale` pixels per cell.
fn render_size(width: u32, height: u32, scale: u32) -> Result<(u32, u32)> {
    let scaled = |cells: u32| {
        cells
            .checked_mul(scale)
            .with_context(|| format!("{cells} cells at scale {scale} does not fit in u32"))
    };
    Ok((scaled(width)?, scaled(height)?))
}

fn simulate(config: SimConfig, gravity: Vec3, ticks: u64) -> Result<Simulation> {
    let mut sim = Simulation::new(config)?;
    sim.set_gravity(gravity);
    for _ in 0..ticks {
        sim.tick();
    }
    tracing::debug!(ticks, hash = sim.state_hash(), "simulation finished");
    Ok(sim)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("pixelsand-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "sim: {}x{} grid, {} initial rows, seed {}",
                config.width, config.height, config.initial_rows, config.seed
            );
            println!("render: {}", pixelsand_render::crate_info());
            println!("input: {}", pixelsand_input::crate_info());
            println!("tools: {}", pixelsand_tools::crate_info());
        }
        Commands::Run {
            ticks,
            gravity,
            json,
            ascii,
            particle,
        } => {
            let sim = simulate(config, gravity.vector(), ticks)?;
            let summary = SimInspector::summary(&sim);
            let row_fill = SimInspector::row_fill(&sim);
            let info = particle.and_then(|i| SimInspector::inspect_particle(&sim, i));
            if json {
                let report = serde_json::json!({
                    "summary": summary,
                    "row_fill": row_fill,
                    "particle": info,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{summary}");
                println!("Row fill (bottom first): {row_fill:?}");
                match (particle, &info) {
                    (_, Some(info)) => println!("{info}"),
                    (Some(index), None) => tracing::warn!("no particle at index {index}"),
                    (None, None) => {}
                }
            }
            if ascii {
                print!("{}", DebugTextRenderer::new().render(&sim));
            }
            if !summary.is_consistent() {
                tracing::warn!("bitmap and particle list disagree");
            }
        }
        Commands::Replay {
            ticks,
            seed,
            gravity,
        } => {
            let config = SimConfig {
                seed: seed.unwrap_or(config.seed),
                ..config
            };
            println!("Deterministic replay: seed={}, ticks={ticks}", config.seed);

            let first = simulate(config.clone(), gravity.vector(), ticks)?;
            let second = simulate(config, gravity.vector(), ticks)?;
            let (h1, h2) = (first.state_hash(), second.state_hash());

            println!("Run 1: {}", SimInspector::summary(&first));
            println!("Run 2: {}", SimInspector::summary(&second));
            if h1 != h2 {
                anyhow::bail!("replay mismatch: {h1:#018x} != {h2:#018x}");
            }
            println!("Match: OK");
        }
        Commands::Render {
            ticks,
            gravity,
            out,
            scale,
        } => {
            let sim = simulate(config, gravity.vector(), ticks)?;
            let (width, height) = render_size(sim.width(), sim.height(), scale)?;
            let fb = SoftwareRenderer::new(width, height)?.render(&sim)?;
            let img = image::RgbaImage::from_raw(width, height, fb.to_rgba8())
                .context("framebuffer size does not match image dimensions")?;
            img.save(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!("rendered {width}x{height} frame to {}", out.display());
        }
    }

    Ok(())
}
