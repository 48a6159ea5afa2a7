//! aimlock CLI — run the targeting pipeline on images or the built-in
//! battlefield simulation.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use aimlock::{EnemyColor, Pipeline, PipelineConfig};

mod synth;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "aimlock")]
#[command(about = "Armor-plate auto-aim: detection, pose, prediction and firing solution")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Red,
    Blue,
}

impl From<ColorArg> for EnemyColor {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Red => EnemyColor::Red,
            ColorArg::Blue => EnemyColor::Blue,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once on an image file.
    Detect {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Path to write the targeting result (JSON); stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Enemy team color.
        #[arg(long, value_enum, default_value_t = ColorArg::Red)]
        enemy_color: ColorArg,

        /// Pipeline configuration JSON (overrides --enemy-color).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the pipeline over the synthetic battlefield.
    Simulate {
        /// Number of frames to process.
        #[arg(long, default_value = "300")]
        frames: usize,

        /// Enemy team color.
        #[arg(long, value_enum, default_value_t = ColorArg::Red)]
        enemy_color: ColorArg,

        /// Muzzle velocity in m/s.
        #[arg(long, default_value = "30.0")]
        bullet_speed: f64,

        /// Write one JSON result per line to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect {
            image,
            out,
            enemy_color,
            config,
        } => run_detect(&image, out.as_deref(), enemy_color, config.as_deref()),

        Commands::Simulate {
            frames,
            enemy_color,
            bullet_speed,
            out,
        } => run_simulate(frames, enemy_color, bullet_speed, out.as_deref()),
    }
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(
    image_path: &std::path::Path,
    out_path: Option<&std::path::Path>,
    enemy_color: ColorArg,
    config_path: Option<&std::path::Path>,
) -> CliResult<()> {
    tracing::info!("Loading image: {}", image_path.display());
    let frame = image::open(image_path)
        .map_err(|e| -> CliError {
            format!("failed to open image {}: {}", image_path.display(), e).into()
        })?
        .to_rgb8();
    let (w, h) = frame.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let mut config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if config_path.is_none() {
        config.enemy_color = enemy_color.into();
    }

    let mut pipeline = Pipeline::new(config);
    let result = pipeline.process(&frame);

    if result.armor_detected {
        tracing::info!(
            "Target locked: center=({:.1}, {:.1}) confidence={:.1}",
            result.center_2d[0],
            result.center_2d[1],
            result.confidence,
        );
        if result.position_solved {
            tracing::info!(
                "Range {:.0} cm, yaw {:.2} deg, pitch {:.2} deg",
                result.distance_3d,
                result.yaw_angle,
                result.pitch_angle,
            );
        }
    } else {
        tracing::info!("No target found");
    }

    let json = serde_json::to_string_pretty(&result)?;
    match out_path {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Result written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── simulate ───────────────────────────────────────────────────────────

fn run_simulate(
    frames: usize,
    enemy_color: ColorArg,
    bullet_speed: f64,
    out_path: Option<&std::path::Path>,
) -> CliResult<()> {
    let mut config = PipelineConfig::default();
    config.enemy_color = enemy_color.into();
    config.ballistics.bullet_speed_mps = bullet_speed;
    let mut pipeline = Pipeline::new(config);

    let mut sink: Option<std::io::BufWriter<std::fs::File>> = match out_path {
        Some(path) => Some(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => None,
    };

    let mut detections = 0usize;
    let mut solved = 0usize;
    let mut fire_ready = 0usize;

    for i in 0..frames {
        let tick = i as f64 * synth::TICK_STEP;
        let frame = synth::battlefield_frame(tick, pipeline.config().enemy_color);
        let result = pipeline.process(&frame);

        if result.armor_detected {
            detections += 1;
        }
        if result.position_solved {
            solved += 1;
        }
        if let Some(cmd) = Pipeline::command_for(&result) {
            fire_ready += 1;
            tracing::info!(
                "frame {i}: turret command yaw={:.2} deg pitch={:.2} deg (p={:.2})",
                cmd.yaw_deg,
                cmd.pitch_deg,
                result.hit_probability,
            );
        }

        if let Some(w) = sink.as_mut() {
            serde_json::to_writer(&mut *w, &result)?;
            writeln!(w)?;
        }
    }

    if let (Some(mut w), Some(path)) = (sink, out_path) {
        w.flush()?;
        tracing::info!("Results written to {}", path.display());
    }

    println!("simulation complete");
    println!("  frames:       {frames}");
    println!("  detections:   {detections}");
    println!("  poses solved: {solved}");
    println!("  fire-ready:   {fire_ready}");
    Ok(())
}
