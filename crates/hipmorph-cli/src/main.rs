//! hipmorph CLI: command-line interface for landmark-based hip measurements.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "hipmorph")]
#[command(about = "Measure hip morphology (alpha angle, triangular index, CEA, ...) from landmarks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure one hip from a landmark case (JSON).
    Measure(CliMeasureArgs),

    /// Fit the femoral head circle and print all nine candidate fits.
    FitCircle {
        /// Path to a JSON file with `points` and optional `indices`.
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the default measurement configuration (JSON).
    PrintConfig,
}

#[derive(Debug, Clone, Args)]
struct CliMeasureArgs {
    /// Path to the landmark case (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the measurement report (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Measurement configuration (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmarks at or beyond radius × margin count as outside the head.
    #[arg(long)]
    point_margin: Option<f64>,

    /// Resampled boundary points at or beyond radius × margin count as outside.
    #[arg(long)]
    spline_margin: Option<f64>,

    /// Boundary resampling step in pixels (y).
    #[arg(long)]
    sample_step: Option<f64>,

    /// Boundary interpolation.
    #[arg(long, value_enum)]
    degree: Option<SplineDegreeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplineDegreeArg {
    Linear,
    Cubic,
}

impl SplineDegreeArg {
    fn to_core(self) -> hipmorph::SplineDegree {
        match self {
            Self::Linear => hipmorph::SplineDegree::Linear,
            Self::Cubic => hipmorph::SplineDegree::Cubic,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct FitCircleInput {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    indices: Option<Vec<usize>>,
}

impl CliMeasureArgs {
    fn to_config(&self) -> CliResult<hipmorph::MeasureConfig> {
        let mut config = match &self.config {
            Some(path) => read_json::<hipmorph::MeasureConfig>(path)?,
            None => hipmorph::MeasureConfig::default(),
        };
        if let Some(margin) = self.point_margin {
            config.alpha.point_margin = margin;
        }
        if let Some(margin) = self.spline_margin {
            config.alpha.spline_margin = margin;
        }
        if let Some(step) = self.sample_step {
            config.set_sample_step(step);
        }
        if let Some(degree) = self.degree {
            config.set_spline_degree(degree.to_core());
        }
        Ok(config)
    }
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
        Commands::Measure(args) => run_measure(&args),
        Commands::FitCircle { input } => run_fit_circle(&input),
        Commands::PrintConfig => run_print_config(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(value)
}

// ── measure ────────────────────────────────────────────────────────────

fn run_measure(args: &CliMeasureArgs) -> CliResult<()> {
    tracing::info!("Loading landmarks: {}", args.input.display());
    let landmarks: hipmorph::HipLandmarks = read_json(&args.input)?;
    let config = args.to_config()?;
    tracing::debug!(?config, "measurement config");

    let report = hipmorph::measure_hip(&landmarks, &config)?;

    let (start_trim, end_trim) = hipmorph::TRIM_CANDIDATES[report.head.chosen];
    tracing::info!(
        "Head circle: center=({:.2}, {:.2}) r={:.2} rms={:.3} trim=({}, {})",
        report.head.circle.cx,
        report.head.circle.cy,
        report.head.circle.radius,
        report.head.circle.rms_error,
        start_trim,
        end_trim
    );
    match &report.alpha_angle {
        hipmorph::Measurement::Measured { value } => {
            tracing::info!("Alpha angle: {:.1} deg", value.angle)
        }
        hipmorph::Measurement::NotFound => tracing::info!("Alpha angle: no crossing"),
        hipmorph::Measurement::Failed { message, .. } => {
            tracing::warn!("Alpha angle failed: {}", message)
        }
    }

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Report written to {}", args.out.display());
    Ok(())
}

// ── fit-circle ─────────────────────────────────────────────────────────

fn run_fit_circle(input: &Path) -> CliResult<()> {
    let data: FitCircleInput = read_json(input)?;
    let indices = data
        .indices
        .unwrap_or_else(|| (0..data.points.len()).collect());
    let selection = hipmorph::select_best_circle(
        &indices,
        &data.points,
        &hipmorph::SelectionConfig::default(),
    )?;

    println!("candidate  trim    cx          cy          radius      rms         ranks");
    for (i, cand) in selection.candidates.iter().enumerate() {
        let marker = if i == selection.chosen { "*" } else { " " };
        match (&cand.circle, cand.error_rank, cand.radius_rank) {
            (Some(c), Some(er), Some(rr)) => println!(
                "{}{:<8}  ({},{})  {:<10.4}  {:<10.4}  {:<10.4}  {:<10.6}  {}+{}",
                marker, i, cand.start_trim, cand.end_trim, c.cx, c.cy, c.radius, c.rms_error, er, rr
            ),
            _ => println!(
                "{}{:<8}  ({},{})  fit failed",
                marker, i, cand.start_trim, cand.end_trim
            ),
        }
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&selection.circle)?);
    Ok(())
}

// ── print-config ───────────────────────────────────────────────────────

fn run_print_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&hipmorph::MeasureConfig::default())?;
    println!("{}", json);
    Ok(())
}
