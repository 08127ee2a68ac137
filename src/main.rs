use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hexslice::constants::{PRESSURE_AMBIENT, PRESSURE_MOD, RAD_MAJ};
use hexslice::report::{render_slice, render_sweep, render_vessel};
use hexslice::{
    build_batch, CladType, CoreSlice, MaterialRegistry, NewtonSolver, ScenarioConfig, SliceKind,
    SweepGrid, VesselSizing,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hexagonal core slice geometry and vessel sizing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one core slice and print its summary.
    Slice {
        /// Scenario file (JSON); command-line values override it.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Slice dimensionality, `2d` or `3d`.
        #[arg(long, value_parser = parse_kind)]
        kind: Option<SliceKind>,
        /// Fuel pellet radius in cm.
        #[arg(long)]
        radius: Option<f64>,
        /// Lattice pitch in cm.
        #[arg(long)]
        pitch: Option<f64>,
        /// Cladding alloy (`Zr4` or `SS316`).
        #[arg(long)]
        clad: Option<CladType>,
        /// Whether guide tubes hold control rods.
        #[arg(long)]
        rodded: Option<bool>,
        /// Write the assembled slice as JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build several scenario files and report each one's status.
    Batch {
        /// Scenario files (JSON).
        #[arg(required = true)]
        configs: Vec<PathBuf>,
    },
    /// Size the containment wall of the hexagonal vessel.
    Vessel {
        /// Pressure inside the vessel in MPa.
        #[arg(long, default_value_t = PRESSURE_MOD)]
        pressure_in: f64,
        /// Pressure outside the vessel in MPa.
        #[arg(long, default_value_t = PRESSURE_AMBIENT)]
        pressure_out: f64,
        /// Wall alloy; the allowable stress is half its yield strength.
        #[arg(long, default_value_t = CladType::Ss316)]
        clad: CladType,
        /// Major radius of the hexagonal vessel in cm.
        #[arg(long, default_value_t = RAD_MAJ)]
        major_radius: f64,
    },
    /// Sweep clad stress over fill pressure, fuel radius and clad thickness.
    Sweep,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Slice {
            config,
            kind,
            radius,
            pitch,
            clad,
            rodded,
            output,
        } => {
            // Start from the scenario file, or from the reference core of the
            // requested kind when no file is given.
            let mut scenario = match config {
                Some(path) => ScenarioConfig::from_file(&path)
                    .with_context(|| format!("failed to load scenario {}", path.display()))?,
                None => match kind {
                    Some(SliceKind::ThreeD) => ScenarioConfig::reference_3d(),
                    _ => ScenarioConfig::reference_2d(),
                },
            };
            // Command-line values win over the file.
            scenario.kind = kind.unwrap_or(scenario.kind);
            scenario.fuel_radius = radius.unwrap_or(scenario.fuel_radius);
            scenario.pitch = pitch.unwrap_or(scenario.pitch);
            scenario.clad = clad.unwrap_or(scenario.clad);
            scenario.rodded = rodded.unwrap_or(scenario.rodded);
            handle_slice(&scenario, output.as_deref())
        }
        Command::Batch { configs } => handle_batch(&configs),
        Command::Vessel {
            pressure_in,
            pressure_out,
            clad,
            major_radius,
        } => {
            // The wall is sized against half the yield strength of its alloy.
            // See: https://en.wikipedia.org/wiki/Factor_of_safety
            handle_vessel(VesselSizing::for_hexagonal_vessel(
                major_radius,
                pressure_in,
                pressure_out,
                clad.yield_strength() / 2.0,
            ))
        }
        Command::Sweep => handle_sweep(),
    }
}

fn parse_kind(value: &str) -> Result<SliceKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "2d" => Ok(SliceKind::TwoD),
        "3d" => Ok(SliceKind::ThreeD),
        other => Err(format!("unknown slice kind `{other}` (expected 2d or 3d)")),
    }
}

fn handle_slice(scenario: &ScenarioConfig, output: Option<&Path>) -> Result<()> {
    // Size the pins, place them on the lattice and wrap the lattice in its
    // containment shell. Any failure aborts this scenario only.
    let registry = MaterialRegistry::reference();
    let slice = CoreSlice::build(scenario, &registry)
        .with_context(|| format!("failed to build scenario `{}`", scenario.name))?;
    println!("{}", render_slice(&slice.summary()));

    // The JSON tree is what a transport engine exporter consumes.
    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &slice)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Geometry written to {}", path.display());
    }
    Ok(())
}

fn handle_batch(paths: &[PathBuf]) -> Result<()> {
    let scenarios = paths
        .iter()
        .map(|path| {
            ScenarioConfig::from_file(path)
                .with_context(|| format!("failed to load scenario {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let registry = MaterialRegistry::reference();

    // Scenarios build in parallel; each keeps its own result so one bad file
    // does not hide the others.
    let outcomes = build_batch(&scenarios, &registry);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(slice) => println!("{}: ok ({} cells)", outcome.name, slice.geometry().cell_count()),
            Err(error) => {
                failed += 1;
                println!("{}: failed: {error}", outcome.name);
            }
        }
    }
    // Report every scenario before failing the command as a whole.
    if failed > 0 {
        bail!("{failed} of {} scenario(s) failed", outcomes.len());
    }
    Ok(())
}

fn handle_vessel(sizing: VesselSizing) -> Result<()> {
    // Invert the thin-shell stress model for the wall thickness.
    // See: https://en.wikipedia.org/wiki/Cylinder_stress
    let sized = sizing
        .solve(&NewtonSolver::default())
        .context("failed to size the containment wall")?;
    println!("{}", render_vessel(&sized));
    Ok(())
}

fn handle_sweep() -> Result<()> {
    // Each (pressure, radius) pair needs its own gap balance before the clad
    // stresses can be evaluated across the thickness ratios.
    let grid = SweepGrid::default();
    let result = grid.run(&NewtonSolver::default());
    println!("{}", render_sweep(&grid, &result));
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
