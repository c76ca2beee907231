use std::io::{self, Write};
use std::path::{Path, PathBuf};

use aircraft_sizing::atmosphere::StandardAtmosphere;
use aircraft_sizing::config::{load_aircraft_configs, load_mission, select_aircraft};
use aircraft_sizing::export::{envelope, summary, writer_for_path};
use aircraft_sizing::mission::convergence::ConvergenceStatus;
use aircraft_sizing::mission::report::AircraftDesign;
use aircraft_sizing::{SizingCase, size_aircraft};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

/// Size a fixed-wing aircraft: converge wing loading, thrust-to-weight, and takeoff weight
/// for a mission profile.
#[derive(Parser, Debug)]
#[command(author, version, about = "Conceptual aircraft sizing (mission + constraint analysis)")]
struct Cli {
    /// Aircraft constants: TOML file, YAML list, or directory of TOML files
    #[arg(long, default_value = "configs/aircraft")]
    aircraft: PathBuf,

    /// Aircraft name within the catalog (defaults to the first entry)
    #[arg(long)]
    name: Option<String>,

    /// Mission profile (YAML or TOML)
    #[arg(long, default_value = "configs/missions/transport.yaml")]
    mission: PathBuf,

    /// Write the constraint envelope as CSV (use '-' for stdout)
    #[arg(long)]
    envelope_csv: Option<PathBuf>,

    /// Write a JSON design summary (use '-' for stdout)
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Fail when a convergence loop exhausts its iteration budget
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Log every loop iteration
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::builder()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .try_init()?;

    let catalog = load_aircraft_configs(&cli.aircraft)
        .with_context(|| format!("loading aircraft from {}", cli.aircraft.display()))?;
    let aircraft = select_aircraft(&catalog, cli.name.as_deref())?;
    let mission = load_mission(&cli.mission)
        .with_context(|| format!("loading mission from {}", cli.mission.display()))?;

    let atmosphere = StandardAtmosphere::new();
    let mut case = SizingCase::from_configs(&aircraft, &mission, &atmosphere)?;
    if cli.strict {
        case = case.strict();
    }
    let result = size_aircraft(&case, &atmosphere)?;
    let design = &result.design;

    // Exports on stdout own it; the report moves to stderr.
    let to_stdout = |path: &Option<PathBuf>| path.as_deref() == Some(Path::new("-"));
    if to_stdout(&cli.envelope_csv) && to_stdout(&cli.summary_json) {
        anyhow::bail!("--envelope-csv and --summary-json cannot both write to stdout");
    }
    if to_stdout(&cli.envelope_csv) || to_stdout(&cli.summary_json) {
        print_design(&mut io::stderr().lock(), design)?;
    } else {
        print_design(&mut io::stdout().lock(), design)?;
    }

    if let Some(path) = &cli.envelope_csv {
        let writer = writer_for_path(path)?;
        envelope::write_csv(writer, &result.beta_loop.envelope)
            .with_context(|| format!("writing envelope CSV to {}", path.display()))?;
    }
    if let Some(path) = &cli.summary_json {
        let writer = writer_for_path(path)?;
        summary::write_json(writer, &result)
            .with_context(|| format!("writing summary JSON to {}", path.display()))?;
    }

    Ok(())
}

fn print_design(out: &mut dyn Write, design: &AircraftDesign) -> io::Result<()> {
    let weights = &design.weights;
    writeln!(out, "=== Aircraft Design ===")?;
    writeln!(out, "Aircraft        : {}", design.aircraft)?;
    writeln!(out, "Mission         : {} ({} phases)", design.mission, design.phases.len())?;
    writeln!(out, "Takeoff weight  : {:.1} lbf", design.takeoff_weight_lbf)?;
    writeln!(out, "Wing loading    : {:.2} lb/ft²", design.wing_loading)?;
    writeln!(out, "Thrust/weight   : {:.4}", design.thrust_to_weight)?;
    writeln!(
        out,
        "Wing area       : {:.1} ft², span {:.1} ft",
        design.wing_area_ft2, design.wing_span_ft
    )?;
    writeln!(out, "Thrust (SLS)    : {:.1} lbf", design.thrust_lbf)?;
    writeln!(
        out,
        "Fuel weight     : {:.1} lbf ({:.3} of WTO)",
        design.fuel_weight_lbf,
        weights.fuel_fraction()
    )?;
    writeln!(
        out,
        "Empty weight    : {:.1} lbf ({:.3} of WTO)",
        design.empty_weight_lbf,
        weights.empty_fraction()
    )?;
    writeln!(out, "Final beta      : {:.5}", design.final_weight_fraction)?;
    writeln!(
        out,
        "Design driver   : {}{}",
        design.active_constraint,
        if design.landing_limited {
            " (landing-limited wing loading)"
        } else {
            ""
        }
    )?;
    writeln!(out, "Beta loop       : {}", describe(&design.beta_loop))?;
    writeln!(out, "WTO loop        : {}", describe(&design.takeoff_weight_loop))?;

    writeln!(out)?;
    writeln!(
        out,
        "{:<6} {:<28} {:>9} {:>12} {:>10}",
        "phase", "name", "beta_end", "weight_lbf", "fuel_lbf"
    )?;
    for phase in &design.phases {
        writeln!(
            out,
            "{:<6} {:<28} {:>9.5} {:>12.1} {:>10.1}",
            phase.phase.as_str(),
            phase.name.trim(),
            phase.end_weight_fraction,
            phase.end_weight_lbf,
            phase.fuel_burned_lbf
        )?;
    }
    out.flush()
}

fn describe(status: &ConvergenceStatus) -> String {
    match status {
        ConvergenceStatus::Converged { iterations } => {
            format!("converged in {iterations} iterations")
        }
        ConvergenceStatus::Exhausted {
            iterations,
            residual,
        } => format!("NOT converged after {iterations} iterations (residual {residual:.3e})"),
    }
}
