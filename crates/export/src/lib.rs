//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod envelope {
    use std::io::{self, Write};

    use sizing_mission::constraint::{ConstraintCurve, EnvelopeAnalysis};

    pub const WING_LOADING_COLUMN: &str = "wing_loading_lb_ft2";
    pub const ENVELOPE_COLUMN: &str = "envelope";

    /// Column title of a constraint curve: `<phase> <name>` for mission phases.
    pub fn column_name(curve: &ConstraintCurve) -> String {
        match &curve.phase {
            Some(phase) => format!("{phase} {}", curve.name.trim()),
            None => curve.name.clone(),
        }
    }

    /// One row per grid point: wing loading, each curve's required T/W, then the envelope.
    pub fn write_csv<W: Write>(writer: W, analysis: &EnvelopeAnalysis) -> io::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(analysis.curves.len() + 2);
        header.push(WING_LOADING_COLUMN.to_string());
        header.extend(analysis.curves.iter().map(column_name));
        header.push(ENVELOPE_COLUMN.to_string());
        csv.write_record(&header)?;

        for (i, wing_loading) in analysis.grid.iter().enumerate() {
            let mut row = Vec::with_capacity(header.len());
            row.push(format!("{wing_loading:.4}"));
            row.extend(analysis.curves.iter().map(|c| format!("{:.6}", c.values[i])));
            row.push(format!("{:.6}", analysis.envelope[i]));
            csv.write_record(&row)?;
        }
        csv.flush()
    }
}

pub mod summary {
    use std::io::{self, Write};

    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use sizing_mission::SizingResult;
    use sizing_mission::constraint::DesignPoint;
    use sizing_mission::convergence::BetaIteration;
    use sizing_mission::report::AircraftDesign;

    #[derive(Serialize)]
    struct Summary<'a> {
        design: &'a AircraftDesign,
        unconstrained_design: DesignPoint,
        landing_wing_loading: Option<f64>,
        top_of_climb_fraction: f64,
        beta_history: &'a [BetaIteration],
        takeoff_weight_history: &'a [f64],
    }

    /// Pretty-printed JSON summary of a sizing run.
    pub fn write_json<W: Write>(writer: W, result: &SizingResult) -> io::Result<()> {
        let envelope = &result.beta_loop.envelope;
        let summary = Summary {
            design: &result.design,
            unconstrained_design: envelope.unconstrained,
            landing_wing_loading: envelope.landing_wing_loading,
            top_of_climb_fraction: envelope.top_of_climb_fraction,
            beta_history: &result.beta_loop.history,
            takeoff_weight_history: &result.takeoff_weight.history,
        };
        let mut writer = writer;
        to_writer_pretty(&mut writer, &summary)?;
        writeln!(writer)?;
        writer.flush()
    }
}
