// Assess a measurement file from the command line
//
// FILE holds a JSON object of parameter -> value, e.g. {"ph": 9.0, "ecoli": 0}.
// Reads stdin when FILE is omitted or "-".

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use water_assessor::{MeasurementSet, ReportFormat, RiskAssessor, SiteInfo, WaterReport, WaterSource};

#[derive(Parser, Debug)]
#[command(name = "assess_measurements")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Assess water measurements against WHO-style guidelines", long_about = None)]
struct Args {
    /// JSON measurements file ("-" or omitted reads stdin)
    path: Option<PathBuf>,

    /// Report format: html, markdown or json
    #[arg(long, short = 'f', default_value = "markdown")]
    format: ReportFormat,

    /// Name of the person submitting the sample
    #[arg(long, env = "ASSESS_NAME", default_value = "")]
    name: String,

    /// Sampling location
    #[arg(long, env = "ASSESS_LOCATION", default_value = "")]
    location: String,

    /// Water source (well, borehole, river, tap or free text)
    #[arg(long, env = "ASSESS_SOURCE", default_value = "")]
    source: String,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let input = read_input(args.path.as_ref())?;
    let values: BTreeMap<String, f64> =
        serde_json::from_str(&input).context("expected a JSON object of parameter values")?;
    let measurements = MeasurementSet::from(values);

    let assessor = RiskAssessor::with_who_guidelines();
    let assessment = assessor.assess(&measurements)?;

    let site = SiteInfo {
        name: args.name,
        location: args.location,
        source: WaterSource::parse(&args.source),
    };
    let report = WaterReport::new(site, &measurements, &assessment, assessor.table(), chrono::Utc::now());

    println!("{}", args.format.render(&report)?);
    Ok(())
}
