// Report Runner - Load and render report YAML files
//
// Usage:
//   cargo run --bin report_runner reports/noobcash.yaml
//   cargo run --bin report_runner reports/  (renders all .yaml files in directory)

use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use nc_report::{flatten_groups, print_series, write_series_csv, ReportFile, ReportRenderer};

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .ok();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <report.yaml | directory/>", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} reports/noobcash.yaml", args[0]);
        eprintln!("  {} reports/", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    let result = if path.is_file() {
        run_report_file(path)
    } else if path.is_dir() {
        run_report_directory(path)
    } else {
        Err(format!("path does not exist: {}", path.display()).into())
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run_report_directory(dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut reports: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();

    reports.sort();

    if reports.is_empty() {
        return Err(format!("no .yaml files found in {}", dir.display()).into());
    }

    info!("found {} report(s) in {}", reports.len(), dir.display());

    for (i, report_path) in reports.iter().enumerate() {
        info!("{}/{} rendering {}", i + 1, reports.len(), report_path.display());
        run_report_file(report_path)?;
    }

    Ok(())
}

fn run_report_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let report = ReportFile::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    match report.meta.name {
        Some(ref name) => info!("report: {}", name),
        None => info!("report: {}", path.display()),
    }
    if let Some(ref desc) = report.meta.description {
        info!("{}", desc);
    }

    let groups = report.groups();
    let series = flatten_groups(&report.table, &groups)?;
    print_series(&series);

    if let Some(csv_path) = report.csv_path(base_dir) {
        write_series_csv(&csv_path, &series)?;
    }

    let renderer = ReportRenderer::new(report.report.chart.clone());
    renderer.render(&report.table, &groups, report.output_path(base_dir))?;

    Ok(())
}
