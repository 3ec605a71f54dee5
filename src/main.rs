use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use nc_report::{flatten_groups, print_series, render, ExperimentTable, RenderError};

const GROUPS: [&str; 2] = ["5nodes", "10nodes"];
const OUTPUT: &str = "plot.svg";

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .ok();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RenderError> {
    let table = ExperimentTable::reference();

    let series = flatten_groups(&table, &GROUPS)?;
    print_series(&series);

    info!("rendering {}", OUTPUT);
    render(&table, &GROUPS, OUTPUT)
}
