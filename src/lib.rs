//! # ncReport - Noobcash Benchmark Reports
//!
//! Renders benchmark measurements of the noobcash blockchain (transaction
//! throughput and average block time under varying mining difficulty and block
//! capacity) as a dual-axis line chart comparing cluster sizes.
//!
//! ## Core Components
//!
//! - **ExperimentTable**: immutable, ordered group → difficulty → capacity → measurement table
//! - **GroupSeries**: a group flattened into per-category throughput / block time sequences
//! - **ReportRenderer**: draws the comparison chart as SVG and writes it atomically
//! - **ReportFile**: YAML bundle of a table and its rendering settings
//!
//! ## Usage
//!
//! ```no_run
//! use nc_report::{render, ExperimentTable};
//!
//! let table = ExperimentTable::reference();
//! render(&table, &["5nodes", "10nodes"], "plot.svg")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Report files are rendered by the `report_runner` binary, see `reports/`.

pub mod nc_csv;
pub mod nc_error;
pub mod nc_render;
pub mod nc_report_file;
pub mod nc_series;
pub mod nc_table;

// Re-export commonly used types
pub use nc_csv::write_series_csv;
pub use nc_error::{RenderError, TableError};
pub use nc_render::{render, ChartConfig, ReportRenderer};
pub use nc_report_file::{ReportFile, ReportMeta, ReportSettings};
pub use nc_series::{flatten_group, flatten_groups, print_series, GroupSeries};
pub use nc_table::{ExperimentTable, Measurement, TableBuilder};
