//! Report file format
//!
//! A report file is a YAML document bundling an experiment table with the
//! settings for rendering it:
//!
//! ```yaml
//! meta:
//!   name: Noobcash testnet
//! report:
//!   output: plot.svg
//!   groups: [5nodes, 10nodes]
//!   csv: series.csv
//!   chart: { title: "Throughput vs block time" }
//! table:
//!   5nodes:
//!     D4:
//!       C1: { throughput: 0.61703, blocktime: 1.62046 }
//! ```
//!
//! Relative output paths resolve against the directory holding the report file.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::nc_error::TableError;
use crate::nc_render::ChartConfig;
use crate::nc_table::ExperimentTable;

/// Parsed report file
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ReportFile {
    /// Report metadata
    #[serde(default)]
    pub meta: ReportMeta,

    /// Rendering settings
    #[serde(default)]
    pub report: ReportSettings,

    /// Measurements
    pub table: ExperimentTable,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ReportMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Chart destination (default: plot.svg)
    pub output: PathBuf,

    /// Groups to compare (empty = every group, in table order)
    pub groups: Vec<String>,

    /// Optional CSV export of the flattened series
    pub csv: Option<PathBuf>,

    /// Chart appearance
    pub chart: ChartConfig,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("plot.svg"),
            groups: Vec::new(),
            csv: None,
            chart: ChartConfig::default(),
        }
    }
}

impl ReportFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TableError> {
        serde_yaml::from_str(yaml).map_err(|source| TableError::Parse { path: None, source })
    }

    /// Read and parse the report file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let report: ReportFile = serde_yaml::from_str(&yaml).map_err(|source| TableError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;

        debug!(
            "loaded {} with {} group(s)",
            path.display(),
            report.table.len()
        );
        Ok(report)
    }

    /// Groups to render, in order
    pub fn groups(&self) -> Vec<String> {
        if self.report.groups.is_empty() {
            self.table.group_labels().map(str::to_string).collect()
        } else {
            self.report.groups.clone()
        }
    }

    /// Chart destination, resolved against `base_dir`
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.report.output)
    }

    /// CSV destination, resolved against `base_dir`
    pub fn csv_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.report.csv.as_ref().map(|p| base_dir.join(p))
    }
}
