//! Report Renderer
//!
//! Draws the throughput / block time comparison chart: one categorical x-axis
//! of `"<difficulty>.<capacity>"` positions, throughput on the left y-axis and
//! average block time on a secondary right y-axis, one line per group and
//! metric.
//!
//! The chart is drawn into memory and only then moved onto the output path, so
//! a failed render never leaves a partial file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::prelude::*;

use crate::nc_error::RenderError;
use crate::nc_series::{flatten_groups, GroupSeries};
use crate::nc_table::ExperimentTable;

pub const THROUGHPUT_AXIS_LABEL: &str = "Throughput (transactions/sec)";
pub const BLOCKTIME_AXIS_LABEL: &str = "Average block time (sec)";
pub const CATEGORY_AXIS_LABEL: &str = "Difficulty.Capacity";

/// Line colors for throughput, cycled per group
const THROUGHPUT_PALETTE: [RGBColor; 4] = [
    RGBColor(144, 238, 144), // light green
    RGBColor(0, 100, 0),     // dark green
    RGBColor(60, 179, 113),  // medium sea green
    RGBColor(85, 107, 47),   // dark olive green
];

/// Line colors for block time, cycled per group
const BLOCKTIME_PALETTE: [RGBColor; 4] = [
    RGBColor(255, 0, 0),   // red
    RGBColor(139, 0, 0),   // dark red
    RGBColor(255, 99, 71), // tomato
    RGBColor(128, 0, 32),  // burgundy
];

const MARKER_SIZE: i32 = 4;
const LINE_WIDTH: u32 = 2;
const AXIS_HEADROOM: f64 = 1.1;

/// Chart appearance settings
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart title (None = derived from the group labels)
    pub title: Option<String>,

    /// Width in pixels (default: 1024)
    pub width: u32,

    /// Height in pixels (default: 640)
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 1024,
            height: 640,
        }
    }
}

impl ChartConfig {
    /// Title for a chart comparing `series`
    pub fn resolve_title(&self, series: &[GroupSeries]) -> String {
        self.title.clone().unwrap_or_else(|| {
            let groups: Vec<&str> = series.iter().map(|s| s.group.as_str()).collect();
            format!(
                "Transaction throughput & Average block time for {}",
                groups.join("/")
            )
        })
    }
}

/// Renders experiment tables to SVG charts
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    config: ChartConfig,
}

impl ReportRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Render `groups` of `table` into an SVG chart at `out_path`
    ///
    /// # Errors
    /// * `UnsupportedFormat` - `out_path` does not end in `.svg`
    /// * `NoGroups`, `MissingLabel`, `EmptyGroup`, `CategoryMismatch` - see
    ///   [`flatten_groups`]
    /// * `IoFailure` - the output could not be created, written or moved into place
    /// * `Draw` - the plotting backend failed
    pub fn render<S: AsRef<str>>(
        &self,
        table: &ExperimentTable,
        groups: &[S],
        out_path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let out_path = out_path.as_ref();
        check_format(out_path)?;

        let series = flatten_groups(table, groups)?;

        // Acquire the output location before drawing so an unwritable path
        // fails fast.
        let mut pending = PendingFile::create(out_path)?;

        let mut svg = String::new();
        self.draw(&series, &mut svg)?;

        pending.write_all(svg.as_bytes())?;
        pending.commit()?;

        info!(
            "rendered {} series over {} categories to {}",
            series.len() * 2,
            series[0].len(),
            out_path.display()
        );
        Ok(())
    }

    /// Draw the chart for already-flattened `series` as SVG text into `svg`
    ///
    /// `series` must be non-empty and share one category axis, as produced by
    /// [`flatten_groups`].
    pub fn draw(&self, series: &[GroupSeries], svg: &mut String) -> Result<(), RenderError> {
        let reference = series.first().ok_or(RenderError::NoGroups)?;
        let categories = &reference.categories;
        let count = categories.len() as i32;

        let throughput_max = axis_max(series.iter().flat_map(|s| s.throughput.iter().copied()));
        let blocktime_max = axis_max(series.iter().flat_map(|s| s.blocktime.iter().copied()));
        let title = self.config.resolve_title(series);

        debug!(
            "drawing {}x{} chart, throughput axis 0..{:.3}, block time axis 0..{:.3}",
            self.config.width, self.config.height, throughput_max, blocktime_max
        );

        let root =
            SVGBackend::with_string(svg, (self.config.width, self.config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 20))
            .margin(15)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Right, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(-1i32..count, 0f64..throughput_max)
            .map_err(draw_error)?
            .set_secondary_coord(-1i32..count, 0f64..blocktime_max);

        let category_label = |x: &i32| -> String {
            usize::try_from(*x)
                .ok()
                .and_then(|i| categories.get(i))
                .cloned()
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(categories.len() + 2)
            .x_label_formatter(&category_label)
            .x_desc(CATEGORY_AXIS_LABEL)
            .y_desc(THROUGHPUT_AXIS_LABEL)
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(draw_error)?;

        chart
            .configure_secondary_axes()
            .y_desc(BLOCKTIME_AXIS_LABEL)
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(draw_error)?;

        for (index, group) in series.iter().enumerate() {
            let color = THROUGHPUT_PALETTE[index % THROUGHPUT_PALETTE.len()];
            let points = positions(&group.throughput);

            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(LINE_WIDTH),
                ))
                .map_err(draw_error)?
                .label(format!("Throughput: {}", group.group))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
                });
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|p| Circle::new(*p, MARKER_SIZE, color.filled())),
                )
                .map_err(draw_error)?;
        }

        for (index, group) in series.iter().enumerate() {
            let color = BLOCKTIME_PALETTE[index % BLOCKTIME_PALETTE.len()];
            let points = positions(&group.blocktime);

            chart
                .draw_secondary_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(LINE_WIDTH),
                ))
                .map_err(draw_error)?
                .label(format!("Block time: {}", group.group))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
                });
            chart
                .draw_secondary_series(
                    points
                        .iter()
                        .map(|p| Circle::new(*p, MARKER_SIZE, color.filled())),
                )
                .map_err(draw_error)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

/// Render with the default chart configuration
pub fn render<S: AsRef<str>>(
    table: &ExperimentTable,
    groups: &[S],
    out_path: impl AsRef<Path>,
) -> Result<(), RenderError> {
    ReportRenderer::default().render(table, groups, out_path)
}

fn check_format(path: &Path) -> Result<(), RenderError> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if is_svg {
        Ok(())
    } else {
        Err(RenderError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

fn positions(values: &[f64]) -> Vec<(i32, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as i32, *v))
        .collect()
}

/// Upper bound of a y-axis holding `values`
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * AXIS_HEADROOM
    } else {
        1.0
    }
}

fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

// ============================================================================
// Atomic output
// ============================================================================

/// Output file staged at a hidden sibling path until committed
///
/// Dropping an uncommitted `PendingFile` removes the staged file.
struct PendingFile {
    target: PathBuf,
    staging: PathBuf,
    file: Option<File>,
}

impl PendingFile {
    fn create(target: &Path) -> Result<Self, RenderError> {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = target.with_file_name(format!(".{}.tmp", name));

        let file = File::create(&staging).map_err(|source| RenderError::IoFailure {
            path: target.to_path_buf(),
            source,
        })?;

        Ok(Self {
            target: target.to_path_buf(),
            staging,
            file: Some(file),
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        let result = match self.file.as_mut() {
            Some(file) => file.write_all(bytes),
            None => Ok(()),
        };
        result.map_err(|source| self.io_failure(source))
    }

    fn commit(mut self) -> Result<(), RenderError> {
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|source| self.io_failure(source))?;
        }
        fs::rename(&self.staging, &self.target).map_err(|source| self.io_failure(source))?;
        Ok(())
    }

    fn io_failure(&self, source: std::io::Error) -> RenderError {
        RenderError::IoFailure {
            path: self.target.clone(),
            source,
        }
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        self.file.take();
        if self.staging.exists() {
            let _ = fs::remove_file(&self.staging);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nc_table::{Measurement, TableBuilder};

    fn reference_groups() -> [&'static str; 2] {
        ["5nodes", "10nodes"]
    }

    fn staged_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .collect()
    }

    #[test]
    fn test_render_reference_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");

        render(&ExperimentTable::reference(), &reference_groups(), &path).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(THROUGHPUT_AXIS_LABEL));
        assert!(svg.contains(BLOCKTIME_AXIS_LABEL));
        assert!(svg.contains(CATEGORY_AXIS_LABEL));
        for label in [
            "Throughput: 5nodes",
            "Throughput: 10nodes",
            "Block time: 5nodes",
            "Block time: 10nodes",
        ] {
            assert!(svg.contains(label), "missing legend entry {}", label);
        }
        for category in ["D4.C1", "D4.C10", "D5.C5"] {
            assert!(svg.contains(category), "missing category {}", category);
        }
        assert!(staged_files(dir.path()).is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let table = ExperimentTable::reference();

        render(&table, &reference_groups(), &path).unwrap();
        let first = fs::read(&path).unwrap();
        render(&table, &reference_groups(), &path).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_render_missing_label_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let table = TableBuilder::new()
            .measurement("A", "D1", "C1", Measurement::new(0.5, 2.0))
            .build()
            .unwrap();

        let result = render(&table, &["A", "Z"], &path);

        assert!(matches!(result, Err(RenderError::MissingLabel { .. })));
        assert!(!path.exists());
        assert!(staged_files(dir.path()).is_empty());
    }

    #[test]
    fn test_render_category_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let table = TableBuilder::new()
            .measurement("A", "D1", "C1", Measurement::new(0.5, 2.0))
            .measurement("A", "D1", "C2", Measurement::new(0.5, 2.0))
            .measurement("B", "D1", "C1", Measurement::new(0.5, 2.0))
            .build()
            .unwrap();

        let result = render(&table, &["A", "B"], &path);

        assert!(matches!(result, Err(RenderError::CategoryMismatch { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let path = missing.join("plot.svg");

        let result = render(&ExperimentTable::reference(), &reference_groups(), &path);

        match result {
            Err(RenderError::IoFailure { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected IoFailure, got {:?}", other),
        }
        assert!(!path.exists());
        assert!(!missing.exists());
    }

    #[test]
    fn test_render_rejects_non_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.pdf");

        let result = render(&ExperimentTable::reference(), &reference_groups(), &path);

        assert!(matches!(result, Err(RenderError::UnsupportedFormat { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_single_group_single_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.SVG");
        let table = TableBuilder::new()
            .measurement("A", "D1", "C1", Measurement::new(0.5, 2.0))
            .build()
            .unwrap();

        render(&table, &["A"], &path).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("D1.C1"));
        assert!(svg.contains("Throughput: A"));
        assert!(svg.contains("Block time: A"));
    }

    #[test]
    fn test_render_all_zero_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.svg");
        let table = TableBuilder::new()
            .measurement("A", "D1", "C1", Measurement::new(0.0, 0.0))
            .measurement("A", "D1", "C2", Measurement::new(0.0, 0.0))
            .build()
            .unwrap();

        render(&table, &["A"], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_custom_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titled.svg");
        let renderer = ReportRenderer::new(ChartConfig {
            title: Some("Noobcash testnet".to_string()),
            ..ChartConfig::default()
        });

        renderer
            .render(&ExperimentTable::reference(), &reference_groups(), &path)
            .unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Noobcash testnet"));
    }

    #[test]
    fn test_default_title_joins_groups() {
        let table = ExperimentTable::reference();
        let series = flatten_groups(&table, &reference_groups()).unwrap();

        assert_eq!(
            ChartConfig::default().resolve_title(&series),
            "Transaction throughput & Average block time for 5nodes/10nodes"
        );
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max([1.0, 10.0, 5.0].into_iter()), 10.0 * AXIS_HEADROOM);
        assert_eq!(axis_max([0.0, 0.0].into_iter()), 1.0);
        assert_eq!(axis_max(std::iter::empty()), 1.0);
    }
}
