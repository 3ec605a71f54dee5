//! CSV export of flattened series

use std::path::Path;

use log::info;

use crate::nc_error::RenderError;
use crate::nc_series::GroupSeries;

#[derive(Debug, serde::Serialize)]
struct SeriesRow<'a> {
    group: &'a str,
    category: &'a str,
    throughput: f64,
    blocktime: f64,
}

/// Write `series` as `group,category,throughput,blocktime` rows, group-major
pub fn write_series_csv(path: impl AsRef<Path>, series: &[GroupSeries]) -> Result<(), RenderError> {
    let path = path.as_ref();
    let io_failure = |source: std::io::Error| RenderError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| io_failure(e.into()))?;

    let mut rows = 0;
    for s in series {
        for (i, category) in s.categories.iter().enumerate() {
            writer
                .serialize(SeriesRow {
                    group: &s.group,
                    category,
                    throughput: s.throughput[i],
                    blocktime: s.blocktime[i],
                })
                .map_err(|e| io_failure(e.into()))?;
            rows += 1;
        }
    }
    writer.flush().map_err(io_failure)?;

    info!("wrote {} rows to {}", rows, path.display());
    Ok(())
}
