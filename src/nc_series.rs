//! Series flattening
//!
//! Turns the nested difficulty → capacity structure of a group into parallel
//! per-position sequences ready for plotting.

use log::debug;

use crate::nc_error::RenderError;
use crate::nc_table::ExperimentTable;

/// Flattened view of one group, difficulty-major, capacity-minor
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    /// Group label
    pub group: String,

    /// `"<difficulty>.<capacity>"` per position
    pub categories: Vec<String>,

    /// Throughput per position
    pub throughput: Vec<f64>,

    /// Block time per position
    pub blocktime: Vec<f64>,
}

impl GroupSeries {
    /// Number of flattened positions
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Flatten one group of `table`
pub fn flatten_group(table: &ExperimentTable, group: &str) -> Result<GroupSeries, RenderError> {
    let difficulties = table
        .group(group)
        .ok_or_else(|| RenderError::MissingLabel {
            group: group.to_string(),
        })?;

    let mut series = GroupSeries {
        group: group.to_string(),
        categories: Vec::new(),
        throughput: Vec::new(),
        blocktime: Vec::new(),
    };

    for (difficulty, capacities) in difficulties {
        for (capacity, m) in capacities {
            series.categories.push(format!("{}.{}", difficulty, capacity));
            series.throughput.push(m.throughput);
            series.blocktime.push(m.blocktime);
        }
    }

    Ok(series)
}

/// Flatten every requested group and check they share one category axis
///
/// The first group is the reference; every other group must produce the same
/// category labels in the same order.
pub fn flatten_groups<S: AsRef<str>>(
    table: &ExperimentTable,
    groups: &[S],
) -> Result<Vec<GroupSeries>, RenderError> {
    if groups.is_empty() {
        return Err(RenderError::NoGroups);
    }

    let mut flattened = Vec::with_capacity(groups.len());
    for group in groups {
        let series = flatten_group(table, group.as_ref())?;
        if series.is_empty() {
            return Err(RenderError::EmptyGroup {
                group: series.group,
            });
        }
        flattened.push(series);
    }

    let reference = &flattened[0];
    for other in &flattened[1..] {
        if other.categories != reference.categories {
            return Err(RenderError::CategoryMismatch {
                reference: reference.group.clone(),
                group: other.group.clone(),
                expected: reference.categories.clone(),
                found: other.categories.clone(),
            });
        }
    }

    debug!(
        "flattened {} group(s) over {} categories",
        flattened.len(),
        reference.len()
    );

    Ok(flattened)
}

/// Print throughput then block time for each group, one list per line
pub fn print_series(series: &[GroupSeries]) {
    for s in series {
        println!("{:?}", s.throughput);
        println!("{:?}", s.blocktime);
    }
}
