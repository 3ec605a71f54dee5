//! Experiment Table
//!
//! Ordered, immutable table of benchmark measurements keyed by
//! group → difficulty → capacity. Iteration order is insertion order at every
//! level, which is what lines category labels up with series values when the
//! table is flattened.

use indexmap::IndexMap;

use crate::nc_error::TableError;

/// Capacity label → measurement
pub type CapacityMap = IndexMap<String, Measurement>;

/// Difficulty label → capacities
pub type DifficultyMap = IndexMap<String, CapacityMap>;

/// Group label → difficulties
pub type GroupMap = IndexMap<String, DifficultyMap>;

/// One recorded (throughput, blocktime) pair
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measurement {
    /// Transactions per second
    pub throughput: f64,

    /// Average time to produce one block, in seconds
    pub blocktime: f64,
}

impl Measurement {
    pub fn new(throughput: f64, blocktime: f64) -> Self {
        Self {
            throughput,
            blocktime,
        }
    }
}

/// Nested table of measurements
///
/// Only constructible through [`TableBuilder`], deserialization, or
/// [`ExperimentTable::reference`], all of which guarantee every value is finite
/// and non-negative.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GroupMap", into = "GroupMap")]
pub struct ExperimentTable {
    groups: GroupMap,
}

impl ExperimentTable {
    /// Measurements collected on the noobcash testnet
    ///
    /// Two cluster sizes (`5nodes`, `10nodes`), mining difficulties `D4` and
    /// `D5`, block capacities of 1, 5 and 10 transactions.
    pub fn reference() -> Self {
        let rows: [(&str, &str, &str, f64, f64); 12] = [
            ("5nodes", "D4", "C1", 0.61703, 1.62046),
            ("5nodes", "D4", "C5", 0.661203828, 7.56592526),
            ("5nodes", "D4", "C10", 0.732586, 13.6926268),
            ("5nodes", "D5", "C1", 0.0575, 17.3806),
            ("5nodes", "D5", "C5", 0.049, 103.0),
            ("5nodes", "D5", "C10", 0.064, 156.25),
            ("10nodes", "D4", "C1", 0.75, 1.333),
            ("10nodes", "D4", "C5", 0.318, 5.723),
            ("10nodes", "D4", "C10", 0.46242774, 21.625),
            ("10nodes", "D5", "C1", 0.07797271, 12.825),
            ("10nodes", "D5", "C5", 0.058, 84.0),
            ("10nodes", "D5", "C10", 0.056, 138.84),
        ];

        let mut groups = GroupMap::new();
        for (group, difficulty, capacity, throughput, blocktime) in rows {
            insert(
                &mut groups,
                group,
                difficulty,
                capacity,
                Measurement::new(throughput, blocktime),
            );
        }

        Self { groups }
    }

    /// Difficulties recorded for `group`
    pub fn group(&self, group: &str) -> Option<&DifficultyMap> {
        self.groups.get(group)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Group labels in table order
    pub fn group_labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl TryFrom<GroupMap> for ExperimentTable {
    type Error = TableError;

    fn try_from(groups: GroupMap) -> Result<Self, Self::Error> {
        validate(&groups)?;
        Ok(Self { groups })
    }
}

impl From<ExperimentTable> for GroupMap {
    fn from(table: ExperimentTable) -> Self {
        table.groups
    }
}

/// Incremental construction of an [`ExperimentTable`]
///
/// Labels keep the order of their first insertion. Re-inserting the same
/// (group, difficulty, capacity) replaces the measurement in place.
#[derive(Debug, Default)]
pub struct TableBuilder {
    groups: GroupMap,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurement(
        mut self,
        group: &str,
        difficulty: &str,
        capacity: &str,
        measurement: Measurement,
    ) -> Self {
        insert(&mut self.groups, group, difficulty, capacity, measurement);
        self
    }

    pub fn build(self) -> Result<ExperimentTable, TableError> {
        ExperimentTable::try_from(self.groups)
    }
}

fn insert(
    groups: &mut GroupMap,
    group: &str,
    difficulty: &str,
    capacity: &str,
    measurement: Measurement,
) {
    groups
        .entry(group.to_string())
        .or_default()
        .entry(difficulty.to_string())
        .or_default()
        .insert(capacity.to_string(), measurement);
}

fn validate(groups: &GroupMap) -> Result<(), TableError> {
    for (group, difficulties) in groups {
        for (difficulty, capacities) in difficulties {
            for (capacity, m) in capacities {
                for (field, value) in [("throughput", m.throughput), ("blocktime", m.blocktime)] {
                    if !value.is_finite() || value < 0.0 {
                        return Err(TableError::InvalidMeasurement {
                            group: group.clone(),
                            difficulty: difficulty.clone(),
                            capacity: capacity.clone(),
                            field,
                            value,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
