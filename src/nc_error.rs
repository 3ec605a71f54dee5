//! Error types for table construction and report rendering

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while rendering a report
#[derive(Debug)]
pub enum RenderError {
    /// No group labels were requested
    NoGroups,

    /// A requested group label is absent from the table
    MissingLabel { group: String },

    /// A group has no (difficulty, capacity) pairs to plot
    EmptyGroup { group: String },

    /// Flattened categories of `group` differ from those of `reference`
    CategoryMismatch {
        reference: String,
        group: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Output path does not name a supported chart format
    UnsupportedFormat { path: PathBuf },

    /// Plotting backend failure
    Draw(String),

    /// Output path could not be written
    IoFailure { path: PathBuf, source: io::Error },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoGroups => write!(f, "no groups requested"),
            RenderError::MissingLabel { group } => {
                write!(f, "group '{}' is not present in the table", group)
            }
            RenderError::EmptyGroup { group } => {
                write!(f, "group '{}' has no measurements", group)
            }
            RenderError::CategoryMismatch {
                reference,
                group,
                expected,
                found,
            } => {
                if expected.len() != found.len() {
                    write!(
                        f,
                        "group '{}' has {} categories, '{}' has {}",
                        group,
                        found.len(),
                        reference,
                        expected.len()
                    )
                } else {
                    write!(
                        f,
                        "group '{}' categories {:?} do not match '{}' categories {:?}",
                        group, found, reference, expected
                    )
                }
            }
            RenderError::UnsupportedFormat { path } => {
                write!(f, "unsupported chart format: {} (expected .svg)", path.display())
            }
            RenderError::Draw(msg) => write!(f, "drawing failed: {}", msg),
            RenderError::IoFailure { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::IoFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while building or loading an experiment table
#[derive(Debug)]
pub enum TableError {
    /// A measurement value is negative or not finite
    InvalidMeasurement {
        group: String,
        difficulty: String,
        capacity: String,
        field: &'static str,
        value: f64,
    },

    /// Report file could not be read
    Read { path: PathBuf, source: io::Error },

    /// Report file is not valid YAML for the report schema
    Parse {
        path: Option<PathBuf>,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidMeasurement {
                group,
                difficulty,
                capacity,
                field,
                value,
            } => write!(
                f,
                "invalid {} {} at {}/{}/{} (must be finite and non-negative)",
                field, value, group, difficulty, capacity
            ),
            TableError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            TableError::Parse {
                path: Some(path),
                source,
            } => write!(f, "failed to parse {}: {}", path.display(), source),
            TableError::Parse { path: None, source } => {
                write!(f, "failed to parse report: {}", source)
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Read { source, .. } => Some(source),
            TableError::Parse { source, .. } => Some(source),
            TableError::InvalidMeasurement { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_category_mismatch_reports_counts() {
        let err = RenderError::CategoryMismatch {
            reference: "5nodes".to_string(),
            group: "10nodes".to_string(),
            expected: vec!["D4.C1".to_string(), "D4.C5".to_string()],
            found: vec!["D4.C1".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "group '10nodes' has 1 categories, '5nodes' has 2"
        );
    }

    #[test]
    fn test_io_failure_exposes_source() {
        let err = RenderError::IoFailure {
            path: PathBuf::from("/missing/plot.svg"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };

        assert!(err.source().is_some());
        assert!(err.to_string().contains("/missing/plot.svg"));
    }

    #[test]
    fn test_invalid_measurement_names_location() {
        let err = TableError::InvalidMeasurement {
            group: "A".to_string(),
            difficulty: "D1".to_string(),
            capacity: "C1".to_string(),
            field: "throughput",
            value: -1.0,
        };

        let msg = err.to_string();
        assert!(msg.contains("throughput"));
        assert!(msg.contains("A/D1/C1"));
        assert!(err.source().is_none());
    }
}
