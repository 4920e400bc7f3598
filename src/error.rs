use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Error taxonomy for the satisfaction pipeline.
///
/// `DataUnavailable`, `MalformedTable` and `DegenerateLabels` occur during
/// the one-time initialization phase and abort it. `UnknownCategory`,
/// `SchemaMismatch` and `NotFitted` are per-request: they reject a single
/// prediction and leave the fitted state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Dataset path missing/unreadable, or its contents not parseable as CSV.
    DataUnavailable { path: PathBuf, detail: String },
    /// Loaded table cannot form a valid training matrix.
    MalformedTable { detail: String },
    /// Label outside the set observed when the column's encoder was built.
    UnknownCategory { column: String, label: String },
    /// Input does not line up with the fitted feature schema.
    SchemaMismatch { detail: String },
    /// Predict called before fit.
    NotFitted,
    /// Label vector unusable for fitting.
    DegenerateLabels { distinct: usize },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::DataUnavailable { path, detail } => {
                write!(f, "dataset unavailable at {}: {}", path.display(), detail)
            }
            PipelineError::MalformedTable { detail } => {
                write!(f, "malformed training table: {}", detail)
            }
            PipelineError::UnknownCategory { column, label } => {
                write!(f, "unknown category '{}' for column '{}'", label, column)
            }
            PipelineError::SchemaMismatch { detail } => {
                write!(f, "feature schema mismatch: {}", detail)
            }
            PipelineError::NotFitted => write!(f, "classifier has not been fitted"),
            PipelineError::DegenerateLabels { distinct } => write!(
                f,
                "cannot fit classifier: {} distinct label value(s) in training data",
                distinct
            ),
        }
    }
}

impl Error for PipelineError {}
