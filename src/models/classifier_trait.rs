use crate::error::PipelineError;
use crate::matrix::FeatureMatrix;

/// Contract every classifier backend satisfies. The pipeline fits exactly
/// once on the complete encoded training matrix and afterwards only calls
/// `predict`, so implementations may treat fitted state as immutable. The
/// `Send + Sync` bound lets the fitted handle be shared across threads.
pub trait ClassifierModel: Send + Sync {
    /// Fit on the full training matrix and 0/1 label vector.
    fn fit(&mut self, x: &FeatureMatrix, y: &[i32]) -> Result<(), PipelineError>;

    /// Predict one 0/1 label per input row. The input width must match
    /// what was seen at fit time.
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<i32>, PipelineError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
