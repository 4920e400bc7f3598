use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::matrix::FeatureMatrix;
use crate::models::classifier_trait::ClassifierModel;

/// Gradient Boosting Decision Tree classifier backend.
pub struct GbdtClassifier {
    model: Option<GBDT>,
    params: ModelConfig,
    n_features: usize,
}

impl GbdtClassifier {
    pub fn new(params: ModelConfig) -> Self {
        GbdtClassifier {
            model: None,
            params,
            n_features: 0,
        }
    }
}

impl ClassifierModel for GbdtClassifier {
    fn fit(&mut self, x: &FeatureMatrix, y: &[i32]) -> Result<(), PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::SchemaMismatch {
                detail: format!(
                    "feature matrix has {} rows but label vector has {}",
                    x.nrows(),
                    y.len()
                ),
            });
        }
        let mut distinct = y.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(PipelineError::DegenerateLabels {
                distinct: distinct.len(),
            });
        }

        match &self.params.model_type {
            ModelType::Gbdt {
                max_depth,
                num_boost_round,
                debug,
                training_optimization_level,
                loss_type,
            } => {
                let mut config = Config::new();

                config.set_feature_size(x.ncols());
                config.set_shrinkage(self.params.learning_rate);
                config.set_max_depth(*max_depth);
                config.set_iterations(*num_boost_round as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);
                // Sampling disabled: repeated fits on the same table must
                // produce the same ensemble.
                config.set_data_sample_ratio(1.0);
                config.set_feature_sample_ratio(1.0);

                let mut gbdt = GBDT::new(&config);

                let mut train_x = DataVec::new();
                for row in 0..x.nrows() {
                    // The LogLikelyhood loss expects labels in {-1, 1}.
                    let label = if y[row] == 1 { 1.0 } else { -1.0 };
                    train_x.push(Data::new_training_data(
                        x.row_slice(row).to_vec(),
                        1.0,
                        label,
                        None,
                    ));
                }

                gbdt.fit(&mut train_x);

                self.model = Some(gbdt);
                self.n_features = x.ncols();
                Ok(())
            }
        }
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<i32>, PipelineError> {
        let model = self.model.as_ref().ok_or(PipelineError::NotFitted)?;
        if x.ncols() != self.n_features {
            return Err(PipelineError::SchemaMismatch {
                detail: format!(
                    "input has {} feature columns, classifier was fitted on {}",
                    x.ncols(),
                    self.n_features
                ),
            });
        }

        let mut test_x = DataVec::new();
        for row in 0..x.nrows() {
            test_x.push(Data::new_test_data(x.row_slice(row).to_vec(), None));
        }
        // Under LogLikelyhood, predict yields the positive-class probability.
        let probabilities = model.predict(&test_x);
        Ok(probabilities
            .into_iter()
            .map(|p| if p >= 0.5 { 1 } else { 0 })
            .collect())
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
