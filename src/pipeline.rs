//! One-time pipeline initialization and the per-request inference adapter.
//!
//! `SatisfactionPipeline::from_csv` runs the whole initialization phase
//! eagerly: load, forward-fill, drop the identifier column, build the
//! encoder registry, split features from the target, fit the classifier.
//! The returned handle is immutable and `Send + Sync`; every prediction
//! borrows it read-only, so no locking is needed after construction.
use std::path::Path;

use log::{debug, info};

use crate::config::ModelConfig;
use crate::dataset::DataTable;
use crate::encoding::EncoderRegistry;
use crate::error::PipelineError;
use crate::inference::{yes_no, CustomerRecord, RawField, Verdict};
use crate::matrix::FeatureMatrix;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory;
use crate::schema::{split_features, FeatureSchema};

/// Nominal columns encoded to integer codes before training.
pub const CATEGORICAL_COLUMNS: [&str; 6] = [
    "Gender",
    "VisitFrequency",
    "PreferredCuisine",
    "TimeOfVisit",
    "DiningOccasion",
    "MealType",
];

/// Training label column.
pub const TARGET_COLUMN: &str = "HighSatisfaction";

/// Identifier column discarded before any feature use.
pub const ID_COLUMN: &str = "CustomerID";

/// Immutable handle over the fitted pipeline: feature schema, encoder
/// registry and classifier, shared read-only by every inference call.
pub struct SatisfactionPipeline {
    schema: FeatureSchema,
    encoders: EncoderRegistry,
    model: Box<dyn ClassifierModel>,
    n_trained_rows: usize,
}

impl std::fmt::Debug for SatisfactionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SatisfactionPipeline")
            .field("schema", &self.schema)
            .field("encoders", &self.encoders)
            .field("model", &self.model.name())
            .field("n_trained_rows", &self.n_trained_rows)
            .finish()
    }
}

impl SatisfactionPipeline {
    pub fn from_csv<P: AsRef<Path>>(path: P, config: ModelConfig) -> Result<Self, PipelineError> {
        info!("loading dataset from {}", path.as_ref().display());
        let table = DataTable::from_csv_path(path)?;
        Self::from_table(table, config)
    }

    pub fn from_table(mut table: DataTable, config: ModelConfig) -> Result<Self, PipelineError> {
        table.forward_fill();
        if table.drop_column(ID_COLUMN) {
            debug!("dropped identifier column '{}'", ID_COLUMN);
        }

        let encoders = EncoderRegistry::build(&mut table, &CATEGORICAL_COLUMNS)?;
        for column in CATEGORICAL_COLUMNS {
            debug!(
                "column '{}' has {} categories",
                column,
                encoders.labels(column).map_or(0, |labels| labels.len())
            );
        }

        let training = split_features(&table, TARGET_COLUMN)?;
        info!(
            "{} rows, {} feature columns",
            training.x.nrows(),
            training.schema.len()
        );

        let mut model = factory::build_model(config);
        model.fit(&training.x, &training.y)?;
        info!("fitted {} model on the full table", model.name());

        Ok(SatisfactionPipeline {
            schema: training.schema,
            encoders,
            model,
            n_trained_rows: training.x.nrows(),
        })
    }

    /// Encode one raw record into a feature vector in schema order.
    ///
    /// Each schema column is resolved by name against the record;
    /// categorical lookups go through the fitted encoder registry, yes/no
    /// fields use the fixed {"Yes" -> 1, "No" -> 0} mapping, numerics pass
    /// through un-clamped.
    pub fn encode_record(&self, record: &CustomerRecord) -> Result<Vec<f32>, PipelineError> {
        let mut row = Vec::with_capacity(self.schema.len());
        for column in self.schema.columns() {
            let field = record
                .field(column)
                .ok_or_else(|| PipelineError::SchemaMismatch {
                    detail: format!("record supplies no value for feature column '{}'", column),
                })?;
            let value = match field {
                RawField::Numeric(v) => v,
                RawField::Categorical(label) => self.encoders.encode(column, label)? as f32,
                RawField::YesNo(raw) => yes_no(column, raw)?,
            };
            row.push(value);
        }
        Ok(row)
    }

    /// Run one inference request. Purely functional over the fitted state:
    /// per-request failures reject the request and mutate nothing.
    pub fn predict(&self, record: &CustomerRecord) -> Result<Verdict, PipelineError> {
        let row = self.encode_record(record)?;
        let width = row.len();
        let x = FeatureMatrix::from_shape_vec((1, width), row).map_err(|e| {
            PipelineError::SchemaMismatch {
                detail: e.to_string(),
            }
        })?;
        let labels = self.model.predict(&x)?;
        Ok(Verdict::from_label(labels[0]))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Ordered valid labels for a categorical column, for selection inputs.
    pub fn labels(&self, column: &str) -> Option<&[String]> {
        self.encoders.labels(column)
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn n_trained_rows(&self) -> usize {
        self.n_trained_rows
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
