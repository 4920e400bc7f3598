//! Feature schema and feature/target split.
//!
//! The schema is the ordered list of column names the classifier consumes:
//! the cleaned, encoded table's column order with the target removed. It is
//! fixed at split time and the inference adapter assembles every future
//! input vector by resolving names against it, never by trusting positions.
use crate::dataset::{Cell, DataTable};
use crate::error::PipelineError;
use crate::matrix::FeatureMatrix;

/// Ordered list of the column names the classifier was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> FeatureSchema {
        FeatureSchema { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Encoded training inputs split from the cleaned table.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub schema: FeatureSchema,
    pub x: FeatureMatrix,
    pub y: Vec<i32>,
}

/// Split the encoded table into the feature matrix and 0/1 label vector.
/// Every feature cell must be numeric by now; anything else means the
/// cleaning or encoding step was skipped and the table is rejected.
pub fn split_features(table: &DataTable, target: &str) -> Result<TrainingData, PipelineError> {
    let target_idx = table
        .column_index(target)
        .ok_or_else(|| PipelineError::MalformedTable {
            detail: format!("target column '{}' not found", target),
        })?;

    let names = table.column_names();
    let feature_indices: Vec<usize> = (0..table.n_cols()).filter(|&i| i != target_idx).collect();
    let schema = FeatureSchema::new(
        feature_indices
            .iter()
            .map(|&i| names[i].clone())
            .collect(),
    );

    let n_rows = table.n_rows();
    let mut values = Vec::with_capacity(n_rows * feature_indices.len());
    for row in 0..n_rows {
        for &col in &feature_indices {
            match &table.column_by_index(col)[row] {
                Cell::Number(v) => values.push(*v as f32),
                Cell::Missing => {
                    return Err(PipelineError::MalformedTable {
                        detail: format!(
                            "missing value in column '{}' at row {} after cleaning",
                            names[col],
                            row + 1
                        ),
                    })
                }
                Cell::Text(text) => {
                    return Err(PipelineError::MalformedTable {
                        detail: format!(
                            "unencoded text value '{}' in column '{}' at row {}",
                            text,
                            names[col],
                            row + 1
                        ),
                    })
                }
            }
        }
    }

    let mut y = Vec::with_capacity(n_rows);
    for (row, cell) in table.column_by_index(target_idx).iter().enumerate() {
        match cell {
            Cell::Number(v) if *v == 0.0 || *v == 1.0 => y.push(*v as i32),
            _ => {
                return Err(PipelineError::MalformedTable {
                    detail: format!("target value at row {} must be 0 or 1", row + 1),
                })
            }
        }
    }

    let x = FeatureMatrix::from_shape_vec((n_rows, feature_indices.len()), values).map_err(|e| {
        PipelineError::MalformedTable {
            detail: e.to_string(),
        }
    })?;

    Ok(TrainingData { schema, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataTable;

    #[test]
    fn schema_preserves_table_order_minus_target() {
        let t = DataTable::from_csv_reader(
            "Age,Income,HighSatisfaction\n30,50000,1\n25,42000,0\n".as_bytes(),
        )
        .unwrap();
        let data = split_features(&t, "HighSatisfaction").unwrap();
        assert_eq!(
            data.schema.columns(),
            &["Age".to_string(), "Income".to_string()]
        );
        assert_eq!(data.x.shape(), (2, 2));
        assert_eq!(data.x.row_slice(0), &[30.0, 50000.0]);
        assert_eq!(data.y, vec![1, 0]);
    }

    #[test]
    fn unencoded_text_rejects_table() {
        let t = DataTable::from_csv_reader(
            "Gender,HighSatisfaction\nMale,1\n".as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            split_features(&t, "HighSatisfaction").unwrap_err(),
            PipelineError::MalformedTable { .. }
        ));
    }

    #[test]
    fn leading_missing_value_rejects_table() {
        let mut t = DataTable::from_csv_reader(
            "Age,HighSatisfaction\n,1\n30,0\n".as_bytes(),
        )
        .unwrap();
        t.forward_fill();
        assert!(matches!(
            split_features(&t, "HighSatisfaction").unwrap_err(),
            PipelineError::MalformedTable { .. }
        ));
    }

    #[test]
    fn non_binary_target_rejects_table() {
        let t = DataTable::from_csv_reader(
            "Age,HighSatisfaction\n30,2\n".as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            split_features(&t, "HighSatisfaction").unwrap_err(),
            PipelineError::MalformedTable { .. }
        ));
    }

    #[test]
    fn missing_target_column_rejects_table() {
        let t = DataTable::from_csv_reader("Age\n30\n".as_bytes()).unwrap();
        assert!(matches!(
            split_features(&t, "HighSatisfaction").unwrap_err(),
            PipelineError::MalformedTable { .. }
        ));
    }
}
