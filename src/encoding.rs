//! Categorical label <-> integer code mappings.
//!
//! One `CategoryMap` is built per nominal column from the distinct values
//! observed in the training table, and the registry is then shared
//! read-only with the inference adapter. Codes are assigned in ascending
//! lexicographic order of the raw label bytes, so identical training data
//! always yields identical codes. There is no reserved code for unseen
//! labels: encoding an unobserved label is a hard error.
use std::collections::{BTreeSet, HashMap};

use crate::dataset::{Cell, DataTable};
use crate::error::PipelineError;

/// Bijection between one column's observed labels and integer codes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap {
    labels: Vec<String>,
}

impl CategoryMap {
    fn from_observed(observed: BTreeSet<String>) -> CategoryMap {
        // BTreeSet iterates in ascending order, which fixes the codes.
        CategoryMap {
            labels: observed.into_iter().collect(),
        }
    }

    pub fn code(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    pub fn label(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One fitted `CategoryMap` per categorical column, resolved by name.
#[derive(Debug, Clone, Default)]
pub struct EncoderRegistry {
    maps: HashMap<String, CategoryMap>,
}

impl EncoderRegistry {
    /// Build one mapping per listed column from the distinct observed
    /// values, then replace the column's cells with the assigned codes in
    /// place. The table must already be cleaned: a missing or numeric cell
    /// in a listed column rejects the whole table.
    pub fn build(table: &mut DataTable, columns: &[&str]) -> Result<EncoderRegistry, PipelineError> {
        let mut maps = HashMap::new();
        for &name in columns {
            let idx = table
                .column_index(name)
                .ok_or_else(|| PipelineError::MalformedTable {
                    detail: format!("categorical column '{}' not found", name),
                })?;

            let mut observed = BTreeSet::new();
            for (row, cell) in table.column_by_index(idx).iter().enumerate() {
                match cell {
                    Cell::Text(label) => {
                        observed.insert(label.clone());
                    }
                    Cell::Missing => {
                        return Err(PipelineError::MalformedTable {
                            detail: format!(
                                "missing value in categorical column '{}' at row {}",
                                name,
                                row + 1
                            ),
                        })
                    }
                    Cell::Number(_) => {
                        return Err(PipelineError::MalformedTable {
                            detail: format!(
                                "numeric value in categorical column '{}' at row {}",
                                name,
                                row + 1
                            ),
                        })
                    }
                }
            }
            if observed.is_empty() {
                return Err(PipelineError::MalformedTable {
                    detail: format!("categorical column '{}' has no rows", name),
                });
            }

            let map = CategoryMap::from_observed(observed);
            for cell in table.column_mut_by_index(idx) {
                if let Cell::Text(label) = cell {
                    let code = map.code(label).expect("label observed in this column");
                    *cell = Cell::Number(code as f64);
                }
            }
            maps.insert(name.to_string(), map);
        }
        Ok(EncoderRegistry { maps })
    }

    /// Integer code for `label` under `column`'s mapping.
    pub fn encode(&self, column: &str, label: &str) -> Result<usize, PipelineError> {
        let map = self
            .maps
            .get(column)
            .ok_or_else(|| PipelineError::SchemaMismatch {
                detail: format!("no encoder built for column '{}'", column),
            })?;
        map.code(label).ok_or_else(|| PipelineError::UnknownCategory {
            column: column.to_string(),
            label: label.to_string(),
        })
    }

    /// Inverse direction of the bijection.
    pub fn decode(&self, column: &str, code: usize) -> Option<&str> {
        self.maps.get(column).and_then(|map| map.label(code))
    }

    /// Full ordered label set for a column, for populating selection inputs.
    pub fn labels(&self, column: &str) -> Option<&[String]> {
        self.maps.get(column).map(CategoryMap::labels)
    }
}
