//! Column preprocessing ahead of the estimator.

use crate::features::{FeatureRecord, FeatureValue};
use crate::pipeline::InferenceError;
use serde::{Deserialize, Serialize};

/// One column's contribution to the estimator input vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    /// One indicator per category; unknown categories encode as all zeros.
    OneHot {
        column: String,
        categories: Vec<String>,
        /// Drop the first category's indicator (it becomes the all-zero baseline).
        #[serde(default)]
        drop_first: bool,
    },
    /// Numeric column copied through unchanged.
    Passthrough { column: String },
}

impl ColumnStep {
    pub fn column(&self) -> &str {
        match self {
            ColumnStep::OneHot { column, .. } | ColumnStep::Passthrough { column } => column,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            ColumnStep::OneHot {
                categories,
                drop_first,
                ..
            } => {
                if *drop_first {
                    categories.len().saturating_sub(1)
                } else {
                    categories.len()
                }
            }
            ColumnStep::Passthrough { .. } => 1,
        }
    }

    fn apply(&self, value: &FeatureValue, out: &mut Vec<f64>) -> Result<(), InferenceError> {
        match self {
            ColumnStep::OneHot {
                column,
                categories,
                drop_first,
            } => {
                let category = value.as_str().ok_or_else(|| InferenceError::WrongKind {
                    column: column.clone(),
                    expected: "categorical",
                    actual: value.kind(),
                })?;
                let skip = usize::from(*drop_first);
                out.extend(
                    categories
                        .iter()
                        .skip(skip)
                        .map(|c| if c == category { 1.0 } else { 0.0 }),
                );
            }
            ColumnStep::Passthrough { column } => {
                let number = value.as_f64().ok_or_else(|| InferenceError::WrongKind {
                    column: column.clone(),
                    expected: "numeric",
                    actual: value.kind(),
                })?;
                out.push(number);
            }
        }
        Ok(())
    }
}

/// Ordered column steps producing the estimator's dense input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub steps: Vec<ColumnStep>,
}

impl ColumnTransformer {
    pub fn new(steps: Vec<ColumnStep>) -> Self {
        Self { steps }
    }

    pub fn output_width(&self) -> usize {
        self.steps.iter().map(ColumnStep::width).sum()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.steps.iter().map(ColumnStep::column).collect()
    }

    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
        let mut out = Vec::with_capacity(self.output_width());
        for step in &self.steps {
            let value = record
                .get(step.column())
                .ok_or_else(|| InferenceError::MissingColumn(step.column().to_string()))?;
            step.apply(value, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer(drop_first: bool) -> ColumnTransformer {
        ColumnTransformer::new(vec![
            ColumnStep::OneHot {
                column: "Company".into(),
                categories: vec!["Apple".into(), "Dell".into(), "HP".into()],
                drop_first,
            },
            ColumnStep::Passthrough {
                column: "Ram".into(),
            },
        ])
    }

    #[test]
    fn test_one_hot_and_passthrough() {
        let record = FeatureRecord::new().with("Company", "Dell").with("Ram", 8u32);
        assert_eq!(
            transformer(false).transform(&record).unwrap(),
            vec![0.0, 1.0, 0.0, 8.0]
        );
        assert_eq!(
            transformer(true).transform(&record).unwrap(),
            vec![1.0, 0.0, 8.0]
        );
        assert_eq!(transformer(true).output_width(), 3);
    }

    #[test]
    fn test_unknown_category_is_all_zero() {
        let record = FeatureRecord::new().with("Company", "Razer").with("Ram", 8u32);
        assert_eq!(
            transformer(false).transform(&record).unwrap(),
            vec![0.0, 0.0, 0.0, 8.0]
        );
    }

    #[test]
    fn test_missing_and_mistyped_columns() {
        let record = FeatureRecord::new().with("Company", "Dell");
        assert_eq!(
            transformer(false).transform(&record).unwrap_err(),
            InferenceError::MissingColumn("Ram".into())
        );

        let record = FeatureRecord::new().with("Company", 3u32).with("Ram", 8u32);
        assert!(matches!(
            transformer(false).transform(&record).unwrap_err(),
            InferenceError::WrongKind { expected: "categorical", .. }
        ));
    }
}
