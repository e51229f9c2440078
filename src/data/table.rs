use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

/// A named-column tabular dataset. Cells are `f64`; values that did not
/// parse as numbers (dates, free text) are carried as NaN and either dropped
/// with their column or handled downstream by the scaling stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    /// Builds a table, checking every row against the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Table> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(EngineError::Dataset(format!(
                    "row {} has {} cells but the header names {} columns",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Table { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn col_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| EngineError::Dataset(format!("no column named '{name}'")))
    }

    /// Every column name except the listed ones, in table order. This is how
    /// the feature list is derived: drop the target and the date, keep the
    /// rest.
    pub fn feature_columns(&self, exclude: &[&str]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !exclude.contains(&c.as_str()))
            .cloned()
            .collect()
    }

    /// Extracts the named columns, in the given order, as a matrix.
    pub fn matrix_of(&self, columns: &[String]) -> Result<Matrix> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|name| self.col_index(name))
            .collect::<Result<_>>()?;
        Ok(Matrix {
            rows: self.rows.len(),
            cols: indices.len(),
            data: self.rows.iter()
                .map(|row| indices.iter().map(|&i| row[i]).collect())
                .collect(),
        })
    }

    /// Keeps only the rows whose value in `column` equals `value`.
    pub fn filter_eq(&self, column: &str, value: f64) -> Result<Table> {
        let idx = self.col_index(column)?;
        Ok(Table {
            columns: self.columns.clone(),
            rows: self.rows.iter()
                .filter(|row| row[idx] == value)
                .cloned()
                .collect(),
        })
    }

    /// Per-column mean over the finite entries of the named columns; a
    /// column with no finite entries yields NaN. Skipping NaN here is
    /// equivalent to filling gaps with the column mean before averaging.
    pub fn column_means(&self, columns: &[String]) -> Result<Vec<f64>> {
        columns.iter()
            .map(|name| {
                let idx = self.col_index(name)?;
                let mut sum = 0.0;
                let mut count = 0usize;
                for row in &self.rows {
                    let x = row[idx];
                    if x.is_finite() {
                        sum += x;
                        count += 1;
                    }
                }
                Ok(if count > 0 { sum / count as f64 } else { f64::NAN })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["date".into(), "shop".into(), "amount".into(), "f1".into()],
            vec![
                vec![f64::NAN, 1.0, 10.0, 0.5],
                vec![f64::NAN, 2.0, 20.0, 1.5],
                vec![f64::NAN, 1.0, 30.0, f64::NAN],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_rows_with_the_wrong_width() {
        let result = Table::new(vec!["a".into(), "b".into()], vec![vec![1.0]]);
        assert!(matches!(result, Err(EngineError::Dataset(_))));
    }

    #[test]
    fn feature_columns_drop_the_excluded_names() {
        let table = sample();
        assert_eq!(table.feature_columns(&["amount", "date"]), vec!["shop", "f1"]);
    }

    #[test]
    fn matrix_of_preserves_requested_column_order() {
        let table = sample();
        let m = table.matrix_of(&["f1".into(), "shop".into()]).unwrap();
        assert_eq!(m.data[1], vec![1.5, 2.0]);
    }

    #[test]
    fn filter_eq_keeps_matching_rows_only() {
        let table = sample();
        let filtered = table.filter_eq("shop", 1.0).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(table.filter_eq("shop", 9.0).unwrap().is_empty());
    }

    #[test]
    fn column_means_skip_nan_entries() {
        let table = sample();
        let means = table.column_means(&["f1".into(), "amount".into()]).unwrap();
        assert_eq!(means[0], 1.0); // mean of 0.5, 1.5
        assert_eq!(means[1], 20.0);
    }

    #[test]
    fn column_means_of_an_all_nan_column_are_nan() {
        let table = sample();
        let means = table.column_means(&["date".into()]).unwrap();
        assert!(means[0].is_nan());
    }

    #[test]
    fn unknown_column_is_a_dataset_error() {
        let table = sample();
        assert!(table.col_index("missing").is_err());
    }
}
