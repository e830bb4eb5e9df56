use crate::error::{NeurotradeError, Result};
use polars::prelude::*;

/// Time-ordered, read-only table of per-day features.
///
/// Every day shares the same column order, so flattening a window of days
/// yields values in the order the network was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    columns: Vec<String>,
    days: Vec<Vec<f64>>,
}

impl Universe {
    pub fn new(columns: Vec<String>, days: Vec<Vec<f64>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(NeurotradeError::DataLoading(
                "Universe has no feature columns".to_string(),
            ));
        }
        if let Some(pos) = days.iter().position(|day| day.len() != columns.len()) {
            return Err(NeurotradeError::DataLoading(format!(
                "Day {} has {} values, expected {}",
                pos,
                days[pos].len(),
                columns.len()
            )));
        }
        for (index, day) in days.iter().enumerate() {
            if let Some(col) = day.iter().position(|value| !value.is_finite()) {
                return Err(NeurotradeError::DataLoading(format!(
                    "Day {} has non-finite value {} in '{}'",
                    index, day[col], columns[col]
                )));
            }
        }
        Ok(Self { columns, days })
    }

    /// Build from insertion-ordered `(feature, value)` records.
    pub fn from_records(records: Vec<Vec<(String, f64)>>) -> Result<Self> {
        let Some(first) = records.first() else {
            return Err(NeurotradeError::DataLoading("Universe has no days".to_string()));
        };
        let columns: Vec<String> = first.iter().map(|(name, _)| name.clone()).collect();

        let mut days = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let keys_match = record.len() == columns.len()
                && record.iter().zip(&columns).all(|((name, _), col)| name == col);
            if !keys_match {
                return Err(NeurotradeError::DataLoading(format!(
                    "Day {} does not share the feature order of day 0",
                    index
                )));
            }
            days.push(record.into_iter().map(|(_, value)| value).collect());
        }

        Self::new(columns, days)
    }

    /// Convert a fully numeric DataFrame, one row per day.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

        let mut series = Vec::with_capacity(columns.len());
        for name in &columns {
            let casted = df.column(name.as_str())?.cast(&DataType::Float64)?;
            let values: Vec<f64> = casted
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value.ok_or_else(|| {
                        NeurotradeError::DataLoading(format!(
                            "Column '{}' has a null at row {}",
                            name, row
                        ))
                    })
                })
                .collect::<Result<_>>()?;
            series.push(values);
        }

        let days = (0..df.height())
            .map(|row| series.iter().map(|column| column[row]).collect())
            .collect();

        Self::new(columns, days)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn day(&self, index: usize) -> Option<&[f64]> {
        self.days.get(index).map(Vec::as_slice)
    }

    pub fn value(&self, day: usize, column: usize) -> f64 {
        self.days[day][column]
    }

    /// Values of days `[end - length, end)` flattened day by day.
    pub fn window(&self, end: usize, length: usize) -> impl Iterator<Item = f64> + '_ {
        self.days[end - length..end].iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn record(day: f64, close: f64) -> Vec<(String, f64)> {
        vec![("Day".to_string(), day), ("SPY_ClosePrice".to_string(), close)]
    }

    #[test]
    fn test_from_records_keeps_order() {
        let universe = Universe::from_records(vec![record(1.0, 10.0), record(2.0, 11.0)]).unwrap();
        assert_eq!(universe.columns(), &["Day".to_string(), "SPY_ClosePrice".to_string()]);
        assert_eq!(universe.day(1), Some(&[2.0, 11.0][..]));
        let window: Vec<f64> = universe.window(2, 2).collect();
        assert_eq!(window, vec![1.0, 10.0, 2.0, 11.0]);
    }

    #[test]
    fn test_from_records_rejects_reordered_keys() {
        let swapped = vec![("SPY_ClosePrice".to_string(), 1.0), ("Day".to_string(), 2.0)];
        assert!(Universe::from_records(vec![record(1.0, 10.0), swapped]).is_err());
    }

    #[test]
    fn test_from_dataframe() {
        let df = df! {
            "Day" => &[1i64, 3, 5],
            "Month" => &[0i64, 0, 1],
            "SPY_ClosePrice" => &[0.5, -0.25, 1.0],
        }
        .unwrap();

        let universe = Universe::from_dataframe(&df).unwrap();
        assert_eq!(universe.len(), 3);
        assert_eq!(universe.width(), 3);
        assert_eq!(universe.column_index("Month"), Some(1));
        assert_eq!(universe.value(2, 2), 1.0);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let result = Universe::new(columns.clone(), vec![vec![1.0, 2.0], vec![f64::INFINITY, 0.0]]);
        assert!(matches!(result, Err(NeurotradeError::DataLoading(_))));
        assert!(Universe::new(columns, vec![vec![0.0, f64::NAN]]).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = Universe::new(vec!["a".to_string(), "b".to_string()], vec![vec![1.0]]);
        assert!(result.is_err());
    }
}
