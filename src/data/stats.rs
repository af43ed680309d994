use super::model::MovieTable;

/// Row labels of the summary table, in display order.
pub const SUMMARY_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column. Undefined values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        ColumnSummary {
            column: column.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Values in [`SUMMARY_ROWS`] order.
    pub fn row_values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summary over every numeric column of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Count, mean, std, min, quartiles and max of every numeric column.
/// Text and boolean columns are left out.
pub fn summary(table: &MovieTable) -> SummaryTable {
    SummaryTable {
        columns: table
            .numeric_columns()
            .into_iter()
            .map(|col| ColumnSummary::from_values(&table.columns[col], &table.numeric_values(col)))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `n - 1` in the denominator.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of already sorted values using linear interpolation between
/// the two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, MovieRecord, AGE_RATING, FAN_RATING, RELEASE_YEAR};
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table() -> MovieTable {
        let rows = [
            (CellValue::Integer(1994), CellValue::Float(9.3), "R"),
            (CellValue::Integer(1994), CellValue::Float(8.1), "PG-13"),
            (CellValue::Integer(2008), CellValue::Float(9.0), "PG-13"),
            (CellValue::Null, CellValue::Null, "G"),
        ];
        MovieTable::from_records(
            vec![RELEASE_YEAR.into(), FAN_RATING.into(), AGE_RATING.into()],
            rows.into_iter()
                .map(|(y, r, a)| MovieRecord {
                    values: vec![y, r, CellValue::String(a.into())],
                })
                .collect(),
        )
    }

    #[test]
    fn summary_excludes_text_columns() {
        let s = summary(&table());
        let names: Vec<&str> = s.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec![RELEASE_YEAR, FAN_RATING]);
        assert!(s.get(AGE_RATING).is_none());
    }

    #[test]
    fn count_is_number_of_non_missing_values() {
        let s = summary(&table());
        assert_eq!(s.get(RELEASE_YEAR).map(|c| c.count), Some(3));
        assert_eq!(s.get(FAN_RATING).map(|c| c.count), Some(3));
    }

    #[test]
    fn rating_statistics() {
        let s = summary(&table());
        let rating = s.get(FAN_RATING).expect("rating column");
        assert!(approx(rating.mean, 8.8));
        assert!(approx(rating.min, 8.1));
        assert!(approx(rating.max, 9.3));
        assert!(approx(rating.median, 9.0));
        assert!(approx(rating.q25, 8.55));
        assert!(approx(rating.q75, 9.15));
        // sqrt(((-.7)^2 + .5^2 + .2^2) / 2)
        assert!(approx(rating.std, (0.78f64 / 2.0).sqrt()));
    }

    #[test]
    fn empty_and_single_value_columns_are_nan() {
        let empty = ColumnSummary::from_values("x", &[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan() && empty.min.is_nan() && empty.std.is_nan());

        let single = ColumnSummary::from_values("x", &[4.0]);
        assert_eq!(single.count, 1);
        assert!(approx(single.median, 4.0));
        assert!(single.std.is_nan());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile_sorted(&v, 0.25), 1.75));
        assert!(approx(quantile_sorted(&v, 0.5), 2.5));
        assert!(approx(quantile_sorted(&v, 1.0), 4.0));
    }
}
