use std::collections::BTreeMap;

use super::model::{CellValue, MovieTable, AGE_RATING, FAN_RATING, RELEASE_YEAR};
use super::stats::{mean, quantile_sorted};

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean fan rating per release year, ascending by year.
///
/// Every distinct non-missing year gets an entry; a year whose ratings are
/// all missing maps to NaN.
pub fn trend_by_year(table: &MovieTable) -> Vec<(f64, f64)> {
    let (Some(year_col), Some(rating_col)) = (
        table.column_index(RELEASE_YEAR),
        table.column_index(FAN_RATING),
    ) else {
        return Vec::new();
    };

    // BTreeMap over the bit-ordered key keeps years ascending.
    let mut groups: BTreeMap<OrderedYear, Vec<f64>> = BTreeMap::new();
    for rec in &table.records {
        let Some(year) = rec.get(year_col).as_f64() else {
            continue;
        };
        let ratings = groups.entry(OrderedYear(year)).or_default();
        if let Some(r) = rec.get(rating_col).as_f64() {
            ratings.push(r);
        }
    }

    groups
        .into_iter()
        .map(|(year, ratings)| (year.0, mean(&ratings)))
        .collect()
}

/// Mean fan rating per age rating, sorted by label.
pub fn trend_by_rating(table: &MovieTable) -> Vec<(String, f64)> {
    ratings_by_label(table)
        .into_iter()
        .map(|(label, ratings)| (label, mean(&ratings)))
        .collect()
}

/// Non-missing fan ratings grouped by non-missing age-rating label.
fn ratings_by_label(table: &MovieTable) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let (Some(label_col), Some(rating_col)) = (
        table.column_index(AGE_RATING),
        table.column_index(FAN_RATING),
    ) else {
        return groups;
    };

    for rec in &table.records {
        let label = match rec.get(label_col) {
            CellValue::Null => continue,
            CellValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        let ratings = groups.entry(label).or_default();
        if let Some(r) = rec.get(rating_col).as_f64() {
            ratings.push(r);
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedYear(f64);

impl Eq for OrderedYear {}

impl PartialOrd for OrderedYear {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedYear {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation between numeric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pearson correlation over all numeric columns, using for each pair only
/// the rows where both values are present.
///
/// The result is symmetric. The diagonal is 1.0, or NaN for a column
/// without variance.
pub fn correlation_matrix(table: &MovieTable) -> CorrelationMatrix {
    let numeric = table.numeric_columns();
    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|&c| table.records.iter().map(|rec| rec.get(c).as_f64()).collect())
        .collect();

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|&c| table.columns[c].clone()).collect(),
        values,
    }
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

/// Box-plot geometry for one age-rating category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond 1.5 × IQR from the box.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    fn from_values(label: String, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&values, 0.25);
        let median = quantile_sorted(&values, 0.5);
        let q3 = quantile_sorted(&values, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = values
            .iter()
            .partition(|v| **v >= lo_fence && **v <= hi_fence);
        let lower_whisker = inside.iter().copied().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(BoxSummary {
            label,
            count: values.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Fan-rating distribution per age rating, sorted by label. Categories with
/// no ratings at all are left out.
pub fn rating_distribution(table: &MovieTable) -> Vec<BoxSummary> {
    ratings_by_label(table)
        .into_iter()
        .filter_map(|(label, ratings)| BoxSummary::from_values(label, ratings))
        .collect()
}
