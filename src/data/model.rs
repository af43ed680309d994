use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Column holding the numeric release year.
pub const RELEASE_YEAR: &str = "Release Year";
/// Column holding the numeric audience rating.
pub const FAN_RATING: &str = "Fan Rating";
/// Column holding the categorical content classification.
pub const AGE_RATING: &str = "Age Rating";

static NULL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the movie table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing value (empty cell, NA token, or failed numeric coercion).
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Equality goes through `cmp` so it agrees with `Ord` and `Hash` for floats.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numerics compare by value, integers first on ties.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_number(*v)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<NA>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the text of a `String` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion: anything that does not parse becomes `Null`.
    pub fn to_numeric(&self) -> CellValue {
        match self {
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null => self.clone(),
            CellValue::Bool(b) => CellValue::Integer(i64::from(*b)),
            CellValue::String(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => CellValue::Float(v),
                _ => CellValue::Null,
            },
        }
    }
}

/// Render a float without a trailing `.0000` when it is integral (years).
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

// ---------------------------------------------------------------------------
// MovieRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single movie (one row of the source file), aligned with
/// [`MovieTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub values: Vec<CellValue>,
}

impl MovieRecord {
    pub fn get(&self, column: usize) -> &CellValue {
        self.values.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// MovieTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct MovieTable {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// All movies (rows).
    pub records: Vec<MovieRecord>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl MovieTable {
    /// Build column indices from the loaded rows.
    pub fn from_records(columns: Vec<String>, records: Vec<MovieRecord>) -> Self {
        let mut table = MovieTable {
            columns,
            records,
            unique_values: BTreeMap::new(),
        };
        table.rebuild_unique_values();
        table
    }

    fn rebuild_unique_values(&mut self) {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for (idx, col) in self.columns.iter().enumerate() {
            let set = unique_values.entry(col.clone()).or_default();
            for rec in &self.records {
                set.insert(rec.get(idx).clone());
            }
        }
        self.unique_values = unique_values;
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, column `name`); `Null` when the column is absent.
    #[cfg(test)]
    pub fn value(&self, row: usize, name: &str) -> &CellValue {
        match (self.records.get(row), self.column_index(name)) {
            (Some(rec), Some(col)) => rec.get(col),
            _ => &NULL,
        }
    }

    /// Coerce a column to numeric in place and return how many non-missing
    /// cells became missing. Absent columns are ignored.
    pub fn coerce_numeric(&mut self, name: &str) -> usize {
        let Some(col) = self.column_index(name) else {
            return 0;
        };
        let mut downgraded = 0;
        for rec in &mut self.records {
            if let Some(cell) = rec.values.get_mut(col) {
                let coerced = cell.to_numeric();
                if coerced.is_null() && !cell.is_null() {
                    downgraded += 1;
                }
                *cell = coerced;
            }
        }
        self.rebuild_unique_values();
        downgraded
    }

    /// Whether every non-missing cell of the column is a number.
    pub fn is_numeric(&self, col: usize) -> bool {
        self.records.iter().all(|rec| {
            matches!(
                rec.get(col),
                CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null
            )
        })
    }

    /// Indices of all numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&c| self.is_numeric(c))
            .collect()
    }

    /// Non-missing numeric values of a column. NaN counts as missing.
    pub fn numeric_values(&self, col: usize) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|rec| rec.get(col).as_f64())
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> MovieTable {
        MovieTable::from_records(
            vec!["Title".into(), RELEASE_YEAR.into()],
            vec![
                MovieRecord {
                    values: vec![CellValue::String("Heat".into()), CellValue::Integer(1995)],
                },
                MovieRecord {
                    values: vec![
                        CellValue::String("Ran".into()),
                        CellValue::String("N/A".into()),
                    ],
                },
            ],
        )
    }

    #[test]
    fn coercion_turns_text_into_missing() {
        let mut t = table();
        assert!(!t.is_numeric(1));

        let downgraded = t.coerce_numeric(RELEASE_YEAR);
        assert_eq!(downgraded, 1);
        assert!(t.is_numeric(1));
        assert_eq!(t.value(1, RELEASE_YEAR), &CellValue::Null);
        assert_eq!(t.value(0, RELEASE_YEAR), &CellValue::Integer(1995));
        // The row itself is still there.
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn coercion_parses_numeric_text() {
        assert_eq!(
            CellValue::String(" 8.5 ".into()).to_numeric(),
            CellValue::Float(8.5)
        );
        assert_eq!(CellValue::Bool(true).to_numeric(), CellValue::Integer(1));
        assert_eq!(CellValue::Null.to_numeric(), CellValue::Null);
    }

    #[test]
    fn coercing_absent_column_is_a_no_op() {
        let mut t = table();
        assert_eq!(t.coerce_numeric("Budget"), 0);
        assert_eq!(t.columns.len(), 2);
    }

    #[test]
    fn numeric_columns_skip_text() {
        let mut t = table();
        assert_eq!(t.numeric_columns(), Vec::<usize>::new());
        t.coerce_numeric(RELEASE_YEAR);
        assert_eq!(t.numeric_columns(), vec![1]);
        assert_eq!(t.numeric_values(1), vec![1995.0]);
    }

    #[test]
    fn mixed_numerics_order_by_value() {
        let mut set = BTreeSet::new();
        set.insert(CellValue::Float(2.5));
        set.insert(CellValue::Integer(3));
        set.insert(CellValue::Integer(2));
        set.insert(CellValue::Null);
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                CellValue::Null,
                CellValue::Integer(2),
                CellValue::Float(2.5),
                CellValue::Integer(3),
            ]
        );
    }

    #[test]
    fn display_formats_years_without_decimals() {
        assert_eq!(CellValue::Float(1994.0).to_string(), "1994");
        assert_eq!(CellValue::Float(8.25).to_string(), "8.2500");
        assert_eq!(CellValue::Null.to_string(), "<NA>");
    }

    #[test]
    fn float_equality_agrees_with_ordering() {
        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan.clone()), std::cmp::Ordering::Equal);

        let neg_zero = CellValue::Float(-0.0);
        let zero = CellValue::Float(0.0);
        assert_ne!(neg_zero, zero);

        for (a, b) in [(&nan, &nan), (&zero, &zero), (&neg_zero, &zero)] {
            assert_eq!(a == b, a.cmp(b) == std::cmp::Ordering::Equal);
        }
    }

    #[test]
    fn nan_cells_are_not_numeric_values() {
        let t = MovieTable::from_records(
            vec![FAN_RATING.into()],
            vec![
                MovieRecord {
                    values: vec![CellValue::Float(f64::NAN)],
                },
                MovieRecord {
                    values: vec![CellValue::Float(9.0)],
                },
            ],
        );
        assert_eq!(t.numeric_values(0), vec![9.0]);
    }
}
