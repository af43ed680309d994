use super::model::{MovieTable, AGE_RATING, RELEASE_YEAR};

// ---------------------------------------------------------------------------
// Row selections
// ---------------------------------------------------------------------------

/// Return indices of movies released in `year`.
///
/// Comparison is numeric, so `1994` matches both an integer and a float
/// cell. Missing years never match.
pub fn select_year(table: &MovieTable, year: f64) -> Vec<usize> {
    let Some(col) = table.column_index(RELEASE_YEAR) else {
        return Vec::new();
    };
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.get(col).as_f64() == Some(year))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of movies whose age rating is exactly `label`.
pub fn select_rating(table: &MovieTable, label: &str) -> Vec<usize> {
    let Some(col) = table.column_index(AGE_RATING) else {
        return Vec::new();
    };
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.get(col).as_str() == Some(label))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Selector choices
// ---------------------------------------------------------------------------

/// Sorted distinct non-missing release years.
pub fn available_years(table: &MovieTable) -> Vec<f64> {
    // unique_values is already sorted and de-duplicated by value.
    let mut years: Vec<f64> = table
        .unique_values
        .get(RELEASE_YEAR)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_f64())
        .collect();
    years.dedup();
    years
}

/// Sorted distinct non-missing age-rating labels.
pub fn rating_labels(table: &MovieTable) -> Vec<String> {
    table
        .unique_values
        .get(AGE_RATING)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, MovieRecord, FAN_RATING};
    use pretty_assertions::assert_eq;

    fn row(year: CellValue, rating: f64, age: &str) -> MovieRecord {
        MovieRecord {
            values: vec![year, CellValue::Float(rating), CellValue::String(age.into())],
        }
    }

    fn scenario() -> MovieTable {
        MovieTable::from_records(
            vec![RELEASE_YEAR.into(), FAN_RATING.into(), AGE_RATING.into()],
            vec![
                row(CellValue::Integer(1994), 9.3, "R"),
                row(CellValue::Integer(1994), 8.1, "PG-13"),
                row(CellValue::Integer(2008), 9.0, "PG-13"),
                row(CellValue::Null, 7.0, "G"),
            ],
        )
    }

    #[test]
    fn year_selection_matches_exactly() {
        let table = scenario();
        assert_eq!(select_year(&table, 1994.0), vec![0, 1]);
        assert_eq!(select_year(&table, 2008.0), vec![2]);
        assert_eq!(select_year(&table, 1977.0), Vec::<usize>::new());
    }

    #[test]
    fn year_selection_is_numeric() {
        let mut table = scenario();
        table.records[2].values[0] = CellValue::Float(2008.0);
        assert_eq!(select_year(&table, 2008.0), vec![2]);
    }

    #[test]
    fn rating_selection_is_exact_string_match() {
        let table = scenario();
        assert_eq!(select_rating(&table, "PG-13"), vec![1, 2]);
        assert_eq!(select_rating(&table, "pg-13"), Vec::<usize>::new());
        assert_eq!(select_rating(&table, "R"), vec![0]);
    }

    #[test]
    fn years_are_sorted_distinct_and_skip_missing() {
        let table = scenario();
        assert_eq!(available_years(&table), vec![1994.0, 2008.0]);
    }

    #[test]
    fn labels_are_sorted() {
        let table = scenario();
        assert_eq!(
            rating_labels(&table),
            vec!["G".to_string(), "PG-13".to_string(), "R".to_string()]
        );
    }

    #[test]
    fn absent_columns_select_nothing() {
        let table = MovieTable::from_records(vec!["Title".into()], Vec::new());
        assert!(select_year(&table, 1994.0).is_empty());
        assert!(select_rating(&table, "PG-13").is_empty());
        assert!(available_years(&table).is_empty());
    }
}
