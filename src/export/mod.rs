//! Export layer: push the loaded table to a remote document store.
//!
//! ```text
//!   MovieTable ──table_to_documents──▶ Vec<Document> ──DocumentSink──▶ remote
//! ```
//!
//! Nothing here retries or de-duplicates: exporting twice stores every row
//! twice unless `clear_before_insert` is set.

pub mod mongo;

use serde_json::{Map, Number, Value as JsonValue};

use crate::config::MongoConfig;
use crate::data::model::{CellValue, MovieTable};
use crate::error::ExportError;

/// One exported row: column name → value.
pub type Document = Map<String, JsonValue>;

// ---------------------------------------------------------------------------
// Sink abstraction
// ---------------------------------------------------------------------------

/// Destination collection for exported documents.
pub trait DocumentSink {
    /// Insert all documents in one bulk request. Returns how many were
    /// acknowledged.
    fn insert_documents(&self, documents: Vec<Document>) -> Result<u64, ExportError>;

    /// Remove every document from the collection. Returns how many were
    /// removed.
    fn clear(&self) -> Result<u64, ExportError>;
}

/// What a successful export did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReceipt {
    pub inserted: u64,
    pub cleared: Option<u64>,
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// One document per row, columns as field names.
pub fn table_to_documents(table: &MovieTable) -> Result<Vec<Document>, ExportError> {
    table
        .records
        .iter()
        .enumerate()
        .map(|(row, rec)| {
            table
                .columns
                .iter()
                .zip(&rec.values)
                .map(|(col, val)| Ok((col.clone(), cell_to_json(val, row)?)))
                .collect::<Result<Document, ExportError>>()
        })
        .collect()
}

fn cell_to_json(value: &CellValue, row: usize) -> Result<JsonValue, ExportError> {
    Ok(match value {
        CellValue::String(s) => JsonValue::String(s.clone()),
        CellValue::Integer(i) => JsonValue::Number((*i).into()),
        CellValue::Float(f) => JsonValue::Number(Number::from_f64(*f).ok_or_else(|| {
            ExportError::Serialize {
                row,
                reason: format!("{f} is not a finite number"),
            }
        })?),
        CellValue::Bool(b) => JsonValue::Bool(*b),
        CellValue::Null => JsonValue::Null,
    })
}

/// Serialize the whole table and bulk-insert it into `sink`, optionally
/// emptying the collection first.
///
/// A failure part-way through may leave some documents behind in the
/// remote collection.
pub fn export_table(
    table: &MovieTable,
    sink: &dyn DocumentSink,
    clear_first: bool,
) -> Result<ExportReceipt, ExportError> {
    let documents = table_to_documents(table)?;
    let cleared = if clear_first {
        Some(sink.clear()?)
    } else {
        None
    };
    let inserted = if documents.is_empty() {
        0
    } else {
        sink.insert_documents(documents)?
    };
    Ok(ExportReceipt { inserted, cleared })
}

// ---------------------------------------------------------------------------
// Exporter state machine
// ---------------------------------------------------------------------------

/// `Idle → Submitting → {Succeeded, Failed}`; a new trigger starts over.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Idle,
    Submitting,
    Succeeded(ExportReceipt),
    Failed(String),
}

/// Drives one export per trigger against the configured target.
#[derive(Debug)]
pub struct Exporter {
    config: MongoConfig,
    status: ExportStatus,
}

impl Exporter {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            status: ExportStatus::Idle,
        }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    pub fn status(&self) -> &ExportStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == ExportStatus::Submitting
    }

    /// Mark an export as requested. Ignored while one is in flight.
    pub fn trigger(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.status = ExportStatus::Submitting;
        true
    }

    /// Run the pending export against `sink` and record the outcome.
    pub fn submit_to(
        &mut self,
        table: &MovieTable,
        sink: &dyn DocumentSink,
    ) -> Result<ExportReceipt, ExportError> {
        self.status = ExportStatus::Submitting;
        let result = export_table(table, sink, self.config.clear_before_insert);
        self.record(&result);
        result
    }

    /// Connect to the configured MongoDB target and run the pending export.
    pub fn submit(&mut self, table: &MovieTable) -> Result<ExportReceipt, ExportError> {
        match mongo::MongoSink::connect(&self.config) {
            Ok(sink) => self.submit_to(table, &sink),
            Err(e) => self.fail(e),
        }
    }

    /// End the pending export with `error` without touching any sink.
    pub fn fail(&mut self, error: ExportError) -> Result<ExportReceipt, ExportError> {
        let result = Err(error);
        self.record(&result);
        result
    }

    fn record(&mut self, result: &Result<ExportReceipt, ExportError>) {
        self.status = match result {
            Ok(receipt) => {
                log::info!(
                    "exported {} document(s) to {}",
                    receipt.inserted,
                    self.config.target()
                );
                ExportStatus::Succeeded(*receipt)
            }
            Err(e) => {
                log::error!("export to {} failed: {e}", self.config.target());
                ExportStatus::Failed(e.to_string())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use crate::data::model::{MovieRecord, AGE_RATING, FAN_RATING, RELEASE_YEAR};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Collection kept in memory; can be told to reject inserts.
    #[derive(Default)]
    struct MemorySink {
        documents: RefCell<Vec<Document>>,
        fail_with: Option<String>,
        inserts: Cell<usize>,
    }

    impl DocumentSink for MemorySink {
        fn insert_documents(&self, documents: Vec<Document>) -> Result<u64, ExportError> {
            self.inserts.set(self.inserts.get() + 1);
            if let Some(msg) = &self.fail_with {
                return Err(ExportError::Insert(msg.clone()));
            }
            let n = documents.len() as u64;
            self.documents.borrow_mut().extend(documents);
            Ok(n)
        }

        fn clear(&self) -> Result<u64, ExportError> {
            let n = self.documents.borrow().len() as u64;
            self.documents.borrow_mut().clear();
            Ok(n)
        }
    }

    fn table() -> MovieTable {
        use CellValue::*;
        MovieTable::from_records(
            vec![
                "Title".into(),
                RELEASE_YEAR.into(),
                FAN_RATING.into(),
                AGE_RATING.into(),
            ],
            vec![
                MovieRecord {
                    values: vec![String("Heat".into()), Integer(1995), Float(8.3), String("R".into())],
                },
                MovieRecord {
                    values: vec![String("Lost Reel".into()), Null, Null, String("G".into())],
                },
            ],
        )
    }

    fn config(clear: bool) -> MongoConfig {
        MongoConfig {
            uri: "mongodb://localhost:27017".into(),
            clear_before_insert: clear,
            ..Default::default()
        }
    }

    #[test]
    fn rows_become_documents_with_the_same_values() {
        let docs = table_to_documents(&table()).expect("serialize");
        assert_eq!(docs.len(), 2);
        assert_eq!(
            JsonValue::Object(docs[0].clone()),
            json!({"Title": "Heat", "Release Year": 1995, "Fan Rating": 8.3, "Age Rating": "R"})
        );
        assert_eq!(docs[1]["Release Year"], JsonValue::Null);
    }

    #[test]
    fn export_round_trip_and_no_dedup() {
        let t = table();
        let sink = MemorySink::default();

        let first = export_table(&t, &sink, false).expect("first export");
        assert_eq!(first.inserted, 2);
        assert_eq!(first.cleared, None);
        assert_eq!(*sink.documents.borrow(), table_to_documents(&t).expect("docs"));

        export_table(&t, &sink, false).expect("second export");
        assert_eq!(sink.documents.borrow().len(), 4);
    }

    #[test]
    fn clear_first_replaces_the_collection() {
        let t = table();
        let sink = MemorySink::default();
        export_table(&t, &sink, false).expect("seed");
        let receipt = export_table(&t, &sink, true).expect("replace");
        assert_eq!(receipt.cleared, Some(2));
        assert_eq!(sink.documents.borrow().len(), 2);
    }

    #[test]
    fn empty_table_skips_the_insert() {
        let t = MovieTable::from_records(vec!["Title".into()], Vec::new());
        let sink = MemorySink::default();
        let receipt = export_table(&t, &sink, false).expect("export");
        assert_eq!(receipt.inserted, 0);
        assert_eq!(sink.inserts.get(), 0);
    }

    #[test]
    fn exporter_records_success() {
        let mut exporter = Exporter::new(config(false));
        assert_eq!(exporter.status(), &ExportStatus::Idle);
        assert!(exporter.trigger());
        assert!(exporter.is_submitting());
        assert!(!exporter.trigger());

        let sink = MemorySink::default();
        exporter.submit_to(&table(), &sink).expect("export");
        assert_eq!(
            exporter.status(),
            &ExportStatus::Succeeded(ExportReceipt {
                inserted: 2,
                cleared: None
            })
        );
    }

    #[test]
    fn exporter_surfaces_the_error_text() {
        let mut exporter = Exporter::new(config(false));
        exporter.trigger();
        let sink = MemorySink {
            fail_with: Some("E11000 duplicate key".into()),
            ..Default::default()
        };
        let err = exporter.submit_to(&table(), &sink).unwrap_err();
        assert!(matches!(err, ExportError::Insert(_)));
        assert_eq!(
            exporter.status(),
            &ExportStatus::Failed("insert failed: E11000 duplicate key".into())
        );
        // No retry.
        assert_eq!(sink.inserts.get(), 1);
    }

    #[test]
    fn unconfigured_target_fails_without_connecting() {
        let mut exporter = Exporter::new(MongoConfig::default());
        exporter.trigger();
        let err = exporter.submit(&table()).unwrap_err();
        assert!(matches!(err, ExportError::NotConfigured));
        assert!(matches!(exporter.status(), ExportStatus::Failed(_)));
    }
}
