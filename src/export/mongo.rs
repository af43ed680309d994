use mongodb::bson::{self, doc, Document as BsonDocument};
use mongodb::sync::{Client, Collection};

use super::{Document, DocumentSink};
use crate::config::MongoConfig;
use crate::error::ExportError;

// ---------------------------------------------------------------------------
// MongoDB collection sink (blocking driver)
// ---------------------------------------------------------------------------

/// A MongoDB collection reached through the synchronous driver.
pub struct MongoSink {
    collection: Collection<BsonDocument>,
}

impl MongoSink {
    /// Open a client for `config` and check that the server answers and the
    /// credentials are accepted.
    pub fn connect(config: &MongoConfig) -> Result<Self, ExportError> {
        if !config.is_configured() {
            return Err(ExportError::NotConfigured);
        }

        let client =
            Client::with_uri_str(&config.uri).map_err(|e| ExportError::Connect(e.to_string()))?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(|e| ExportError::Connect(e.to_string()))?;

        log::debug!("connected to MongoDB, target {}", config.target());
        Ok(Self {
            collection: database.collection(&config.collection),
        })
    }
}

impl DocumentSink for MongoSink {
    fn insert_documents(&self, documents: Vec<Document>) -> Result<u64, ExportError> {
        let docs = to_bson_documents(&documents)?;
        let result = self
            .collection
            .insert_many(docs, None)
            .map_err(|e| ExportError::Insert(e.to_string()))?;
        Ok(result.inserted_ids.len() as u64)
    }

    fn clear(&self) -> Result<u64, ExportError> {
        let result = self
            .collection
            .delete_many(doc! {}, None)
            .map_err(|e| ExportError::Insert(e.to_string()))?;
        Ok(result.deleted_count)
    }
}

/// Convert exported rows to BSON, keeping the row number of the first
/// document the driver cannot represent.
fn to_bson_documents(documents: &[Document]) -> Result<Vec<BsonDocument>, ExportError> {
    documents
        .iter()
        .enumerate()
        .map(|(row, d)| {
            bson::to_document(d).map_err(|e| ExportError::Serialize {
                row,
                reason: e.to_string(),
            })
        })
        .collect()
}
