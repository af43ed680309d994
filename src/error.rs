//! Error types shared by the loader and the exporter.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure to produce a [`MovieTable`](crate::data::model::MovieTable).
/// Fatal to the current view; the previous table (if any) is kept.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("cannot parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// Failure while submitting records to the remote store.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been loaded yet.
    #[error("no table loaded")]
    NoTable,

    /// No connection URI configured.
    #[error("remote store is not configured (set REELS_MONGO__URI)")]
    NotConfigured,

    /// Client construction, DNS, TLS or authentication failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// A row could not be turned into a document.
    #[error("row {row} could not be serialized: {reason}")]
    Serialize { row: usize, reason: String },

    /// The bulk insert (or the optional clear) was rejected.
    #[error("insert failed: {0}")]
    Insert(String),
}
