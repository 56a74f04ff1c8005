//! Progress-callback trait for per-document scan events.
//!
//! Inject an [`Arc<dyn ScanProgressCallback>`] via
//! [`crate::config::ScanConfigBuilder::progress_callback`] to be told about
//! each document as the scan reaches it. The CLI uses this to drive its
//! progress bar; library callers can forward events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use linkspy::{ScanConfig, ScanProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     broken: AtomicUsize,
//! }
//!
//! impl ScanProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _index: usize, _total: usize, broken_links: usize) {
//!         self.broken.fetch_add(broken_links, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { broken: AtomicUsize::new(0) });
//!
//! let config = ScanConfig::builder("/vault")
//!     .progress_callback(counter as Arc<dyn ScanProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the scanner as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The scan is single-threaded, but the trait is
/// `Send + Sync` so a config carrying a callback can be shared freely.
pub trait ScanProgressCallback: Send + Sync {
    /// Called once, after the vault has been walked and before any document
    /// is opened.
    ///
    /// # Arguments
    /// * `total_documents` — number of documents that will be checked
    fn on_scan_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is opened.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position of the document in this run
    /// * `total` — number of documents in this run
    /// * `path`  — absolute path of the document
    fn on_document_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called when a document was read to the end.
    ///
    /// `findings` is the number of problems found in it (broken image
    /// embeds or dangling note links, depending on the check).
    fn on_document_complete(&self, index: usize, total: usize, findings: usize) {
        let _ = (index, total, findings);
    }

    /// Called when a document could not be opened or decoded.
    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every document has been attempted.
    fn on_scan_complete(&self, total_documents: usize, total_findings: usize) {
        let _ = (total_documents, total_findings);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScanProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type ProgressCallback = Arc<dyn ScanProgressCallback>;
