//! Incremental scanning: yield one document's outcome at a time.
//!
//! Unlike the eager [`crate::scan::scan`], which returns a finished report,
//! [`scan_documents`] hands back an iterator. Nothing is opened until the
//! iterator is advanced, and each document's file handle is closed before
//! its outcome is yielded.

use crate::config::ScanConfig;
use crate::output::{BrokenLink, DocumentOutcome, MissingNote};
use crate::pipeline::collect::{collect_documents, TraversalIssue};
use crate::pipeline::notes::{validate_note_links, NoteIndex};
use crate::pipeline::paths::VaultPaths;
use crate::pipeline::validate::validate_document;
use crate::progress::ProgressCallback;
use std::path::{Path, PathBuf};
use tracing::info;

type Check<F> = Box<dyn FnMut(&VaultPaths, &Path) -> DocumentOutcome<F>>;

/// Iterator over per-document outcomes, in walk order.
///
/// Progress callbacks fire as the iterator advances; `on_scan_complete`
/// fires once, when the last document has been yielded.
pub struct DocumentScan<F> {
    paths: VaultPaths,
    documents: std::vec::IntoIter<PathBuf>,
    traversal_issues: Vec<TraversalIssue>,
    total: usize,
    index: usize,
    findings: usize,
    check: Check<F>,
    progress: Option<ProgressCallback>,
    finished: bool,
}

impl<F> DocumentScan<F> {
    fn new(
        paths: VaultPaths,
        documents: Vec<PathBuf>,
        traversal_issues: Vec<TraversalIssue>,
        check: Check<F>,
        progress: Option<ProgressCallback>,
    ) -> Self {
        let total = documents.len();
        info!("Scanning {} documents under {}", total, paths.root.display());
        if let Some(ref cb) = progress {
            cb.on_scan_start(total);
        }
        Self {
            paths,
            documents: documents.into_iter(),
            traversal_issues,
            total,
            index: 0,
            findings: 0,
            check,
            progress,
            finished: false,
        }
    }

    /// Normalised vault locations used by this scan.
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Number of documents the walk found.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Entries the walk could not read.
    pub fn traversal_issues(&self) -> &[TraversalIssue] {
        &self.traversal_issues
    }

    /// Findings yielded so far.
    pub fn findings_so_far(&self) -> usize {
        self.findings
    }
}

impl<F> Iterator for DocumentScan<F> {
    type Item = DocumentOutcome<F>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(document) = self.documents.next() else {
            if !self.finished {
                self.finished = true;
                if let Some(ref cb) = self.progress {
                    cb.on_scan_complete(self.total, self.findings);
                }
            }
            return None;
        };

        self.index += 1;
        if let Some(ref cb) = self.progress {
            cb.on_document_start(self.index, self.total, &document);
        }

        let outcome = (self.check)(&self.paths, &document);
        self.findings += outcome.findings.len();

        if let Some(ref cb) = self.progress {
            match outcome.error {
                Some(ref e) => cb.on_document_error(self.index, self.total, &e.to_string()),
                None => cb.on_document_complete(self.index, self.total, outcome.findings.len()),
            }
        }

        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.documents.size_hint()
    }
}

fn prepare(config: &ScanConfig) -> (VaultPaths, Vec<PathBuf>, Vec<TraversalIssue>) {
    let paths = VaultPaths::new(
        &config.vault_root,
        &config.attachments_subpath,
        &config.trash_dir_name,
    );
    let collection = collect_documents(&paths, &config.markdown_extension, config.follow_links);
    (paths, collection.files, collection.issues)
}

/// Walk the vault and return an iterator that checks each document's image
/// embeds when advanced.
pub fn scan_documents(config: &ScanConfig) -> DocumentScan<BrokenLink> {
    let (paths, documents, issues) = prepare(config);
    DocumentScan::new(
        paths,
        documents,
        issues,
        Box::new(validate_document),
        config.progress_callback.clone(),
    )
}

/// Walk the vault and return an iterator that checks each document's note
/// links when advanced.
pub fn scan_note_links(config: &ScanConfig) -> DocumentScan<MissingNote> {
    let (paths, documents, issues) = prepare(config);
    let index = NoteIndex::new(&paths.root, &documents, &config.markdown_extension);
    DocumentScan::new(
        paths,
        documents,
        issues,
        Box::new(move |_: &VaultPaths, doc: &Path| {
            validate_note_links(&index, doc)
        }),
        config.progress_callback.clone(),
    )
}
