//! Eager (whole-vault) entry points.
//!
//! Each function walks the vault, runs one check over every document and
//! returns a finished report. Per-document failures are recorded in the
//! report; none of these functions can fail part-way. Use
//! [`crate::stream::scan_documents`] instead to handle outcomes as they are
//! produced.

use crate::config::ScanConfig;
use crate::error::LinkSpyError;
use crate::output::{
    DocumentReport, MissingNotesReport, ScanReport, ScanStats, UnusedAttachmentsReport,
};
use crate::pipeline::collect::{collect_attachments, collect_documents};
use crate::pipeline::extract::{extract_image_references, link_file_name};
use crate::pipeline::paths::VaultPaths;
use crate::pipeline::validate::for_each_line;
use crate::stream::{scan_documents, scan_note_links, DocumentScan};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Find every image embed whose target file is missing.
///
/// # Example
/// ```rust,no_run
/// use linkspy::{scan, ScanConfig};
///
/// let config = ScanConfig::new("/home/me/vault").unwrap();
/// let report = scan(&config);
/// print!("{}", report.to_text());
/// ```
pub fn scan(config: &ScanConfig) -> ScanReport {
    let start = Instant::now();
    let report = finish(scan_documents(config), start);
    info!(
        "Broken-image scan complete: {} broken links in {} documents, {}ms",
        report.stats.total_findings, report.stats.documents_found, report.stats.duration_ms
    );
    report
}

/// Find every wiki-link to a note that does not exist.
pub fn find_missing_notes(config: &ScanConfig) -> MissingNotesReport {
    let start = Instant::now();
    let report = finish(scan_note_links(config), start);
    info!(
        "Missing-note scan complete: {} dangling links in {} documents, {}ms",
        report.stats.total_findings, report.stats.documents_found, report.stats.duration_ms
    );
    report
}

fn finish<F>(mut scan: DocumentScan<F>, start: Instant) -> DocumentReport<F> {
    let documents: Vec<_> = scan.by_ref().collect();

    let failed = documents.iter().filter(|d| !d.is_ok()).count();
    let stats = ScanStats {
        documents_found: documents.len(),
        documents_scanned: documents.len() - failed,
        documents_failed: failed,
        total_findings: documents.iter().map(|d| d.findings.len()).sum(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    DocumentReport {
        vault_root: scan.paths().root.clone(),
        attachments_dir: scan.paths().attachments.clone(),
        documents,
        traversal_issues: scan.traversal_issues().to_vec(),
        stats,
    }
}

/// Find image files in the attachment folder that no document embeds.
///
/// An attachment counts as used when any image reference anywhere in the
/// vault has the same file name, whatever folder the reference names.
pub fn find_unused_attachments(config: &ScanConfig) -> UnusedAttachmentsReport {
    let start = Instant::now();
    let paths = VaultPaths::new(
        &config.vault_root,
        &config.attachments_subpath,
        &config.trash_dir_name,
    );
    let documents = collect_documents(&paths, &config.markdown_extension, config.follow_links);
    let progress = config.progress_callback.as_ref();
    let total = documents.files.len();

    if let Some(cb) = progress {
        cb.on_scan_start(total);
    }

    let mut referenced: HashSet<String> = HashSet::new();
    let mut document_errors = Vec::new();
    for (i, doc) in documents.files.iter().enumerate() {
        if let Some(cb) = progress {
            cb.on_document_start(i + 1, total, doc);
        }
        let result = for_each_line(doc, |_, line| {
            for reference in extract_image_references(line) {
                referenced.insert(link_file_name(reference).to_string());
            }
        });
        match result {
            Ok(()) => {
                if let Some(cb) = progress {
                    cb.on_document_complete(i + 1, total, 0);
                }
            }
            Err(e) => {
                warn!("{}", e);
                if let Some(cb) = progress {
                    cb.on_document_error(i + 1, total, &e.to_string());
                }
                document_errors.push(e);
            }
        }
    }

    let attachments = collect_attachments(&paths, config.follow_links);
    let mut unused: Vec<_> = attachments
        .files
        .iter()
        .filter(|path| {
            path.file_name()
                .map(|name| !referenced.contains(&*name.to_string_lossy()))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    unused.sort();

    if let Some(cb) = progress {
        cb.on_scan_complete(total, unused.len());
    }

    let mut traversal_issues = documents.issues;
    traversal_issues.extend(attachments.issues);

    let report = UnusedAttachmentsReport {
        vault_root: paths.root,
        attachments_dir: paths.attachments,
        attachments_checked: attachments.files.len(),
        documents_scanned: total - document_errors.len(),
        unused,
        document_errors,
        traversal_issues,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Unused-attachment scan complete: {}/{} attachments unused, {}ms",
        report.unused.len(),
        report.attachments_checked,
        report.duration_ms
    );
    report
}

/// Write a rendered report to `path` atomically.
///
/// The text goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers never see a half-written report.
pub fn write_report(path: impl AsRef<Path>, contents: &str) -> Result<(), LinkSpyError> {
    let path = path.as_ref();
    let write_err = |source: std::io::Error| LinkSpyError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
