//! Result types returned by the scan functions, and their text rendering.
//!
//! Scanning and presentation are kept apart: every check returns a plain
//! data report, and the CLI decides whether to print it as text (the
//! line-oriented format below) or as JSON.

use crate::error::{DocumentError, LinkSpyError};
use crate::pipeline::collect::TraversalIssue;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Serialise any report as pretty-printed JSON with a trailing newline.
pub fn to_json<R: Serialize>(report: &R) -> Result<String, LinkSpyError> {
    let mut s = serde_json::to_string_pretty(report)?;
    s.push('\n');
    Ok(s)
}

/// A problem found on one line of one document.
pub trait Finding: fmt::Display {
    /// Plural noun used in the summary line, e.g. `"broken links"`.
    const TOTAL_LABEL: &'static str;
}

/// An image embed whose target is not a regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    /// Document containing the embed.
    pub document: PathBuf,
    /// 1-indexed line number.
    pub line: usize,
    /// Target as written between the brackets, alias removed.
    pub reference: String,
    /// Absolute, normalised path that was checked.
    pub resolved: PathBuf,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Broken link found in file '{}' at line {}: {}",
            self.document.display(),
            self.line,
            self.resolved.display()
        )
    }
}

impl Finding for BrokenLink {
    const TOTAL_LABEL: &'static str = "broken links";
}

/// A wiki-link to a note that exists nowhere in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingNote {
    pub document: PathBuf,
    pub line: usize,
    /// Link target with heading and alias removed.
    pub target: String,
}

impl fmt::Display for MissingNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing note '{}' linked from file '{}' at line {}",
            self.target,
            self.document.display(),
            self.line
        )
    }
}

impl Finding for MissingNote {
    const TOTAL_LABEL: &'static str = "links to missing notes";
}

/// Everything learned about a single document.
///
/// `findings` holds what was found before any error: a document that fails
/// on line 40 still reports the broken links on lines 1–39.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome<F> {
    pub path: PathBuf,
    pub findings: Vec<F>,
    pub error: Option<DocumentError>,
}

impl<F> DocumentOutcome<F> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Counters for a per-document check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Documents the walk found.
    pub documents_found: usize,
    /// Documents read to the end.
    pub documents_scanned: usize,
    /// Documents that could not be opened or decoded.
    pub documents_failed: usize,
    /// Findings across all documents.
    pub total_findings: usize,
    /// Wall-clock time for the whole run.
    pub duration_ms: u64,
}

/// Report of a check that runs once per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport<F> {
    pub vault_root: PathBuf,
    pub attachments_dir: PathBuf,
    pub documents: Vec<DocumentOutcome<F>>,
    pub traversal_issues: Vec<TraversalIssue>,
    pub stats: ScanStats,
}

/// Report of the broken-image check.
pub type ScanReport = DocumentReport<BrokenLink>;

/// Report of the missing-note check.
pub type MissingNotesReport = DocumentReport<MissingNote>;

impl<F> DocumentReport<F> {
    /// All findings, in document order then line order.
    pub fn findings(&self) -> impl Iterator<Item = &F> {
        self.documents.iter().flat_map(|d| d.findings.iter())
    }

    /// All per-document failures, in document order.
    pub fn errors(&self) -> impl Iterator<Item = &DocumentError> {
        self.documents.iter().filter_map(|d| d.error.as_ref())
    }
}

impl<F: Finding> DocumentReport<F> {
    /// Render as the line-oriented text the CLI prints.
    ///
    /// Per document: its findings, then its error if any. A blank line and
    /// the total close the report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for doc in &self.documents {
            for finding in &doc.findings {
                let _ = writeln!(out, "{finding}");
            }
            if let Some(ref err) = doc.error {
                let _ = writeln!(out, "{err}");
            }
        }
        let _ = writeln!(out, "\nTotal {} found: {}", F::TOTAL_LABEL, self.stats.total_findings);
        out
    }
}

/// Report of the unused-attachment check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedAttachmentsReport {
    pub vault_root: PathBuf,
    pub attachments_dir: PathBuf,
    /// Image files found in the attachment folder.
    pub attachments_checked: usize,
    /// Documents searched for references.
    pub documents_scanned: usize,
    pub unused: Vec<PathBuf>,
    /// Documents whose references could not be read. Attachments they use
    /// may be wrongly listed as unused.
    pub document_errors: Vec<DocumentError>,
    pub traversal_issues: Vec<TraversalIssue>,
    pub duration_ms: u64,
}

impl UnusedAttachmentsReport {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for err in &self.document_errors {
            let _ = writeln!(out, "{err}");
        }
        for path in &self.unused {
            let _ = writeln!(out, "Unused attachment: {}", path.display());
        }
        let _ = writeln!(out, "\nTotal unused attachments found: {}", self.unused.len());
        out
    }
}
