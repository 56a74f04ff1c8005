//! Note resolution for wiki-links that are not attachments.

use crate::output::{DocumentOutcome, MissingNote};
use crate::pipeline::extract::extract_note_links;
use crate::pipeline::validate::for_each_line;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Names under which each document can be linked.
#[derive(Debug)]
pub struct NoteIndex {
    /// Vault-relative paths with `/` separators, extension included.
    paths: HashSet<String>,
    /// File names without the markdown extension.
    stems: HashSet<String>,
    suffix: String,
}

impl NoteIndex {
    pub fn new(root: &Path, documents: &[PathBuf], markdown_extension: &str) -> Self {
        let suffix = format!(".{markdown_extension}");
        let mut paths = HashSet::new();
        let mut stems = HashSet::new();
        for doc in documents {
            if let Ok(rel) = doc.strip_prefix(root) {
                paths.insert(rel.to_string_lossy().replace('\\', "/"));
            }
            if let Some(name) = doc.file_name() {
                let name = name.to_string_lossy();
                let stem = name.strip_suffix(suffix.as_str()).unwrap_or(&*name);
                stems.insert(stem.to_string());
            }
        }
        Self {
            paths,
            stems,
            suffix,
        }
    }

    /// True when `target` names a known note by relative path (extension
    /// optional) or by bare file stem.
    pub fn contains(&self, target: &str) -> bool {
        let target = target.replace('\\', "/");
        let with_ext = if target.ends_with(&self.suffix) {
            target.clone()
        } else {
            format!("{target}{}", self.suffix)
        };
        self.paths.contains(&with_ext) || self.stems.contains(&target)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Check every note link in one document against `index`.
pub fn validate_note_links(index: &NoteIndex, document: &Path) -> DocumentOutcome<MissingNote> {
    let mut findings = Vec::new();

    let result = for_each_line(document, |line_number, line| {
        for target in extract_note_links(line) {
            if !index.contains(target) {
                findings.push(MissingNote {
                    document: document.to_path_buf(),
                    line: line_number,
                    target: target.to_string(),
                });
            }
        }
    });

    let error = result.err();
    if let Some(ref e) = error {
        warn!("{}", e);
    }

    DocumentOutcome {
        path: document.to_path_buf(),
        findings,
        error,
    }
}
