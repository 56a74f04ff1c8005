//! Per-document validation: read lines, resolve references, check the disk.

use crate::error::DocumentError;
use crate::output::{BrokenLink, DocumentOutcome};
use crate::pipeline::extract::extract_image_references;
use crate::pipeline::paths::{normalize_lexically, VaultPaths};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Absolute path an image reference points at.
///
/// A bare file name resolves inside the attachment folder; anything with a
/// directory component resolves against the vault root.
pub fn resolve_reference(paths: &VaultPaths, reference: &str) -> PathBuf {
    let base = if reference.chars().any(std::path::is_separator) {
        &paths.root
    } else {
        &paths.attachments
    };
    normalize_lexically(&base.join(reference))
}

/// True only for an existing regular file (symlinks followed). A directory
/// with an image-like name does not count.
pub fn image_exists(path: &Path) -> bool {
    path.is_file()
}

/// Feed every line of `path` to `visit` with its 1-indexed number.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. The file is opened and
/// closed inside this call. Open failures become
/// [`DocumentError::CannotOpen`]; a read or UTF-8 error stops at that line
/// with [`DocumentError::ReadFailed`], after earlier lines were visited.
pub fn for_each_line<F>(path: &Path, mut visit: F) -> Result<(), DocumentError>
where
    F: FnMut(usize, &str),
{
    let file = File::open(path).map_err(|e| DocumentError::CannotOpen {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let lines = TextLines {
        reader: BufReader::new(file),
        buf: Vec::new(),
    };
    for (idx, line) in lines.enumerate() {
        let line_number = idx + 1;
        let line = line.map_err(|e| DocumentError::ReadFailed {
            path: path.to_path_buf(),
            line: line_number,
            detail: e.to_string(),
        })?;
        visit(line_number, &line);
    }
    Ok(())
}

/// UTF-8 lines of a reader, split on any of the three newline conventions.
struct TextLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> TextLines<R> {
    /// Bytes up to and excluding the next line break. `Ok(false)` at EOF
    /// with nothing read.
    fn read_raw_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let mut read_any = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    let carriage_return = available[i] == b'\r';
                    self.buf.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    if carriage_return {
                        let crlf = self.reader.fill_buf()?.first() == Some(&b'\n');
                        if crlf {
                            self.reader.consume(1);
                        }
                    }
                    return Ok(true);
                }
                None => {
                    let n = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(n);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for TextLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_raw_line() {
            Ok(false) => None,
            Ok(true) => Some(
                std::str::from_utf8(&self.buf)
                    .map(str::to_owned)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            ),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Check every image embed in one document.
pub fn validate_document(paths: &VaultPaths, document: &Path) -> DocumentOutcome<BrokenLink> {
    let mut findings = Vec::new();

    let result = for_each_line(document, |line_number, line| {
        for reference in extract_image_references(line) {
            let resolved = resolve_reference(paths, reference);
            if !image_exists(&resolved) {
                debug!(
                    "{}:{}: missing {}",
                    document.display(),
                    line_number,
                    resolved.display()
                );
                findings.push(BrokenLink {
                    document: document.to_path_buf(),
                    line: line_number,
                    reference: reference.to_string(),
                    resolved,
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, VaultPaths) {
        let dir = TempDir::new().unwrap();
        let paths = VaultPaths::new(dir.path(), Path::new("Assets/Attachments"), ".trash");
        fs::create_dir_all(&paths.attachments).unwrap();
        (dir, paths)
    }

    #[test]
    fn bare_names_resolve_to_attachments() {
        let paths = VaultPaths::new(Path::new("/v"), Path::new("Assets/Attachments"), ".trash");
        assert_eq!(
            resolve_reference(&paths, "cat.png"),
            PathBuf::from("/v/Assets/Attachments/cat.png")
        );
    }

    #[test]
    fn paths_resolve_to_root() {
        let paths = VaultPaths::new(Path::new("/v"), Path::new("Assets/Attachments"), ".trash");
        assert_eq!(
            resolve_reference(&paths, "sub/dir/img.png"),
            PathBuf::from("/v/sub/dir/img.png")
        );
        assert_eq!(
            resolve_reference(&paths, "./figs/../img.png"),
            PathBuf::from("/v/img.png")
        );
    }

    #[test]
    fn directory_is_not_an_image() {
        let (_dir, paths) = setup();
        let fake = paths.attachments.join("folder.png");
        fs::create_dir_all(&fake).unwrap();
        assert!(!image_exists(&fake));
    }

    #[test]
    fn reports_only_missing_targets() {
        let (_dir, paths) = setup();
        fs::write(paths.attachments.join("here.png"), b"x").unwrap();
        let doc = paths.root.join("a.md");
        fs::write(&doc, "intro\n[[here.png]] [[gone.png|Gone]]\n\n![[gone.JPG]]\n").unwrap();

        let outcome = validate_document(&paths, &doc);
        assert!(outcome.is_ok());
        let lines: Vec<(usize, &str)> = outcome
            .findings
            .iter()
            .map(|b| (b.line, b.reference.as_str()))
            .collect();
        assert_eq!(lines, vec![(2, "gone.png"), (4, "gone.JPG")]);
        assert_eq!(
            outcome.findings[0].resolved,
            paths.attachments.join("gone.png")
        );
    }

    #[test]
    fn crlf_lines_are_handled() {
        let (_dir, paths) = setup();
        let doc = paths.root.join("win.md");
        fs::write(&doc, "a\r\n[[x.png]]\r\n").unwrap();
        let outcome = validate_document(&paths, &doc);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].line, 2);
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let (_dir, paths) = setup();
        let doc = paths.root.join("mac.md");
        fs::write(&doc, "intro\r[[ghost.png]]\r").unwrap();
        let outcome = validate_document(&paths, &doc);
        assert!(outcome.is_ok());
        let lines: Vec<usize> = outcome.findings.iter().map(|b| b.line).collect();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn mixed_line_endings_are_numbered_in_order() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("mixed.md");
        fs::write(&doc, "a\r\nb\rc\n\nd").unwrap();

        let mut seen = Vec::new();
        for_each_line(&doc, |n, line| seen.push((n, line.to_string()))).unwrap();
        assert_eq!(
            seen,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string()),
                (4, String::new()),
                (5, "d".to_string()),
            ]
        );
    }

    #[test]
    fn missing_document_cannot_open() {
        let (_dir, paths) = setup();
        let doc = paths.root.join("vanished.md");
        let outcome = validate_document(&paths, &doc);
        assert!(matches!(outcome.error, Some(DocumentError::CannotOpen { .. })));
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn invalid_utf8_keeps_earlier_findings() {
        let (_dir, paths) = setup();
        let doc = paths.root.join("bad.md");
        let mut bytes = b"[[first.png]]\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"[[never.png]]\n");
        fs::write(&doc, bytes).unwrap();

        let outcome = validate_document(&paths, &doc);
        assert_eq!(outcome.findings.len(), 1);
        match outcome.error {
            Some(DocumentError::ReadFailed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected ReadFailed, got {other:?}"),
        }
    }
}
