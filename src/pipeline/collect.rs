//! Document collection: walk the vault and pick out markdown files.

use crate::pipeline::extract::has_image_extension;
use crate::pipeline::paths::VaultPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A directory entry the walk could not read. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalIssue {
    pub path: Option<PathBuf>,
    pub detail: String,
}

/// Files found by one walk of the vault.
#[derive(Debug, Default)]
pub struct Collection {
    pub files: Vec<PathBuf>,
    pub issues: Vec<TraversalIssue>,
}

/// Walk `start` and return every file accepted by `keep`, pruning the
/// vault's trash folder.
///
/// Unreadable directories and dangling entries are recorded in
/// [`Collection::issues`] and the walk carries on.
pub fn walk_files<F>(start: &Path, paths: &VaultPaths, follow_links: bool, mut keep: F) -> Collection
where
    F: FnMut(&Path) -> bool,
{
    let mut collection = Collection::default();

    let walker = WalkDir::new(start)
        .follow_links(follow_links)
        .into_iter()
        .filter_entry(|entry| !is_trash_entry(paths, entry));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if is_regular_file(&entry) && keep(entry.path()) {
                    collection.files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                warn!(
                    "Skipping unreadable entry {}: {}",
                    path.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
                    e
                );
                collection.issues.push(TraversalIssue {
                    path,
                    detail: e.to_string(),
                });
            }
        }
    }

    collection
}

/// A regular file, or a symlink to one. Symlinked directories are only
/// descended into when the walk follows links.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_trash_entry(paths: &VaultPaths, entry: &DirEntry) -> bool {
    let trashed = paths.is_trashed(entry.path());
    if trashed && entry.depth() > 0 {
        debug!("Pruning trash entry: {}", entry.path().display());
    }
    trashed
}

/// Every document under the vault root, outside the trash folder.
///
/// A document is a regular file whose name ends with `.{markdown_extension}`
/// (case-sensitive). Order is whatever the walk yields.
pub fn collect_documents(paths: &VaultPaths, markdown_extension: &str, follow_links: bool) -> Collection {
    let suffix = format!(".{markdown_extension}");
    let collection = walk_files(&paths.root, paths, follow_links, |path| has_suffix(path, &suffix));
    debug!(
        "Collected {} documents under {}",
        collection.files.len(),
        paths.root.display()
    );
    collection
}

/// Image files under the attachment folder, outside the trash folder.
pub fn collect_attachments(paths: &VaultPaths, follow_links: bool) -> Collection {
    walk_files(&paths.attachments, paths, follow_links, |path| {
        path.file_name()
            .map(|name| has_image_extension(&name.to_string_lossy()))
            .unwrap_or(false)
    })
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}
