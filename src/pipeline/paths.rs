//! Path normalisation: canonical absolute forms of the vault locations.
//!
//! Normalisation is purely lexical. Symlinks are not resolved and the
//! filesystem is never touched, so a vault root that does not exist still
//! normalises cleanly and simply yields no documents further down.

use std::path::{Component, Path, PathBuf};

/// The three locations every check needs, already normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    /// Absolute vault root.
    pub root: PathBuf,
    /// Folder bare image names resolve against.
    pub attachments: PathBuf,
    /// Folder that is never scanned.
    pub trash: PathBuf,
}

impl VaultPaths {
    pub fn new(root: &Path, attachments_subpath: &Path, trash_dir_name: &str) -> Self {
        let root = normalize(root);
        let attachments = normalize(&root.join(attachments_subpath));
        let trash = normalize(&root.join(trash_dir_name));
        Self {
            root,
            attachments,
            trash,
        }
    }

    /// True when `path` lies at or below the trash folder.
    ///
    /// Component-aware: `.trashcan/` is not inside `.trash/`.
    pub fn is_trashed(&self, path: &Path) -> bool {
        path.starts_with(&self.trash)
    }
}

/// Make `path` absolute against the current directory, then collapse `.`,
/// `..` and repeated separators.
///
/// `..` at the filesystem root is dropped, so `/../a` becomes `/a`.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_lexically(&absolute)
}

/// Collapse `.` and `..` without consulting the filesystem or the current
/// directory. Relative inputs stay relative; leading `..` segments that have
/// nothing to cancel are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    // Normal components currently on `out`, i.e. how many `..` can still pop.
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
