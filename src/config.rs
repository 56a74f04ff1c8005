//! Configuration types for a vault scan.
//!
//! All scan behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. The only required input is the vault root; every
//! other knob has a default matching a stock Obsidian-style vault layout.

use crate::error::LinkSpyError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Attachment folder used when none is configured.
pub const DEFAULT_ATTACHMENTS_SUBPATH: &str = "Assets/Attachments";

/// Name of the vault's trash folder, relative to the root.
pub const DEFAULT_TRASH_DIR: &str = ".trash";

/// Extension (without the dot) that marks a file as a document.
pub const DEFAULT_MARKDOWN_EXTENSION: &str = "md";

/// Configuration for a vault scan.
///
/// # Example
/// ```rust
/// use linkspy::ScanConfig;
///
/// let config = ScanConfig::builder("/home/me/vault")
///     .attachments_subpath("files/img")
///     .build()
///     .unwrap();
/// assert_eq!(config.trash_dir_name, ".trash");
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// Root of the vault. Made absolute and normalised before scanning.
    pub vault_root: PathBuf,

    /// Folder, relative to the root, that bare image names resolve against.
    /// Default: `Assets/Attachments`.
    pub attachments_subpath: PathBuf,

    /// Folder, relative to the root, that is never scanned. Default: `.trash`.
    pub trash_dir_name: String,

    /// Case-sensitive file suffix (without the dot) identifying documents.
    /// Default: `md`.
    pub markdown_extension: String,

    /// Follow symbolic links while walking the vault. Default: false.
    ///
    /// Off by default so a link back up the tree cannot loop the walk;
    /// walkdir detects such cycles and reports them as traversal issues
    /// when this is on.
    pub follow_links: bool,

    /// Optional observer receiving per-document events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("vault_root", &self.vault_root)
            .field("attachments_subpath", &self.attachments_subpath)
            .field("trash_dir_name", &self.trash_dir_name)
            .field("markdown_extension", &self.markdown_extension)
            .field("follow_links", &self.follow_links)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ScanProgressCallback>"),
            )
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for a vault rooted at `vault_root`.
    pub fn builder(vault_root: impl Into<PathBuf>) -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self {
                vault_root: vault_root.into(),
                attachments_subpath: PathBuf::from(DEFAULT_ATTACHMENTS_SUBPATH),
                trash_dir_name: DEFAULT_TRASH_DIR.to_string(),
                markdown_extension: DEFAULT_MARKDOWN_EXTENSION.to_string(),
                follow_links: false,
                progress_callback: None,
            },
        }
    }

    /// Shorthand for `ScanConfig::builder(root).build()` with all defaults.
    pub fn new(vault_root: impl Into<PathBuf>) -> Result<Self, LinkSpyError> {
        Self::builder(vault_root).build()
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn attachments_subpath(mut self, subpath: impl AsRef<Path>) -> Self {
        self.config.attachments_subpath = subpath.as_ref().to_path_buf();
        self
    }

    pub fn trash_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.trash_dir_name = name.into();
        self
    }

    /// Accepts the extension with or without a leading dot.
    pub fn markdown_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.config.markdown_extension = ext.as_ref().trim_start_matches('.').to_string();
        self
    }

    pub fn follow_links(mut self, v: bool) -> Self {
        self.config.follow_links = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, LinkSpyError> {
        let c = &self.config;
        if c.markdown_extension.is_empty() {
            return Err(LinkSpyError::InvalidConfig(
                "markdown extension must not be empty".into(),
            ));
        }
        if c.attachments_subpath.is_absolute() {
            return Err(LinkSpyError::InvalidConfig(format!(
                "attachment folder must be relative to the vault root, got '{}'",
                c.attachments_subpath.display()
            )));
        }
        if c.trash_dir_name.is_empty() {
            return Err(LinkSpyError::InvalidConfig(
                "trash folder name must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which audit to run over the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckKind {
    /// Image embeds whose target file is missing. (default)
    #[default]
    BrokenImages,
    /// Image files in the attachment folder that no document references.
    UnusedAttachments,
    /// Wiki-links to notes that do not exist.
    MissingNotes,
}
