//! # linkspy
//!
//! Audit a vault of markdown notes for wiki-link rot.
//!
//! Notes written in Obsidian-style vaults embed images as `[[photo.png]]` or
//! `![[photo.png|caption]]`. When a file is renamed, moved or deleted the
//! embed silently breaks. linkspy walks the vault, reads every document line
//! by line and reports each embed whose target is not a file on disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! vault root
//!  │
//!  ├─ 1. Paths     absolute, normalised root / attachment / trash folders
//!  ├─ 2. Collect   walk for *.md, pruning the trash folder
//!  ├─ 3. Extract   [[name.ext|alias]] targets per line
//!  ├─ 4. Validate  resolve against attachments or root, stat the file
//!  └─ 5. Report    per-document outcomes + totals (text or JSON)
//! ```
//!
//! A bare name (`cat.png`) resolves inside the attachment folder; a name
//! with a folder in it (`figs/cat.png`) resolves against the vault root.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linkspy::{scan, ScanConfig};
//!
//! let config = ScanConfig::builder("/home/me/vault")
//!     .attachments_subpath("Assets/Attachments")
//!     .build()
//!     .unwrap();
//! let report = scan(&config);
//! for broken in report.findings() {
//!     println!("{broken}");
//! }
//! println!("Total broken links found: {}", report.stats.total_findings);
//! ```
//!
//! ## Other checks
//!
//! | Function | Finds |
//! |----------|-------|
//! | [`scan`] | image embeds whose file is missing |
//! | [`find_unused_attachments`] | images in the attachment folder nobody embeds |
//! | [`find_missing_notes`] | `[[Note]]` links to notes that do not exist |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `linkspy` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scan;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CheckKind, ScanConfig, ScanConfigBuilder};
pub use error::{DocumentError, LinkSpyError};
pub use output::{
    to_json, BrokenLink, DocumentOutcome, DocumentReport, Finding, MissingNote,
    MissingNotesReport, ScanReport, ScanStats, UnusedAttachmentsReport,
};
pub use progress::{NoopProgressCallback, ProgressCallback, ScanProgressCallback};
pub use scan::{find_missing_notes, find_unused_attachments, scan, write_report};
pub use stream::{scan_documents, scan_note_links, DocumentScan};
