//! Pipeline stages for a vault scan.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own against a throwaway directory.
//!
//! ## Data Flow
//!
//! ```text
//! paths ──▶ collect ──▶ extract ──▶ validate
//! (normalise) (walk)    (regex)     (resolve + stat)
//! ```
//!
//! 1. [`paths`]    — absolute, lexically normalised root, attachment and
//!    trash folders
//! 2. [`collect`]  — walk the vault for documents (or attachments), pruning
//!    the trash folder; unreadable entries are recorded, not fatal
//! 3. [`extract`]  — pull wiki-link targets out of a line
//! 4. [`validate`] — read a document line by line and check each image
//!    target is a regular file
//! 5. [`notes`]    — the same for links to other notes

pub mod collect;
pub mod extract;
pub mod notes;
pub mod paths;
pub mod validate;
