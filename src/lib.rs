//! linesub: line-oriented regex substitution for files, with automatic
//! backups and rollback, plus sed delimiter rewriting built on top of it.
//!
//! [`substitute`] filters every line of one or more files through a regex,
//! replacing matches from a backreference template or a callable. Before a
//! file is touched it is copied to `<file>~`; on failure the backup is moved
//! back, on success it stays behind. [`rewrite_delimiter`] recognizes sed
//! substitution commands embedded in file content (bare, single-quoted, or
//! double-quoted) and rewrites their delimiter character.

pub mod delimiter;
pub mod error;
pub mod replacement;
pub mod substitute;

pub use delimiter::rewrite_delimiter;
pub use error::{Error, Result};
pub use replacement::{Replacement, ReplacementFn};
pub use substitute::{backup_path, substitute};
