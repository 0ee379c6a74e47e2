//! Sed delimiter rewriting.
//!
//! Finds sed substitution commands embedded in file content, e.g. lines that
//! look like `s/foo/bar/g`, and rewrites their delimiter character. Three
//! syntactic forms are recognized: a bare command spanning a whole line, and
//! the same command wrapped in single or double quotes. Each form gets its
//! own fixed pattern and its own full pass over the file set, which avoids a
//! single fragile regex with nested alternation for "command, possibly
//! quoted". The actual file mutation is delegated to the substitution
//! engine, so each pass inherits its backup and rollback behavior.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::substitute::substitute;

/// One detection pattern plus the canonical rewrite for its form.
struct DelimiterPass {
    pattern: String,
    replacement: String,
}

/// Rewrite the delimiter of every sed substitution command found in `files`
/// from `old_delim` to `new_delim`, normalizing flags to a trailing `g` and
/// keeping each command's quote style.
///
/// Quote characters cannot be delimiters; passing `'` or `"` for either
/// argument fails with [`Error::InvalidDelimiter`] before any file is
/// touched. Commands with flags other than `g`, `I`, `p` are not recognized
/// and are left alone.
///
/// The three passes run in fixed order (bare, single-quoted, double-quoted),
/// each across the whole file list. A failure mid-pass restores only the
/// file being rewritten at that moment; earlier files and earlier passes
/// have already committed.
pub fn rewrite_delimiter<P: AsRef<Path>>(
    old_delim: char,
    new_delim: char,
    files: &[P],
) -> Result<()> {
    for delim in [old_delim, new_delim] {
        if delim == '\'' || delim == '"' {
            return Err(Error::InvalidDelimiter(delim));
        }
    }

    for (form, pass) in build_passes(old_delim, new_delim) {
        debug!(form, pattern = %pass.pattern, "rewriting delimiters");
        substitute(&pass.pattern, pass.replacement, files)?;
    }
    Ok(())
}

fn build_passes(old_delim: char, new_delim: char) -> [(&'static str, DelimiterPass); 3] {
    // The old delimiter is spliced into the patterns both inside and outside
    // character classes; regex escaping is valid in either position.
    let d = regex::escape(&old_delim.to_string());
    let n = new_delim;

    // Canonical rewrite: fields carried over by backreference, flags
    // normalized to `g`.
    let canonical = format!(r"s{n}\1{n}\2{n}g");

    // A whole line of exactly `s<d>field<d>field<d>` plus optional flags.
    // Fields are "anything but the delimiter", so greediness is irrelevant.
    let bare = DelimiterPass {
        pattern: format!(r"^s{d}([^{d}]*){d}([^{d}]*){d}[gIp]*$"),
        replacement: canonical.clone(),
    };

    // Quoted forms may appear anywhere on a line. Fields admit an escaped
    // quote or any character that is neither the delimiter nor a quote.
    let single_quoted = DelimiterPass {
        pattern: format!(r"'s{d}((?:\\'|[^{d}'])*){d}((?:\\'|[^{d}'])*){d}[gIp]*'"),
        replacement: format!("'{canonical}'"),
    };
    let double_quoted = DelimiterPass {
        pattern: format!(r#""s{d}((?:\\"|[^{d}"])*){d}((?:\\"|[^{d}"])*){d}[gIp]*""#),
        replacement: format!("\"{canonical}\""),
    };

    [
        ("bare", bare),
        ("single_quoted", single_quoted),
        ("double_quoted", double_quoted),
    ]
}
