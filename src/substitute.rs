//! The substitution engine: regex find-and-replace over every line of one
//! or more files, with backup-and-restore on failure.
//!
//! Each file is copied to `<file>~` before mutation (the copy carries the
//! permission bits), then rewritten in place from the backup. On success the
//! backup stays on disk; on any failure after the backup exists, the backup
//! is moved back over the target so the file is never left corrupted
//! relative to its pre-call state.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::replacement::Replacement;

/// Apply `pattern`/`replacement` to every line of every file, in the order
/// given, one file fully completed before the next starts.
///
/// All non-overlapping matches on a line are replaced. `replacement` is
/// anything convertible into [`Replacement`]: a template string with `\1`,
/// `\2`, ... backreferences, or a callable built with [`Replacement::func`].
///
/// A malformed pattern fails with [`Error::Pattern`] before any file is
/// touched. Failures while rewriting a file restore that file from its
/// backup and propagate; files earlier in the list stay mutated.
pub fn substitute<R, P>(pattern: &str, replacement: R, files: &[P]) -> Result<()>
where
    R: Into<Replacement>,
    P: AsRef<Path>,
{
    let re = Regex::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let replacement = replacement.into();

    for file in files {
        filter_file(&re, &replacement, file.as_ref())?;
    }
    Ok(())
}

/// Path of the sibling backup: the file name with `~` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push("~");
    PathBuf::from(name)
}

fn filter_file(re: &Regex, replacement: &Replacement, path: &Path) -> Result<()> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|source| Error::io("back up", path, source))?;
    debug!(file = %path.display(), backup = %backup.display(), "created backup");

    match rewrite_from_backup(re, replacement, path, &backup) {
        Ok(lines) => {
            debug!(file = %path.display(), lines, "rewrote file");
            Ok(())
        }
        Err(err) => {
            // The target may be truncated or half written; put the backup
            // back before surfacing the error.
            if let Err(restore_err) = fs::rename(&backup, path) {
                error!(
                    file = %path.display(),
                    %restore_err,
                    "could not restore backup after failed rewrite"
                );
            } else {
                debug!(file = %path.display(), "restored original from backup");
            }
            Err(err)
        }
    }
}

fn rewrite_from_backup(
    re: &Regex,
    replacement: &Replacement,
    target: &Path,
    backup: &Path,
) -> Result<u64> {
    let infile = File::open(backup).map_err(|source| Error::io("open", backup, source))?;
    let mut reader = BufReader::new(infile);
    let outfile = File::create(target).map_err(|source| Error::io("truncate", target, source))?;
    let mut writer = BufWriter::new(outfile);

    let mut line = String::new();
    let mut lines = 0u64;
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|source| Error::io("read", backup, source))?;
        if read == 0 {
            break;
        }

        // Match against the line content; the terminator (or its absence on
        // the last line) is carried through untouched.
        let (content, terminator) = split_line_terminator(&line);
        let replaced = replace_line(re, replacement, content)?;

        writer
            .write_all(replaced.as_bytes())
            .and_then(|()| writer.write_all(terminator.as_bytes()))
            .map_err(|source| Error::io("write", target, source))?;
        lines += 1;
    }

    writer
        .flush()
        .map_err(|source| Error::io("write", target, source))?;
    Ok(lines)
}

/// Split a line as produced by `read_line` into content and terminator,
/// recognizing `\n` and `\r\n`.
fn split_line_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// Replace all matches on one line, surfacing the first replacement failure.
///
/// `replace_all` cannot carry an error out of its closure, so the failure is
/// parked and checked once the scan finishes.
fn replace_line(re: &Regex, replacement: &Replacement, line: &str) -> Result<String> {
    let mut failure = None;
    let replaced = re.replace_all(line, |caps: &Captures| match replacement.resolve(caps) {
        Ok(text) => text,
        Err(err) => {
            if failure.is_none() {
                failure = Some(err);
            }
            String::new()
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}
