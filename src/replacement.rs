//! Replacement text producers for the substitution engine.
//!
//! A replacement is either a static template with sed-style backreferences
//! (`\1`, `\2`, ...) or a caller-supplied callable that receives the match
//! captures and returns the replacement text. Both answer the same question:
//! given one match, what text goes in its place?

use std::fmt;

use anyhow::anyhow;
use regex::Captures;

use crate::error::{Error, Result};

/// Callable replacement: receives the captures for one match, returns the
/// replacement text. Errors propagate out of `substitute` unchanged (after
/// the file under mutation has been restored from its backup).
pub type ReplacementFn = Box<dyn Fn(&Captures) -> anyhow::Result<String>>;

pub enum Replacement {
    /// Backreference template, already unescaped (`\\` collapsed to `\`).
    Template(String),
    Func(ReplacementFn),
}

impl Replacement {
    /// Build a template replacement. `\1`..`\9` expand to capture groups;
    /// `\\` is an escaped literal backslash and collapses before expansion.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into().replace("\\\\", "\\"))
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Captures) -> anyhow::Result<String> + 'static,
    {
        Self::Func(Box::new(f))
    }

    /// Produce the replacement text for one match.
    pub(crate) fn resolve(&self, caps: &Captures) -> Result<String> {
        match self {
            Self::Template(template) => expand_template(template, caps),
            Self::Func(f) => f(caps).map_err(Error::Replacement),
        }
    }
}

/// Expand `\<digit>` markers against the captures of one match.
///
/// Expansion happens against the match object, never by textual splicing
/// before matching: capture text is inserted verbatim and is not re-scanned
/// for further backreferences. A group the pattern does not define is an
/// error; a group that simply did not participate in this match expands to
/// the empty string.
fn expand_template(template: &str, caps: &Captures) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut rest = chars.clone();
        match rest.next() {
            Some(d) if d.is_ascii_digit() => {
                chars = rest;
                let index = d as usize - '0' as usize;
                if index >= caps.len() {
                    return Err(Error::Replacement(anyhow!(
                        "template references group {} but the pattern only captures {} group(s)",
                        index,
                        caps.len() - 1
                    )));
                }
                if let Some(group) = caps.get(index) {
                    out.push_str(group.as_str());
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

impl From<&str> for Replacement {
    fn from(template: &str) -> Self {
        Self::template(template)
    }
}

impl From<String> for Replacement {
    fn from(template: String) -> Self {
        Self::template(template)
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Func(_) => f.debug_tuple("Func").field(&"..").finish(),
        }
    }
}
