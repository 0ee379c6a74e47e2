//! Property-based tests for linesub.
//!
//! proptest drives the substitution engine and the delimiter rewriter with
//! generated inputs to check the invariants that matter: files only change
//! where the pattern matches, backups always capture the pre-call content,
//! and delimiter rewriting is a fixed point once applied.

use std::fs;
use tempfile::TempDir;

use linesub::{Replacement, backup_path, rewrite_delimiter, substitute};

use proptest::prelude::*;

// ============================================================================
// Property 1: files only change where the pattern matches
// ============================================================================

proptest! {
    /// A pattern that cannot match leaves the file byte-identical and the
    /// backup identical to it.
    #[test]
    fn prop_no_match_is_a_byte_identical_noop(
        lines in prop::collection::vec("[a-w ]{0,30}", 0..20)
    ) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        let content = lines.join("\n");
        fs::write(&file, &content).unwrap();

        substitute("[x-z]+", "REPLACED", &[&file]).unwrap();

        prop_assert_eq!(fs::read_to_string(&file).unwrap(), content.clone());
        prop_assert_eq!(fs::read_to_string(backup_path(&file)).unwrap(), content);
    }

    /// A template with no backreferences replaces every occurrence with the
    /// literal template text.
    #[test]
    fn prop_literal_template_replaces_every_occurrence(
        lines in prop::collection::vec("[a-z]{0,30}", 1..20)
    ) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        let content = lines.join("\n");
        fs::write(&file, &content).unwrap();

        let expected = content.matches("foo").count();

        substitute("foo", "QUUX", &[&file]).unwrap();

        let output = fs::read_to_string(&file).unwrap();
        prop_assert!(!output.contains("foo"));
        prop_assert_eq!(output.matches("QUUX").count(), expected);
    }

    /// The backup always holds the pre-call content, matched or not.
    #[test]
    fn prop_backup_captures_pre_call_content(
        lines in prop::collection::vec("[a-z]{1,30}", 1..20)
    ) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        let content = lines.join("\n");
        fs::write(&file, &content).unwrap();

        substitute("[aeiou]", "_", &[&file]).unwrap();

        prop_assert_eq!(fs::read_to_string(backup_path(&file)).unwrap(), content);
    }
}

// ============================================================================
// Property 2: backreference expansion resolves against the match
// ============================================================================

proptest! {
    /// `(a+)(b+)` with template `\2\1` swaps the two runs, whatever their
    /// lengths.
    #[test]
    fn prop_swapping_backreferences_swaps_runs(
        a in 1usize..20,
        b in 1usize..20
    ) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        fs::write(&file, format!("{}{}", "a".repeat(a), "b".repeat(b))).unwrap();

        substitute("(a+)(b+)", r"\2\1", &[&file]).unwrap();

        prop_assert_eq!(
            fs::read_to_string(&file).unwrap(),
            format!("{}{}", "b".repeat(b), "a".repeat(a))
        );
    }

    /// A callable and the equivalent template produce the same output.
    #[test]
    fn prop_callable_matches_equivalent_template(
        lines in prop::collection::vec("[a-z ]{0,30}", 1..10)
    ) {
        let dir = TempDir::new().unwrap();
        let by_template = dir.path().join("template.txt");
        let by_callable = dir.path().join("callable.txt");
        let content = lines.join("\n");
        fs::write(&by_template, &content).unwrap();
        fs::write(&by_callable, &content).unwrap();

        substitute("([a-z])o", r"<\1>", &[&by_template]).unwrap();
        let wrap = Replacement::func(|caps| Ok(format!("<{}>", &caps[1])));
        substitute("([a-z])o", wrap, &[&by_callable]).unwrap();

        prop_assert_eq!(
            fs::read_to_string(&by_template).unwrap(),
            fs::read_to_string(&by_callable).unwrap()
        );
    }
}

// ============================================================================
// Property 3: delimiter rewriting is canonical and stable
// ============================================================================

proptest! {
    /// A bare sed command rewrites to the new delimiter with flags
    /// normalized to `g`, and a second rewrite is a no-op.
    #[test]
    fn prop_bare_rewrite_is_canonical_and_stable(
        field1 in "[a-z]{1,10}",
        field2 in "[a-z]{0,10}",
        flags in "[gIp]{0,3}"
    ) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cmds.txt");
        fs::write(&file, format!("s/{field1}/{field2}/{flags}\n")).unwrap();

        rewrite_delimiter('/', '@', &[&file]).unwrap();
        let once = fs::read_to_string(&file).unwrap();
        prop_assert_eq!(&once, &format!("s@{field1}@{field2}@g\n"));

        rewrite_delimiter('@', '@', &[&file]).unwrap();
        prop_assert_eq!(fs::read_to_string(&file).unwrap(), once);
    }
}
