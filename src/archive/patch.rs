// src/archive/patch.rs
// =============================================================================
// This module finds a unified diff embedded in the body of a mail.
//
// Mails on patch lists usually look like:
//   some prose explaining the change
//   --- a/file            <- the patch starts here
//   +++ b/file
//   @@ -1,1 +1,1 @@
//   -old
//   +new
//
//   more prose, a signature...  <- and ends at the first non-diff line
//
// We don't parse hunks. A line belongs to the patch if it starts with one of
// the four unified-diff prefixes ('-', '+', '@', ' ') or is blank.
//
// Rust concepts:
// - Enums: The scanner is a two-state machine (Before / Within)
// - Option<String>: No patch is a normal outcome, not an error
// =============================================================================

// Where the scanner is relative to the patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Still reading prose, waiting for a "--- " line
    Before,
    /// Inside the patch, collecting lines
    Within,
}

/// Returns true if a (non-blank) line can be part of a unified diff.
pub fn is_diff_line(line: &str) -> bool {
    matches!(line.chars().next(), Some('-' | '+' | '@' | ' '))
}

// Extracts the patch from a mail body
//
// Parameters:
//   body: the mail body (as returned by message::segment)
//
// Returns: Some(patch) or None if the body has no "--- " line
//
// When prose follows the patch, trailing whitespace is trimmed and exactly
// one newline appended. When the patch runs to the end of the body it is
// returned exactly as collected.
pub fn extract_patch(body: &str) -> Option<String> {
    let mut state = ScanState::Before;
    let mut patch = String::new();

    for line in body.lines() {
        match state {
            ScanState::Before => {
                if line.starts_with("--- ") {
                    state = ScanState::Within;
                    patch.push_str(line);
                    patch.push('\n');
                }
            }
            ScanState::Within => {
                if line.is_empty() {
                    patch.push('\n');
                } else if is_diff_line(line) {
                    patch.push_str(line);
                    patch.push('\n');
                } else {
                    let mut patch = patch.trim_end().to_string();
                    patch.push('\n');
                    return Some(patch);
                }
            }
        }
    }

    match state {
        ScanState::Within => Some(patch),
        ScanState::Before => None,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an enum instead of a bool?
//    - `within_patch: bool` would work, but an enum names each state
//    - match forces us to handle every state explicitly
//    - Adding a third state later would be a compile error until handled
//
// 2. What does matches! do?
//    - matches!(value, pattern) returns true if value fits the pattern
//    - Some('-' | '+' | '@' | ' ') matches any of the four characters
//    - An empty string gives None from chars().next(), so it never matches
//
// 3. Why does `let mut patch = ...` inside the loop not clash?
//    - It shadows the outer `patch` for the rest of that block
//    - We return right away, so the outer one is never used again
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_followed_by_prose() {
        let body = "intro line\n\
                    --- a/file\n\
                    +++ b/file\n\
                    @@ -1,1 +1,1 @@\n\
                    -old\n\
                    +new\n\
                    \n\
                    trailing prose\n";

        let patch = extract_patch(body);

        assert_eq!(
            patch.as_deref(),
            Some("--- a/file\n+++ b/file\n@@ -1,1 +1,1 @@\n-old\n+new\n")
        );
    }

    #[test]
    fn test_no_patch() {
        assert_eq!(extract_patch("hello\nworld\n"), None);
        assert_eq!(extract_patch(""), None);
        // "---" without the space is not a patch start
        assert_eq!(extract_patch("---\n+++ b/file\n"), None);
        assert_eq!(extract_patch("---a/file\n"), None);
    }

    #[test]
    fn test_patch_to_end_of_body_kept_verbatim() {
        let body = "prose\n--- a/f\n+++ b/f\n@@ -1 +1 @@\n-x\n+y\n\n\n";

        let patch = extract_patch(body);

        // Blank lines at the end are not trimmed in this case
        assert_eq!(patch.as_deref(), Some("--- a/f\n+++ b/f\n@@ -1 +1 @@\n-x\n+y\n\n\n"));
    }

    #[test]
    fn test_body_without_final_newline() {
        let patch = extract_patch("--- a/f\n+++ b/f");
        assert_eq!(patch.as_deref(), Some("--- a/f\n+++ b/f\n"));
    }

    #[test]
    fn test_blank_lines_inside_patch_are_kept() {
        let body = "--- a/f\n+++ b/f\n@@ -1 +1 @@\n-x\n\n@@ -9 +9 @@\n+y\nThanks\n";

        let patch = extract_patch(body);

        assert_eq!(
            patch.as_deref(),
            Some("--- a/f\n+++ b/f\n@@ -1 +1 @@\n-x\n\n@@ -9 +9 @@\n+y\n")
        );
    }

    #[test]
    fn test_tab_indented_line_ends_patch() {
        let body = "--- a/f\n+++ b/f\n \tcontext\n\tnot diff\n+later\n";

        let patch = extract_patch(body);

        assert_eq!(patch.as_deref(), Some("--- a/f\n+++ b/f\n \tcontext\n"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let body = "Here it is:\n\n--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n context\n-a\n\n+b\n\nBye\n";

        let first = extract_patch(body).unwrap();
        let second = extract_patch(&first).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_mail_from_gcc_patches_archive() {
        // gcc-patches 1998-05/msg00053; the " " lines are whitespace-only
        // context lines and must stay inside the patch
        let body = concat!(
            "The \"trampolines\" paper is no longer available from the location mentioned\n",
            "in the documentation. One of the Debian developers obtained a copy and made\n",
            "it available on the web.\n",
            "\n",
            "--- egcs-1.0.3a.orig/gcc/extend.texi\n",
            "+++ egcs-1.0.3a/gcc/extend.texi\n",
            "@@ -367,8 +367,7 @@\n",
            " \n",
            " GNU CC implements taking the address of a nested function using a\n",
            " technique called @dfn{trampolines}.  A paper describing them is\n",
            "-available from @samp{maya.idiap.ch} in directory @file{pub/tmb},\n",
            "-file @file{usenix88-lexic.ps.Z}.\n",
            "+available as @samp{<A  HREF=\"http://master.debian.org/~karlheg/Usenix88-lexic.pdf}\">http://master.debian.org/~karlheg/Usenix88-lexic.pdf}</A>.\n",
            " \n",
            " A nested function can jump to a label inherited from a containing\n",
            " function, provided the label was explicitly declared in the containing\n",
            "\n",
            "\n",
            "You might want to consider making it available through a more persistent URL\n",
            "(e.g. on the cygnus site).\n",
            "\n",
            "Greetings,\n",
            "Ray\n",
            "-- \n",
            "Tevens ben ik van mening dat Nederland overdekt dient te worden.\n",
        );
        let expected = concat!(
            "--- egcs-1.0.3a.orig/gcc/extend.texi\n",
            "+++ egcs-1.0.3a/gcc/extend.texi\n",
            "@@ -367,8 +367,7 @@\n",
            " \n",
            " GNU CC implements taking the address of a nested function using a\n",
            " technique called @dfn{trampolines}.  A paper describing them is\n",
            "-available from @samp{maya.idiap.ch} in directory @file{pub/tmb},\n",
            "-file @file{usenix88-lexic.ps.Z}.\n",
            "+available as @samp{<A  HREF=\"http://master.debian.org/~karlheg/Usenix88-lexic.pdf}\">http://master.debian.org/~karlheg/Usenix88-lexic.pdf}</A>.\n",
            " \n",
            " A nested function can jump to a label inherited from a containing\n",
            " function, provided the label was explicitly declared in the containing\n",
        );

        let patch = extract_patch(body);

        assert_eq!(patch.as_deref(), Some(expected));
    }

    #[test]
    fn test_space_only_context_line_is_diff_line() {
        let body = "--- a\n+++ b\n@@ -1 +1 @@\n \n GNU\n-old\n+new\n \n A\n\n\nYou might\n";

        let patch = extract_patch(body);

        assert!(is_diff_line(" "));
        assert_eq!(
            patch.as_deref(),
            Some("--- a\n+++ b\n@@ -1 +1 @@\n \n GNU\n-old\n+new\n \n A\n")
        );
    }
}
