// src/archive/mod.rs
// =============================================================================
// This module understands the pages of an MHonArc mailing-list archive.
//
// Submodules:
// - index: Lists the mails linked from a monthly index page
// - message: Splits one archived mail into subject and body
// - patch: Finds the unified diff inside a mail body
//
// message and patch are pure text processing: no I/O, no async. They are fed
// by the fetch module and can be tested with plain strings.
// =============================================================================

mod index;
mod message;
mod patch;

pub use index::{index_base_url, IndexPage};
pub use message::{segment, Message, SectionMap, BODY_SECTION, PREAMBLE};
pub use patch::{extract_patch, is_diff_line};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_then_extract() {
        let page = "<!--X-Subject: [PATCH] fix typo -->\n\
                    <!--X-Head-of-Message-->\n\
                    <ul><li>From: someone</li></ul>\n\
                    <!--X-Body-of-Message-->\n\
                    <PRE>\n\
                    Obvious fix.\n\
                    \n\
                    --- a/README\n\
                    +++ b/README\n\
                    @@ -1 +1 @@\n\
                    -teh\n\
                    +the\n\
                    \n\
                    Thanks\n\
                    </PRE>\n\
                    \n\
                    <!--X-Body-of-Message-End-->\n";

        let message = segment(page);
        assert_eq!(message.subject.as_deref(), Some("[PATCH] fix typo"));

        let body = message.body.unwrap();
        assert!(body.starts_with("Obvious fix."));
        assert!(body.ends_with("Thanks"));

        let patch = extract_patch(&body);
        assert_eq!(
            patch.as_deref(),
            Some("--- a/README\n+++ b/README\n@@ -1 +1 @@\n-teh\n+the\n")
        );
    }
}
