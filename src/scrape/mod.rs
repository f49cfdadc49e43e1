// src/scrape/mod.rs
// =============================================================================
// This module ties fetching and parsing together.
//
// Flow for one index page:
//   index URL -> fetch -> IndexPage -> mail URLs
//   each mail URL -> fetch -> segment -> (subject, body) -> extract_patch
//
// Mails are processed one at a time. A mail that fails (network error, page
// without a body) becomes a row in the report; it never stops the scan.
// =============================================================================

mod mail;

pub use mail::{scrape_index, scrape_mail, MailReport, MailStatus};
