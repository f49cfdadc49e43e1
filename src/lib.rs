// src/lib.rs
// =============================================================================
// Library half of patch-finder: everything except the command line.
//
// Modules:
// - archive: Parse MHonArc index pages and archived mails, find patches
// - fetch: Download pages through an on-disk cache
// - scrape: Glue the two together, one mail at a time
// - logging: tracing setup shared by the binary
// =============================================================================

pub mod archive;
pub mod fetch;
pub mod logging;
pub mod scrape;
