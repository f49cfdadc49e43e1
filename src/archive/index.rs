// src/archive/index.rs
// =============================================================================
// This module reads an archive index page (e.g. one month of gcc-patches)
// and yields the URL of every mail it lists.
//
// We use the `scraper` crate to parse the page and select <a href=...>
// elements, then keep only links that look like "msg00053.html". Each one is
// resolved against the index page's own URL with the `url` crate.
//
// Rust concepts:
// - Iterators: message_urls() is lazy, nothing runs until it's consumed
// - Lifetimes: The iterator borrows the parsed page ('_)
// =============================================================================

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

fn message_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^msg[0-9]+\.html").expect("valid message link regex"))
}

/// A parsed archive index page.
pub struct IndexPage {
    base: Url,
    document: Html,
    anchors: Selector,
}

impl IndexPage {
    pub fn parse(base: Url, html: &str) -> Self {
        Self {
            base,
            document: Html::parse_document(html),
            // "a[href]" is a constant, known-good selector
            anchors: Selector::parse("a[href]").expect("valid anchor selector"),
        }
    }

    /// The URL the page was fetched from.
    pub fn base(&self) -> &Url {
        &self.base
    }

    // Yields the mail URLs in the order they appear on the page
    //
    // Links that don't start with "msgNNNN.html" (thread views, author
    // listings, next/prev month...) are skipped.
    pub fn message_urls(&self) -> impl Iterator<Item = Url> + '_ {
        self.document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| message_link().is_match(href))
            .filter_map(|href| self.base.join(href).ok())
    }
}

// Parses the index URL given on the command line
//
// Mail links are relative ("msg00053.html"), so the index URL must name the
// month directory with a trailing slash for them to resolve inside it:
//   https://gcc.gnu.org/ml/gcc-patches/1998-05   -> adds the '/'
//   https://gcc.gnu.org/ml/gcc-patches/1998-05/  -> unchanged
//   https://example.org/list/2001-01/index.html  -> unchanged (it's a file)
pub fn index_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| anyhow!("Invalid index URL '{}': {}", raw, e))?;

    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
        .to_string();

    if !last_segment.is_empty() && !last_segment.contains('.') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
