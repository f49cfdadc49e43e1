// src/scrape/mail.rs
// =============================================================================
// This module scrapes archived mails and reports what it found in each.
//
// For every mail we record:
// - the URL
// - the subject (if the page declared one)
// - the patch (if the body contains one)
// - a status saying how it went
//
// Rust concepts:
// - Streams: futures::stream::iter + then() awaits one mail after another
// - serde(tag/flatten): The status enum becomes a "status" field in JSON
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::archive::{extract_patch, segment, IndexPage};
use crate::fetch::{CachedFetcher, Fetch, Store};

// What happened when we scraped one mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MailStatus {
    /// The body contains a patch
    Patch,
    /// The body has no "--- " line
    NoPatch,
    /// The page has no Body-of-Message section
    NoBody,
    /// The page could not be fetched
    FetchFailed,
}

// The result of scraping a single mail
#[derive(Debug, Clone, Serialize)]
pub struct MailReport {
    pub url: String,
    #[serde(flatten)]
    pub status: MailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    /// Error details for FetchFailed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MailReport {
    fn failed(url: &str, message: String) -> Self {
        Self {
            url: url.to_string(),
            status: MailStatus::FetchFailed,
            subject: None,
            body: None,
            patch: None,
            message: Some(message),
        }
    }

    pub fn has_patch(&self) -> bool {
        self.status == MailStatus::Patch
    }

    /// Drops the body; scan reports only carry subject and patch.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }
}

// Fetches one archived mail and pulls out subject, body and patch
//
// Never fails: problems are reported through MailReport::status.
pub async fn scrape_mail<F: Fetch, S: Store>(fetcher: &CachedFetcher<F, S>, url: &str) -> MailReport {
    let html = match fetcher.get(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(%url, error = %e, "failed to fetch mail");
            return MailReport::failed(url, e.to_string());
        }
    };

    let message = segment(&html);
    let patch = message.body.as_deref().and_then(extract_patch);

    let status = match (&message.body, &patch) {
        (None, _) => {
            warn!(%url, "page has no message body");
            MailStatus::NoBody
        }
        (Some(_), Some(_)) => MailStatus::Patch,
        (Some(_), None) => MailStatus::NoPatch,
    };

    MailReport {
        url: url.to_string(),
        status,
        subject: message.subject,
        body: message.body,
        patch,
        message: None,
    }
}

// Scrapes every mail listed on an archive index page
//
// Parameters:
//   fetcher: cached fetcher used for the index and every mail
//   index_url: the index page (see archive::index_base_url)
//   limit: only look at the first N mails, if set
//
// Returns: one report per mail, in index order. Only a failure to get the
// index page itself is an error.
pub async fn scrape_index<F: Fetch, S: Store>(
    fetcher: &CachedFetcher<F, S>,
    index_url: &Url,
    limit: Option<usize>,
) -> Result<Vec<MailReport>> {
    let html = fetcher
        .get(index_url.as_str())
        .await
        .with_context(|| format!("failed to fetch index {}", index_url))?;

    // The parsed page is dropped before we start awaiting mail fetches
    let mail_urls: Vec<Url> = {
        let page = IndexPage::parse(index_url.clone(), &html);
        page.message_urls().take(limit.unwrap_or(usize::MAX)).collect()
    };
    info!(index = %index_url, mails = mail_urls.len(), "index scanned");

    let reports: Vec<MailReport> = stream::iter(mail_urls)
        .then(move |url| async move { scrape_mail(fetcher, url.as_str()).await.without_body() })
        .collect()
        .await;

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, MemoryStore};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    const INDEX: &str = "https://gcc.gnu.org/ml/gcc-patches/1998-05/";

    struct FakeArchive {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetch for FakeArchive {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::status(url, StatusCode::NOT_FOUND))
        }
    }

    fn mail_page(subject: &str, body: &str) -> String {
        format!(
            "<!--X-Subject: {subject} -->\n<!--X-Body-of-Message-->\n<PRE>\n{body}\n</PRE>\n\n<!--X-Body-of-Message-End-->\n"
        )
    }

    fn archive() -> CachedFetcher<FakeArchive, MemoryStore> {
        let index = r#"
            <ul>
            <li><a href="msg00003.html">missing</a></li>
            <li><a href="msg00002.html">no body</a></li>
            <li><a href="msg00001.html">question</a></li>
            <li><a href="msg00000.html">patch</a></li>
            </ul>
            <a href="threads.html">threads</a>
        "#;

        let mut pages = HashMap::new();
        pages.insert(INDEX.to_string(), index.to_string());
        pages.insert(
            format!("{INDEX}msg00000.html"),
            mail_page("PATCH: fix typo", "Fix.\n--- a/f\n+++ b/f\n@@ -1 +1 @@\n-teh\n+the\n\nThanks"),
        );
        pages.insert(
            format!("{INDEX}msg00001.html"),
            mail_page("Question about -O2", "Why is it slow?"),
        );
        pages.insert(format!("{INDEX}msg00002.html"), "<html>moved</html>\n".to_string());

        CachedFetcher::new(FakeArchive { pages }, MemoryStore::new())
    }

    #[tokio::test]
    async fn test_scrape_mail_with_patch() {
        let fetcher = archive();

        let report = scrape_mail(&fetcher, &format!("{INDEX}msg00000.html")).await;

        assert_eq!(report.status, MailStatus::Patch);
        assert_eq!(report.subject.as_deref(), Some("PATCH: fix typo"));
        assert_eq!(report.patch.as_deref(), Some("--- a/f\n+++ b/f\n@@ -1 +1 @@\n-teh\n+the\n"));
        assert!(report.body.unwrap().starts_with("Fix."));
    }

    #[tokio::test]
    async fn test_scrape_index_reports_every_mail() {
        let fetcher = archive();
        let index = Url::parse(INDEX).unwrap();

        let reports = scrape_index(&fetcher, &index, None).await.unwrap();

        let statuses: Vec<_> = reports.iter().map(|r| r.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![
                MailStatus::FetchFailed,
                MailStatus::NoBody,
                MailStatus::NoPatch,
                MailStatus::Patch,
            ]
        );
        assert!(reports[0].message.as_deref().unwrap().contains("404"));
        assert_eq!(reports[2].subject.as_deref(), Some("Question about -O2"));
        assert!(reports.iter().all(|r| r.body.is_none()));
        assert_eq!(reports.iter().filter(|r| r.has_patch()).count(), 1);
    }

    #[tokio::test]
    async fn test_scrape_index_limit_and_cache() {
        let fetcher = archive();
        let index = Url::parse(INDEX).unwrap();

        let first = scrape_index(&fetcher, &index, Some(2)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].url, format!("{INDEX}msg00002.html"));

        // Second pass reads the index and the mail from the cache
        scrape_index(&fetcher, &index, Some(2)).await.unwrap();
        let stats = fetcher.stats();
        assert_eq!(stats.hits, 2);
        // index + msg00003 (failed) + msg00002, then msg00003 again
        assert_eq!(stats.misses, 4);
    }

    #[tokio::test]
    async fn test_missing_index_is_an_error() {
        let fetcher = CachedFetcher::new(
            FakeArchive {
                pages: HashMap::new(),
            },
            MemoryStore::new(),
        );
        let index = Url::parse(INDEX).unwrap();

        assert!(scrape_index(&fetcher, &index, None).await.is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let report = MailReport {
            url: "u".to_string(),
            status: MailStatus::NoPatch,
            subject: Some("s".to_string()),
            body: None,
            patch: None,
            message: None,
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json, serde_json::json!({"url": "u", "status": "no_patch", "subject": "s"}));
    }
}
