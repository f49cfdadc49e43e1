// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and the cached fetcher
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results as a table/list or JSON
// 5. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - async/await: Fetching pages is network I/O
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// The parsing, fetching and scraping live in the library (src/lib.rs);
// only the command-line definition is private to the binary
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, GlobalOpts};
use patch_finder::fetch::{CacheStats, CachedFetcher, DiskStore, HttpFetcher};
use patch_finder::scrape::{self, MailReport, MailStatus};
use patch_finder::{archive, logging};
use tracing::info;

type ArchiveFetcher = CachedFetcher<HttpFetcher, DiskStore>;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose)?;

    let fetcher = build_fetcher(&cli.global)?;

    let code = match cli.command {
        Commands::Index { index_url, json } => handle_index(&fetcher, &index_url, json).await?,
        Commands::Mail {
            mail_url,
            json,
            show_body,
        } => handle_mail(&fetcher, &mail_url, json, show_body).await?,
        Commands::Scan {
            index_url,
            json,
            limit,
            patches_only,
        } => handle_scan(&fetcher, &index_url, json, limit, patches_only).await?,
    };

    let stats = fetcher.stats();
    info!(hits = stats.hits, misses = stats.misses, "cache statistics");

    Ok(code)
}

fn build_fetcher(opts: &GlobalOpts) -> Result<ArchiveFetcher> {
    let http = HttpFetcher::new(&opts.fetch_config()).context("failed to create HTTP client")?;
    Ok(CachedFetcher::new(http, DiskStore::new(&opts.cache_dir)))
}

// Handles the 'index' subcommand: prints one mail URL per line
async fn handle_index(fetcher: &ArchiveFetcher, index_url: &str, json: bool) -> Result<i32> {
    let index_url = archive::index_base_url(index_url)?;
    let html = fetcher
        .get(index_url.as_str())
        .await
        .with_context(|| format!("failed to fetch index {}", index_url))?;

    let page = archive::IndexPage::parse(index_url, &html);
    let urls: Vec<String> = page.message_urls().map(String::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else {
        for url in &urls {
            println!("{}", url);
        }
        eprintln!("📄 {} mail(s) listed on {}", urls.len(), page.base());
    }

    Ok(0)
}

// Handles the 'mail' subcommand: subject, optional body, then the patch
async fn handle_mail(fetcher: &ArchiveFetcher, mail_url: &str, json: bool, show_body: bool) -> Result<i32> {
    let mut report = scrape::scrape_mail(fetcher, mail_url).await;
    if !show_body {
        report = report.without_body();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(mail_exit_code(&report));
    }

    if let Some(message) = &report.message {
        eprintln!("Error: could not fetch {}: {}", mail_url, message);
        return Ok(mail_exit_code(&report));
    }

    println!("Subject: {}", report.subject.as_deref().unwrap_or("(none)"));
    if let Some(body) = &report.body {
        println!("\n{}\n", body);
    }
    match (&report.status, &report.patch) {
        (MailStatus::NoBody, _) => println!("⚠️  Page has no message body"),
        (_, Some(patch)) => print!("\n{}", patch),
        (_, None) => println!("No patch found"),
    }

    Ok(0)
}

// A mail that couldn't be fetched is an error (2) whatever the output format;
// a mail without body or patch is still a successful lookup
fn mail_exit_code(report: &MailReport) -> i32 {
    match report.status {
        MailStatus::FetchFailed => 2,
        _ => 0,
    }
}

// Handles the 'scan' subcommand
async fn handle_scan(
    fetcher: &ArchiveFetcher,
    index_url: &str,
    json: bool,
    limit: Option<usize>,
    patches_only: bool,
) -> Result<i32> {
    let index_url = archive::index_base_url(index_url)?;
    eprintln!("🔍 Scanning archive index: {}", index_url);

    let mut reports = scrape::scrape_index(fetcher, &index_url, limit).await?;
    if patches_only {
        reports.retain(MailReport::has_patch);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&reports, fetcher.stats());
    }

    Ok(0)
}

// Prints scan results as a human-readable table
fn print_table(reports: &[MailReport], stats: CacheStats) {
    println!("{:<20} {:<12} {:<8} {:<50}", "MAIL", "STATUS", "LINES", "SUBJECT");
    println!("{}", "=".repeat(93));

    for report in reports {
        let name = report.url.rsplit('/').next().unwrap_or(&report.url);
        let lines = report
            .patch
            .as_deref()
            .map(|p| p.lines().count().to_string())
            .unwrap_or_default();
        let subject = report
            .subject
            .as_deref()
            .or(report.message.as_deref())
            .unwrap_or("");

        println!(
            "{:<20} {:<12} {:<8} {:<50}",
            name,
            format_status(&report.status),
            lines,
            truncate(subject, 50)
        );
    }

    println!();

    let patches = reports.iter().filter(|r| r.has_patch()).count();
    let failed = reports
        .iter()
        .filter(|r| r.status == MailStatus::FetchFailed)
        .count();

    println!("📊 Summary:");
    println!("   🩹 With patch: {}", patches);
    println!("   ❌ Failed: {}", failed);
    println!("   📋 Total: {}", reports.len());
    println!("   💾 Cache hits: {}, GETs: {}", stats.hits, stats.misses);
}

fn format_status(status: &MailStatus) -> &'static str {
    match status {
        MailStatus::Patch => "PATCH",
        MailStatus::NoPatch => "-",
        MailStatus::NoBody => "NO BODY",
        MailStatus::FetchFailed => "FAILED",
    }
}

// Shortens a string to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
