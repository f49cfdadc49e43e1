// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with Rust structs
// and attributes, and clap generates the parsing, --help and --version.
//
// Options that apply to every subcommand (cache directory, TLS, timeout,
// verbosity) are marked `global = true` and can also come from environment
// variables thanks to clap's "env" feature.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use patch_finder::fetch::FetchConfig;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "patch-finder",
    version,
    about = "Scrape a mailing-list archive, looking for patches",
    long_about = "patch-finder reads MHonArc mailing-list archives (such as gcc-patches), \
                  extracts the subject and body of each mail and pulls out any unified diff \
                  posted in it. Every page is cached on disk, so only the first run is slow."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

// Options shared by all subcommands
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Directory where fetched pages are cached
    #[arg(long, global = true, env = "PATCH_FINDER_CACHE_DIR", default_value = ".url-cache")]
    pub cache_dir: PathBuf,

    /// Accept invalid TLS certificates (some archive hosts need this)
    #[arg(long, global = true, env = "PATCH_FINDER_INSECURE")]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Log debug output (cache hits, HTTP statuses) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalOpts {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout),
            insecure: self.insecure,
            ..FetchConfig::default()
        }
    }
}

// This enum defines our subcommands (index, mail, scan)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the mails linked from an archive index page
    ///
    /// Example: patch-finder index https://gcc.gnu.org/ml/gcc-patches/1998-05/
    Index {
        /// URL of the monthly index page
        index_url: String,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Show the subject and patch of one archived mail
    ///
    /// Example: patch-finder mail https://gcc.gnu.org/ml/gcc-patches/1998-05/msg00053.html
    Mail {
        /// URL of the archived mail
        mail_url: String,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,

        /// Also print the full mail body
        #[arg(long)]
        show_body: bool,
    },

    /// Scrape every mail of an archive index and report the patches found
    ///
    /// Example: patch-finder scan https://gcc.gnu.org/ml/gcc-patches/1998-05/ --limit 20
    Scan {
        /// URL of the monthly index page
        index_url: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Only scrape the first N mails of the index
        #[arg(long)]
        limit: Option<usize>,

        /// Leave mails without a patch out of the output
        #[arg(long)]
        patches_only: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_global_flags() {
        let cli = Cli::try_parse_from([
            "patch-finder",
            "scan",
            "https://gcc.gnu.org/ml/gcc-patches/1998-05/",
            "--limit",
            "5",
            "--insecure",
            "--cache-dir",
            "/tmp/cache",
        ])
        .unwrap();

        assert!(cli.global.insecure);
        assert_eq!(cli.global.cache_dir, PathBuf::from("/tmp/cache"));
        match cli.command {
            Commands::Scan { limit, json, patches_only, .. } => {
                assert_eq!(limit, Some(5));
                assert!(!json);
                assert!(!patches_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_fetch_config_from_flags() {
        let cli = Cli::try_parse_from(["patch-finder", "--timeout", "5", "mail", "https://x/msg1.html"]).unwrap();

        let config = cli.global.fetch_config();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.insecure);
    }

    #[test]
    fn test_missing_url_is_rejected() {
        assert!(Cli::try_parse_from(["patch-finder", "index"]).is_err());
    }
}
