//! CLI for clipfetch: `clipfetch [URL]...`.

use std::ffi::OsString;

use anyhow::Result;
use clap::Parser;
use clipfetch_core::config::{self, ClipfetchConfig};
use clipfetch_core::{Job, Runner};

/// Fetch clips and remux each one with ffmpeg, all at once.
///
/// Every argument is a URL, including ones that start with `-`; there are no flags.
#[derive(Debug, Parser)]
#[command(name = "clipfetch")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Clip URLs, fetched concurrently. Kept as raw OS strings so a non-UTF-8
    /// argument becomes a failed job instead of a usage error.
    #[arg(
        num_args = 0..,
        allow_hyphen_values = true,
        trailing_var_arg = true,
        value_parser = clap::value_parser!(OsString)
    )]
    pub urls: Vec<OsString>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    /// One job per argument, in order. Invalid UTF-8 is replaced with U+FFFD.
    pub fn jobs(&self) -> Vec<Job> {
        Job::from_urls(self.urls.iter().map(|u| u.to_string_lossy().into_owned()))
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init().unwrap_or_else(|e| {
            tracing::warn!("using default config: {:#}", e);
            ClipfetchConfig::default()
        });
        tracing::debug!("loaded config: {:?}", cfg);

        let runner = Runner::from_config(&cfg);
        let summary = runner.run(self.jobs());
        tracing::debug!(
            jobs = summary.len(),
            failed = summary.failed(),
            "run complete"
        );
        Ok(())
    }
}
