//! clipfetch core: fetch clips over HTTP and remux each through ffmpeg,
//! one worker thread per clip, joined on a completion barrier.

pub mod config;
pub mod logging;

pub mod barrier;
pub mod fetch;
pub mod job;
pub mod output;
pub mod report;
pub mod runner;
pub mod transcode;

pub use job::{Job, JobError, JobOutcome, JobReport};
pub use runner::{RunSummary, Runner};
