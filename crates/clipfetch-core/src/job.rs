//! Job model: one URL per job, identified by its position on the command line.

use std::fmt;
use std::path::PathBuf;

use crate::fetch::FetchError;
use crate::transcode::TranscodeError;

/// One unit of work. Not deduplicated and not validated; a malformed URL
/// surfaces as a fetch error when the job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Position in the input sequence.
    pub index: usize,
    pub url: String,
}

impl Job {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    /// Number URLs in order of appearance.
    pub fn from_urls<I, S>(urls: I) -> Vec<Job>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| Job::new(index, url))
            .collect()
    }
}

/// Why a job stopped early. Terminal for that job only.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    /// The OS refused to start the worker thread.
    #[error("could not start worker: {0}")]
    Spawn(#[source] std::io::Error),
    /// The worker panicked before producing an outcome.
    #[error("worker panicked")]
    Panicked,
}

#[derive(Debug)]
pub enum JobOutcome {
    /// Transcoder exited successfully after writing `output`.
    Completed { output: PathBuf },
    Failed(JobError),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }
}

/// Terminal outcome of one job, as collected by the runner.
#[derive(Debug)]
pub struct JobReport {
    pub job: Job,
    pub outcome: JobOutcome,
}

impl JobReport {
    /// The single user-visible line for this job.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = &self.job.url;
        match &self.outcome {
            JobOutcome::Completed { .. } => write!(f, "Clip downloaded from URL {}", url),
            JobOutcome::Failed(JobError::Fetch(FetchError::Body(e))) => {
                write!(f, "Error reading response body for URL {}: {}", url, e)
            }
            JobOutcome::Failed(JobError::Fetch(e)) => {
                write!(f, "Error fetching URL {}: {}", url, e)
            }
            JobOutcome::Failed(JobError::Transcode(e)) => {
                write!(f, "Error running ffmpeg command for URL {}: {}", url, e)
            }
            JobOutcome::Failed(e) => write!(f, "Error processing URL {}: {}", url, e),
        }
    }
}
