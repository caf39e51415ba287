//! Fan-out job runner: one OS thread per job, joined on a completion barrier.
//!
//! Each worker runs the job procedure (fetch, then transcode) exactly once and
//! reports one line. Failures stay inside the worker; the runner only collects
//! outcomes and never returns an error.

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::barrier::CompletionBarrier;
use crate::config::ClipfetchConfig;
use crate::fetch::{CurlFetcher, Fetcher};
use crate::job::{Job, JobError, JobOutcome, JobReport};
use crate::output::OutputPlan;
use crate::report::{Reporter, StdoutReporter};
use crate::transcode::{FfmpegTranscoder, Transcoder};

/// Collaborators shared by every worker.
struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    transcoder: Arc<dyn Transcoder>,
    reporter: Arc<dyn Reporter>,
    output: OutputPlan,
}

impl Pipeline {
    fn execute(&self, job: &Job) -> Result<PathBuf, JobError> {
        let payload = self.fetcher.fetch(&job.url)?;
        let dest = self.output.path_for(job);
        tracing::debug!(
            index = job.index,
            url = %job.url,
            bytes = payload.len(),
            dest = %dest.display(),
            "transcoding"
        );
        self.transcoder.transcode(&payload, &dest)?;
        Ok(dest)
    }

    fn process(&self, job: Job) -> JobReport {
        let outcome = match self.execute(&job) {
            Ok(output) => JobOutcome::Completed { output },
            Err(e) => JobOutcome::Failed(e),
        };
        let report = JobReport { job, outcome };
        self.finish(&report);
        report
    }

    fn finish(&self, report: &JobReport) {
        let job = &report.job;
        match &report.outcome {
            JobOutcome::Completed { output } => tracing::info!(
                index = job.index,
                url = %job.url,
                output = %output.display(),
                "clip downloaded"
            ),
            JobOutcome::Failed(e) => tracing::warn!(
                index = job.index,
                url = %job.url,
                "job failed: {}",
                e
            ),
        }
        self.reporter.report(report);
    }
}

/// Aggregate of every job's outcome, in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    reports: Vec<JobReport>,
}

impl RunSummary {
    pub fn reports(&self) -> &[JobReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

/// Runs jobs concurrently with no limit: concurrency equals job count.
#[derive(Clone)]
pub struct Runner {
    pipeline: Arc<Pipeline>,
}

impl Runner {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        transcoder: Arc<dyn Transcoder>,
        reporter: Arc<dyn Reporter>,
        output: OutputPlan,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                fetcher,
                transcoder,
                reporter,
                output,
            }),
        }
    }

    /// curl fetcher, configured ffmpeg binary, stdout lines.
    pub fn from_config(cfg: &ClipfetchConfig) -> Self {
        Self::new(
            Arc::new(CurlFetcher::new()),
            Arc::new(FfmpegTranscoder::new(cfg.ffmpeg_bin.clone())),
            Arc::new(StdoutReporter),
            OutputPlan::from_config(cfg),
        )
    }

    /// Run one job on the calling thread. Never fails; the outcome is in the report.
    pub fn process(&self, job: Job) -> JobReport {
        self.pipeline.process(job)
    }

    /// Start one worker per job, in order, then block until all of them have finished.
    pub fn run(&self, jobs: Vec<Job>) -> RunSummary {
        let total = jobs.len();
        if total == 0 {
            return RunSummary::default();
        }
        tracing::info!(jobs = total, "starting workers");
        if total > 1 && self.pipeline.output.is_shared() {
            tracing::warn!(
                "{} jobs share one output file; the last transcoder to finish wins",
                total
            );
        }

        let barrier = Arc::new(CompletionBarrier::new());
        let (tx, rx) = mpsc::channel::<(usize, JobReport)>();
        let mut slots: Vec<Option<JobReport>> = Vec::with_capacity(total);
        let mut launched: Vec<Job> = Vec::with_capacity(total);

        for (pos, job) in jobs.into_iter().enumerate() {
            slots.push(None);
            launched.push(job.clone());

            let guard = barrier.enter();
            let pipeline = Arc::clone(&self.pipeline);
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("clip-{}", job.index))
                .spawn(move || {
                    let _guard = guard;
                    let report = pipeline.process(job);
                    let _ = tx.send((pos, report));
                });
            // On spawn failure the closure, guard included, is dropped and the slot released.
            if let Err(e) = spawned {
                let report = JobReport {
                    job: launched[pos].clone(),
                    outcome: JobOutcome::Failed(JobError::Spawn(e)),
                };
                self.pipeline.finish(&report);
                slots[pos] = Some(report);
            }
        }
        drop(tx);

        barrier.wait();
        tracing::debug!(signals = barrier.signals(), "all workers signalled");

        for (pos, report) in rx.try_iter() {
            slots[pos] = Some(report);
        }

        // A worker that panicked never sent a report.
        let reports: Vec<JobReport> = slots
            .into_iter()
            .zip(launched)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| {
                    let report = JobReport {
                        job,
                        outcome: JobOutcome::Failed(JobError::Panicked),
                    };
                    self.pipeline.finish(&report);
                    report
                })
            })
            .collect();

        let summary = RunSummary { reports };
        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "all workers finished"
        );
        summary
    }
}
