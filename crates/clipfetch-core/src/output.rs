//! Where each job's transcoded clip lands.
//!
//! By default every job targets the same file, so concurrent jobs race and the
//! last transcoder to finish writing wins; an interleaved write can leave a
//! corrupt file. `unique` gives every job its own name keyed by job index.

use std::path::{Path, PathBuf};

use crate::config::ClipfetchConfig;
use crate::job::Job;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    dir: PathBuf,
    name: String,
    unique: bool,
}

impl OutputPlan {
    /// Every job writes `dir/name`.
    pub fn shared(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            unique: false,
        }
    }

    /// Job `i` writes `dir/<stem>-<i>.<ext>`.
    pub fn unique(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            unique: true,
        }
    }

    /// Build from config. Without `output_dir` paths stay relative to the
    /// working directory, which is never looked up.
    pub fn from_config(cfg: &ClipfetchConfig) -> Self {
        let dir = cfg.output_dir.clone().unwrap_or_default();
        if cfg.unique_outputs {
            Self::unique(dir, cfg.output_name.clone())
        } else {
            Self::shared(dir, cfg.output_name.clone())
        }
    }

    pub fn is_shared(&self) -> bool {
        !self.unique
    }

    pub fn path_for(&self, job: &Job) -> PathBuf {
        if !self.unique {
            return self.dir.join(&self.name);
        }
        let name = Path::new(&self.name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string());
        let file = match name.extension() {
            Some(ext) => format!("{}-{}.{}", stem, job.index, ext.to_string_lossy()),
            None => format!("{}-{}", stem, job.index),
        };
        self.dir.join(file)
    }
}
