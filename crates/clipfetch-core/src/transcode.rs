//! Stream transformer: pipes a fetched clip through ffmpeg to remux it.
//!
//! The argument set is fixed: copy every stream as-is (no re-encode), write a
//! fragmented MP4 and overwrite the destination without prompting.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// Binary missing, not executable, or the OS refused the process.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// Feeding the payload failed for a reason other than the child closing its stdin.
    #[error("writing to {program} stdin: {source}")]
    Stdin {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program}: {}", exit_text(.code))]
    Exit { program: String, code: Option<i32> },
}

fn exit_text(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {}", c),
        None => "terminated by signal".to_string(),
    }
}

/// Writes `input` to `dest` in a playable container.
///
/// Called concurrently from every worker thread.
pub trait Transcoder: Send + Sync {
    fn transcode(&self, input: &[u8], dest: &Path) -> Result<(), TranscodeError>;
}

/// Arguments passed to ffmpeg for one clip. Input always comes from stdin.
pub fn ffmpeg_args(dest: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-movflags",
        "frag_keyframe+empty_moov",
        "-i",
        "pipe:0",
        "-c",
        "copy",
        "-y",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(dest.as_os_str().to_os_string());
    args
}

/// Runs an external ffmpeg binary, one process per clip.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    /// `program` is resolved against `PATH` by the OS when it has no directory part.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &[u8], dest: &Path) -> Result<(), TranscodeError> {
        let program = self.program.display().to_string();

        let mut child = Command::new(&self.program)
            .args(ffmpeg_args(dest))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| TranscodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input) {
                Ok(()) => {}
                // ffmpeg may stop reading early; its exit status is what counts.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!(dest = %dest.display(), "{} closed stdin early", program);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TranscodeError::Stdin { program, source });
                }
            }
        }

        let status = child.wait().map_err(|source| TranscodeError::Wait {
            program: program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(TranscodeError::Exit {
                program,
                code: status.code(),
            });
        }
        Ok(())
    }
}
