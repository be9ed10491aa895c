use crate::common::scratch::ScratchFile;
use crate::config::settings::AppConfig;
use crate::modules::audio::job::{Operation, TranscodeJob};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

const STDERR_TAIL_LINES: usize = 8;
const MP3_QUALITY: &str = "2";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}{detail}")]
    Failed {
        program: String,
        code: i32,
        detail: String,
    },

    #[error("{program} terminated by signal{detail}")]
    Terminated { program: String, detail: String },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("transcoder unavailable")]
    Unavailable,

    #[error("transcoder I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs ffmpeg jobs, at most `max_jobs` at a time.
#[derive(Clone, Debug)]
pub struct Transcoder {
    program: PathBuf,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl Transcoder {
    pub fn new(program: impl Into<PathBuf>, max_jobs: usize, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            permits: Arc::new(Semaphore::new(max_jobs.max(1))),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.ffmpeg_path.clone(),
            config.max_concurrent_jobs,
            config.job_timeout(),
        )
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Runs the job to completion and hands back its output file. Inputs and
    /// the manifest are dropped (and deleted) once the process has exited.
    pub async fn run(&self, job: TranscodeJob) -> Result<ScratchFile, TranscodeError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TranscodeError::Unavailable)?;

        let program = self.program_name();
        let args = build_args(&job);
        info!("🎛️ Starting {} job with {} input(s)", job.operation, job.inputs.len());
        debug!("{} {:?}", self.program.display(), args);

        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TranscodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stderr_task = child.stderr.take().map(|stderr| tokio::spawn(stderr_tail(stderr)));

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!("{} job exceeded {:?}, killing {}", job.operation, self.timeout, program);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", program, e);
                }
                if let Some(task) = stderr_task {
                    task.abort();
                }
                return Err(TranscodeError::TimedOut {
                    program,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let tail = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        let status = status?;
        let detail = if tail.is_empty() {
            String::new()
        } else {
            format!(": {}", tail)
        };

        if !status.success() {
            return Err(match status.code() {
                Some(code) => TranscodeError::Failed {
                    program,
                    code,
                    detail,
                },
                None => TranscodeError::Terminated { program, detail },
            });
        }

        info!("✅ {} job finished in {:.2}s", job.operation, started.elapsed().as_secs_f64());

        let TranscodeJob { output, .. } = job;
        Ok(output)
    }
}

/// Drains stderr to EOF, keeping the last few lines for error reporting.
/// Lines are decoded lossily; ffmpeg echoes tags in whatever encoding the
/// input carried.
async fn stderr_tail(stderr: ChildStderr) -> String {
    let mut reader = BufReader::new(stderr);
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Stopped reading ffmpeg stderr: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        debug!("ffmpeg: {}", line);
        if line.is_empty() {
            continue;
        }
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    }

    Vec::from(tail).join("\n")
}

/// Mixing filter graph: sums every input's audio with equal weight.
fn mix_filter(inputs: usize) -> String {
    let mut graph: String = (0..inputs).map(|i| format!("[{}:a]", i)).collect();
    graph.push_str(&format!("amix=inputs={}:normalize=0[out]", inputs));
    graph
}

pub fn build_args(job: &TranscodeJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y"]
        .into_iter()
        .map(OsString::from)
        .collect();

    match &job.operation {
        Operation::Mix => {
            for input in &job.inputs {
                args.push("-i".into());
                args.push(input.path().into());
            }
            args.push("-filter_complex".into());
            args.push(mix_filter(job.inputs.len()).into());
            args.push("-map".into());
            args.push("[out]".into());
        }
        Operation::Concat { manifest } => {
            for arg in ["-f", "concat", "-safe", "0", "-i"] {
                args.push(arg.into());
            }
            args.push(manifest.path().into());
        }
    }

    for arg in ["-c:a", "libmp3lame", "-q:a", MP3_QUALITY] {
        args.push(arg.into());
    }
    args.push(job.output.path().into());
    args
}
