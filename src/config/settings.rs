use std::path::PathBuf;
use std::time::Duration;

use crate::config::env::{self, EnvKey, Source};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub ffmpeg_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub max_concurrent_jobs: usize,
    pub job_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::from_source(&env::process_env)
    }

    /// Job count and timeout are at least 1.
    pub fn from_source(source: Source<'_>) -> Self {
        Self {
            server_port: env::parsed(EnvKey::ServerPort, source).unwrap_or(DEFAULT_PORT),
            ffmpeg_path: env::lookup(EnvKey::FfmpegPath, source)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG)),
            scratch_dir: env::lookup(EnvKey::ScratchDir, source)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_concurrent_jobs: env::parsed(EnvKey::MaxConcurrentJobs, source)
                .unwrap_or(DEFAULT_MAX_CONCURRENT_JOBS)
                .max(1),
            job_timeout_secs: env::parsed(EnvKey::JobTimeoutSecs, source)
                .unwrap_or(DEFAULT_JOB_TIMEOUT_SECS)
                .max(1),
            max_upload_bytes: env::parsed(EnvKey::MaxUploadBytes, source)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_source(&|_| None)
    }
}
