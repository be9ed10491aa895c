use std::str::FromStr;
use tracing::warn;

/// Looks a variable up by name; `std::env::var` in production.
pub type Source<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Clone, Copy, Debug)]
pub enum EnvKey {
    ServerPort,
    FfmpegPath,
    ScratchDir,
    MaxConcurrentJobs,
    JobTimeoutSecs,
    MaxUploadBytes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::ScratchDir => "SCRATCH_DIR",
            EnvKey::MaxConcurrentJobs => "MAX_CONCURRENT_JOBS",
            EnvKey::JobTimeoutSecs => "JOB_TIMEOUT_SECS",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
        }
    }
}

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Trimmed value of `key`; blank counts as unset.
pub fn lookup(key: EnvKey, source: Source<'_>) -> Option<String> {
    source(key.as_str())
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Parsed value of `key`. Unparseable values are logged and treated as unset.
pub fn parsed<T: FromStr>(key: EnvKey, source: Source<'_>) -> Option<T> {
    let raw = lookup(key, source)?;
    match raw.parse::<T>() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", key.as_str(), raw);
            None
        }
    }
}
