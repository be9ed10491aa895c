use super::job::{self, Operation, TranscodeJob, MIX_FIELDS, MIX_FIELDS_MISSING};
use crate::common::error::{AppError, Result};
use crate::common::scratch::ScratchFile;
use crate::common::upload::UploadSet;
use crate::state::AppState;
use tracing::info;

pub struct AudioService;

impl AudioService {
    /// Sums `file1` and `file2` into one MP3.
    pub async fn mix(state: &AppState, mut uploads: UploadSet) -> Result<ScratchFile> {
        let [first, second] = MIX_FIELDS;
        let (Some(file1), Some(file2)) = (uploads.take(first), uploads.take(second)) else {
            return Err(AppError::validation(MIX_FIELDS_MISSING));
        };
        drop(uploads);

        let job = TranscodeJob {
            operation: Operation::Mix,
            inputs: vec![file1, file2],
            output: state.scratch.allocate("mp3"),
        };

        Ok(state.transcoder.run(job).await?)
    }

    /// Joins `clip0..clipN` back to back, ordered by their numeric suffix.
    pub async fn concat(state: &AppState, uploads: UploadSet) -> Result<ScratchFile> {
        let clips = job::order_clips(uploads.into_files())?;
        info!(
            "Concatenating {} clip(s): {}",
            clips.len(),
            clips.iter().map(|c| c.field_name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let manifest = state.scratch.allocate("txt");
        let contents = job::manifest_contents(clips.iter().map(|c| c.path()));
        tokio::fs::write(manifest.path(), contents).await?;

        let job = TranscodeJob {
            operation: Operation::Concat { manifest },
            inputs: clips,
            output: state.scratch.allocate("mp3"),
        };

        Ok(state.transcoder.run(job).await?)
    }
}
