use std::fmt;
use std::path::Path;

use crate::common::error::{AppError, Result};
use crate::common::scratch::ScratchFile;
use crate::common::upload::UploadedFile;

pub const MIX_FIELDS: [&str; 2] = ["file1", "file2"];
pub const MIX_FIELDS_MISSING: &str = "Upload two files named file1 and file2";
pub const CLIPS_MISSING: &str = "Upload files named clip0..clipN";

#[derive(Debug)]
pub enum Operation {
    Mix,
    Concat { manifest: ScratchFile },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Mix => "mix",
            Operation::Concat { .. } => "concat",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One transcoder invocation. Owns every scratch file involved, so dropping
/// the job cleans up after it.
#[derive(Debug)]
pub struct TranscodeJob {
    pub operation: Operation,
    pub inputs: Vec<UploadedFile>,
    pub output: ScratchFile,
}

/// Index embedded in a concat field name: `clip12` -> 12.
pub fn clip_index(field_name: &str) -> Result<u64> {
    let digits = field_name.trim_start_matches(|c: char| !c.is_ascii_digit());
    digits
        .parse::<u64>()
        .map_err(|_| AppError::validation(format!("Invalid clip field name: {}", field_name)))
}

/// Sorts clips ascending by their numeric suffix.
pub fn order_clips(clips: Vec<UploadedFile>) -> Result<Vec<UploadedFile>> {
    if clips.is_empty() {
        return Err(AppError::validation(CLIPS_MISSING));
    }

    let mut indexed = clips
        .into_iter()
        .map(|clip| Ok((clip_index(&clip.field_name)?, clip)))
        .collect::<Result<Vec<_>>>()?;

    indexed.sort_by_key(|(idx, _)| *idx);

    if let Some(pair) = indexed.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(AppError::validation(format!("Duplicate clip index {}", pair[0].0)));
    }

    Ok(indexed.into_iter().map(|(_, clip)| clip).collect())
}

/// Concat demuxer manifest: one `file '<path>'` line per input.
pub fn manifest_contents<'a>(paths: impl IntoIterator<Item = &'a Path>) -> String {
    let mut manifest = String::new();
    for path in paths {
        manifest.push_str("file ");
        manifest.push_str(&quote_path(path));
        manifest.push('\n');
    }
    manifest
}

fn quote_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}
