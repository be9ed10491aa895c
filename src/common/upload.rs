use crate::common::error::Result;
use crate::common::scratch::{ScratchFile, ScratchStore};
use axum::extract::{multipart::Field, Multipart};
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// A multipart part persisted to local disk.
#[derive(Debug)]
pub struct UploadedFile {
    pub field_name: String,
    pub file: ScratchFile,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// All file parts of one request, in submission order.
#[derive(Debug, Default)]
pub struct UploadSet {
    files: Vec<UploadedFile>,
}

impl UploadSet {
    /// Adds a file unless its field name was already seen; the first
    /// occurrence wins and later duplicates are deleted.
    pub fn insert(&mut self, upload: UploadedFile) {
        if self.files.iter().any(|f| f.field_name == upload.field_name) {
            debug!("Ignoring duplicate field '{}'", upload.field_name);
            return;
        }
        self.files.push(upload);
    }

    pub fn take(&mut self, field_name: &str) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|f| f.field_name == field_name)?;
        Some(self.files.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files
    }
}

/// Persists every file part of the request into the scratch directory.
/// Plain form values (parts without a file name) are skipped.
pub async fn receive_uploads(scratch: &ScratchStore, mut multipart: Multipart) -> Result<UploadSet> {
    let mut uploads = UploadSet::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Skipping non-file field '{}'", name);
            continue;
        };

        let file = scratch.allocate(extension_for(&file_name));
        let bytes = stream_to_file(field, &file).await?;
        info!("Received '{}' ({}, {} bytes) -> {}", name, file_name, bytes, file.path().display());

        uploads.insert(UploadedFile {
            field_name: name,
            file,
        });
    }

    debug!("Multipart body held {} file(s)", uploads.len());
    Ok(uploads)
}

async fn stream_to_file(mut field: Field<'_>, file: &ScratchFile) -> Result<u64> {
    let mut out = tokio::fs::File::create(file.path()).await?;
    let mut written = 0u64;

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    out.flush().await?;
    Ok(written)
}

/// Keeps short alphanumeric upload extensions so the transcoder can use them
/// as a probing hint.
fn extension_for(file_name: &str) -> &str {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
}
