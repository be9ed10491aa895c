use super::service::AudioService;
use crate::common::error::Result;
use crate::common::response;
use crate::common::upload::receive_uploads;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Response,
};

/// Mix two tracks: multipart fields `file1` and `file2`.
pub async fn mix(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let uploads = receive_uploads(&state.scratch, multipart?).await?;
    let output = AudioService::mix(&state, uploads).await?;
    Ok(response::audio_file(output).await?)
}

/// Concatenate clips: multipart fields `clip0..clipN`.
pub async fn concat(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let uploads = receive_uploads(&state.scratch, multipart?).await?;
    let output = AudioService::concat(&state, uploads).await?;
    Ok(response::audio_file(output).await?)
}
