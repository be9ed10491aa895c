use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::StreamExt;
use serde::Serialize;
use tokio_util::io::ReaderStream;

use crate::common::scratch::ScratchFile;

pub const AUDIO_MPEG: &str = "audio/mpeg";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub struct ApiError(pub String, pub StatusCode);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Streams a finished MP3 back to the client.
///
/// The scratch guard moves into the body stream, so the file is unlinked
/// once the body has been fully sent or the connection goes away.
pub async fn audio_file(output: ScratchFile) -> std::io::Result<Response> {
    let file = tokio::fs::File::open(output.path()).await?;
    let len = file.metadata().await?.len();

    let stream = ReaderStream::new(file).map(move |chunk| {
        let _keep = &output;
        chunk
    });

    let mut response = Body::from_stream(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_MPEG));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    Ok(response)
}
