//! Download portal routes: the manifest listing and the file download.

use super::error::ApiError;
use super::state::ServerState;
use crate::downloads::{
    validate_filename, DownloadEntry, DownloadResolver, FilenameError, ManifestError, ManifestStore,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use std::io::SeekFrom;
use std::time::Duration;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, BufReader},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

const STREAM_BUFFER_SIZE: usize = 4096 * 16;
const SNIFF_LENGTH: usize = 8192;
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
pub struct DownloadsResponse {
    pub status: &'static str,
    pub downloads: Vec<DownloadEntry>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

pub async fn get_health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: format_uptime(state.start_time.elapsed()),
    })
}

pub async fn get_downloads(
    State(manifest_store): State<ManifestStore>,
) -> Result<Json<DownloadsResponse>, ApiError> {
    let downloads = match manifest_store.load().await {
        Ok(manifest) => manifest.into_entries(),
        // Nothing published yet.
        Err(ManifestError::Missing(_)) => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    Ok(Json(DownloadsResponse {
        status: "OK",
        downloads,
    }))
}

/// `GET /downloads/` carries no filename at all.
pub async fn download_without_filename() -> ApiError {
    warn!("Rejected download request: {}", FilenameError::Empty);
    FilenameError::Empty.into()
}

pub async fn download_file(
    State(resolver): State<DownloadResolver>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let filename = validate_filename(&filename).map_err(|err| {
        warn!("Rejected download request: {}", err);
        ApiError::from(err)
    })?;
    let resolved = resolver.resolve(&filename).await?;
    debug!("Serving download from {}", resolved.path.display());

    let mut file = File::open(&resolved.path).await?;

    let mut head = vec![0u8; SNIFF_LENGTH];
    let read = file.read(&mut head).await?;
    file.seek(SeekFrom::Start(0)).await?;
    let content_type = infer::get(&head[..read])
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE);

    let file_reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
    let stream = ReaderStream::with_capacity(file_reader, STREAM_BUFFER_SIZE);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, resolved.len)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(filename.as_str()),
        )
        .body(Body::from_stream(stream))?;
    Ok(response)
}

/// Builds an `attachment` disposition keeping the original filename.
///
/// The quoted `filename` is an ASCII approximation, `filename*` carries the
/// exact name percent-encoded.
fn content_disposition(filename: &str) -> String {
    let ascii_name: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_name,
        urlencoding::encode(filename)
    )
}
