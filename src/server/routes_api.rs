use crate::conversion::ConversionRequest;
use crate::history::HistoryEntry;
use crate::server::{ApiError, AppContext};
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use mp3forge_av::check_tools;
use mp3forge_common::Bitrate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Response header carrying the encoded bitrate in kbps.
pub const BITRATE_HEADER: &str = "x-mp3forge-bitrate";
/// Response header carrying the destination copy path, when one was saved.
pub const SAVED_TO_HEADER: &str = "x-mp3forge-saved-to";

const FALLBACK_UPLOAD_NAME: &str = "upload.mp4";

/// Bytes escaped in an RFC 5987 `filename*` value; unreserved characters pass through.
const RFC5987_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/convert", post(convert))
        .route("/history", get(history))
        .route("/tools", get(tools))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": ctx.handler.backend_name(),
    }))
}

async fn history(State(ctx): State<AppContext>) -> Json<Vec<HistoryEntry>> {
    Json(ctx.history.list())
}

async fn tools(State(ctx): State<AppContext>) -> Json<Vec<mp3forge_av::ToolInfo>> {
    let ffmpeg_path = ctx.config.tools.ffmpeg_path.clone();
    // Probing runs subprocesses
    let tools = tokio::task::spawn_blocking(move || check_tools(ffmpeg_path.as_deref()))
        .await
        .unwrap_or_default();
    Json(tools)
}

/// Fields of the upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    bitrate: Option<Bitrate>,
    name: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(
            e.status(),
            "invalid_request",
            format!("Failed to read multipart field: {}", e.body_text()),
        )
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(FALLBACK_UPLOAD_NAME)
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::new(
                        e.status(),
                        "invalid_request",
                        format!("Failed to read uploaded file: {}", e.body_text()),
                    )
                })?;
                form.file = Some((file_name, data));
            }
            "bitrate" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !text.trim().is_empty() {
                    let bitrate = text
                        .parse::<Bitrate>()
                        .map_err(|e| ApiError::bad_request(e.to_string()))?;
                    form.bitrate = Some(bitrate);
                }
            }
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.name = Some(text);
            }
            other => {
                tracing::debug!("Ignoring unknown form field {:?}", other);
            }
        }
    }

    Ok(form)
}

async fn convert(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;

    let (source_name, source_bytes) = form
        .file
        .ok_or_else(|| ApiError::bad_request("Missing 'file' field"))?;
    let bitrate = form
        .bitrate
        .unwrap_or(ctx.config.conversion.default_bitrate);

    tracing::info!(
        "Received {} ({:.2} MB) for {} conversion",
        source_name,
        source_bytes.len() as f64 / (1024.0 * 1024.0),
        bitrate
    );

    let request =
        ConversionRequest::new(source_bytes, source_name, bitrate).with_custom_name(form.name);

    let handler = ctx.handler.clone();
    let result = tokio::task::spawn_blocking(move || handler.convert(request))
        .await
        .map_err(|e| ApiError::internal(format!("Conversion task failed: {}", e)))?;

    if !result.succeeded {
        let kind = result
            .failure
            .unwrap_or(crate::conversion::FailureKind::Conversion);
        let message = result
            .error_message
            .unwrap_or_else(|| "Conversion failed".to_string());
        return Err(ApiError::from_failure(kind, message));
    }

    ctx.history
        .record(HistoryEntry::now(&result.output_name, result.bitrate));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&result.output_name),
    );
    headers.insert(BITRATE_HEADER, HeaderValue::from(result.bitrate.kbps()));
    if let Some(ref path) = result.saved_to {
        if let Ok(value) = HeaderValue::from_str(&path.to_string_lossy()) {
            headers.insert(SAVED_TO_HEADER, value);
        }
    }

    Ok((StatusCode::OK, headers, Body::from(result.output_bytes)).into_response())
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        utf8_percent_encode(file_name, RFC5987_VALUE)
    );

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
