use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::storage::UnrecognizedUrl;
use crate::web::{
    AppState,
    auth::require_admin_api,
    responses::{ApiError, json_error, json_error_with_detail},
};

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Deserialize)]
pub struct AssetDeleteRequest {
    pub url: String,
}

/// POST /api/upload — store one image (multipart `file` field) and return
/// its public URL (admin only).
pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ApiError>)> {
    require_admin_api(&state, &jar).await?;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        error!(?err, "failed to read upload form");
        json_error(StatusCode::BAD_REQUEST, "업로드 형식이 올바르지 않습니다.")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload.jpg").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(mime::IMAGE_JPEG.as_ref())
            .to_string();
        let bytes = field.bytes().await.map_err(|err| {
            error!(?err, "failed to read upload body");
            json_error(StatusCode::BAD_REQUEST, "파일을 읽지 못했습니다.")
        })?;

        if bytes.is_empty() {
            return Err(json_error(StatusCode::BAD_REQUEST, "파일이 없습니다."));
        }

        return match state
            .assets()
            .upload(bytes.to_vec(), &original_name, &content_type)
            .await
        {
            Ok(url) => Ok(Json(UploadResponse { url })),
            Err(err) => {
                error!(?err, "asset upload failed");
                Err(json_error_with_detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "업로드에 실패했습니다.",
                    state.debug_errors(),
                    &err,
                ))
            }
        };
    }

    Err(json_error(StatusCode::BAD_REQUEST, "파일이 없습니다."))
}

/// DELETE /api/upload — remove the object behind a public URL (admin only).
/// URLs that do not belong to the configured backend are rejected outright.
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<AssetDeleteRequest>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    require_admin_api(&state, &jar).await?;

    let url = request.url.trim();
    if url.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "url이 필요합니다."));
    }

    match state.assets().delete(url).await {
        Ok(()) => Ok(Json(json!({ "success": true })).into_response()),
        Err(err) if err.downcast_ref::<UnrecognizedUrl>().is_some() => {
            Err(json_error(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(err) => {
            error!(?err, %url, "asset delete failed");
            Err(json_error_with_detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "삭제에 실패했습니다.",
                state.debug_errors(),
                &err,
            ))
        }
    }
}

/// GET /uploads/{name} — serve local-backend files. Under the remote
/// backend nothing lives here, so this is always a 404 there.
pub async fn serve_local(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let public_url = format!("/uploads/{name}");
    let Some(path) = state.assets().local_file_path(&public_url) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    let content_type = content_type_for(&name);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type),
    );
    (headers, bytes).into_response()
}

fn content_type_for(name: &str) -> &'static str {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => mime::IMAGE_JPEG.as_ref(),
        _ => mime::APPLICATION_OCTET_STREAM.as_ref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("b.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
