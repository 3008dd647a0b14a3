use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::bulletin::{BulletinInput, is_valid_date};
use crate::web::{
    AppState,
    auth::require_admin_api,
    responses::{ApiError, json_error, json_error_with_detail},
};

#[derive(Deserialize)]
pub struct BulletinQuery {
    #[serde(default)]
    date: Option<String>,
}

/// GET /api/bulletins → summary list (newest first);
/// GET /api/bulletins?date=YYYY-MM-DD → that one record.
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(query): Query<BulletinQuery>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    if let Some(date) = query.date.as_deref().filter(|d| !d.is_empty()) {
        return fetch_single(&state, date).await;
    }

    match state.store().list().await {
        Ok(list) => Ok(Json(list).into_response()),
        Err(err) => {
            error!(?err, "failed to list bulletins");
            Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "주보 목록을 불러오지 못했습니다.",
            ))
        }
    }
}

/// GET /api/bulletins/{date}
pub async fn get_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    fetch_single(&state, &date).await
}

async fn fetch_single(
    state: &AppState,
    date: &str,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    match state.store().get(date).await {
        Ok(Some(record)) => Ok(Json(record).into_response()),
        Ok(None) => Err(json_error(
            StatusCode::NOT_FOUND,
            "해당 날짜의 주보가 없습니다.",
        )),
        Err(err) => {
            error!(?err, %date, "failed to fetch bulletin");
            Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "주보를 불러오지 못했습니다.",
            ))
        }
    }
}

/// POST /api/bulletins — full-field upsert keyed by date (admin only).
pub async fn save(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<BulletinInput>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    require_admin_api(&state, &jar).await?;

    let date = input.date.trim().to_string();
    if date.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "날짜(date)가 필요합니다."));
    }
    if !is_valid_date(&date) {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "날짜는 YYYY-MM-DD 형식이어야 합니다.",
        ));
    }

    let record = input.into_record();

    match state.store().upsert(&record).await {
        Ok(saved) => Ok(Json(saved).into_response()),
        Err(err) => {
            error!(?err, %record.date, "failed to upsert bulletin");
            Err(json_error_with_detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "저장 중 오류가 발생했습니다.",
                state.debug_errors(),
                &err.into(),
            ))
        }
    }
}

/// DELETE /api/bulletins/{date} (admin only).
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(date): Path<String>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    require_admin_api(&state, &jar).await?;

    match state.store().delete(&date).await {
        Ok(true) => Ok(Json(json!({ "success": true })).into_response()),
        Ok(false) => Err(json_error(
            StatusCode::NOT_FOUND,
            "해당 날짜의 주보가 없습니다.",
        )),
        Err(err) => {
            error!(?err, %date, "failed to delete bulletin");
            Err(json_error_with_detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "삭제하지 못했습니다.",
                state.debug_errors(),
                &err.into(),
            ))
        }
    }
}
