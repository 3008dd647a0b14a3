use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::web::{AppState, auth::require_admin, templates::render_admin_page};

#[derive(Deserialize)]
pub struct AdminQuery {
    date: Option<String>,
}

/// GET /admin — the bulletin editor, optionally preloaded with `?date=`.
pub async fn editor(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, Redirect> {
    require_admin(&state, &jar).await?;

    let selected = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => match state.store().get(date).await {
            Ok(record) => record,
            Err(err) => {
                error!(?err, %date, "failed to load bulletin for editor");
                None
            }
        },
        None => None,
    };

    let list = match state.store().list().await {
        Ok(list) => list,
        Err(err) => {
            error!(?err, "failed to list bulletins for editor");
            Vec::new()
        }
    };

    Ok(Html(render_admin_page(selected.as_ref(), &list)))
}
