use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, bulletins, pages, uploads};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/score", get(pages::score))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route("/intro-background.png", get(intro_background))
        .route(
            "/admin/login",
            get(auth::login_page).post(auth::process_login),
        )
        .route("/admin/logout", post(auth::logout))
        .route("/admin", get(admin::editor))
        .route(
            "/api/bulletins",
            get(bulletins::list_or_get).post(bulletins::save),
        )
        .route(
            "/api/bulletins/:date",
            get(bulletins::get_by_date).delete(bulletins::delete),
        )
        .route(
            "/api/upload",
            post(uploads::upload).delete(uploads::delete),
        )
        .route("/uploads/:name", get(uploads::serve_local))
        .with_state(state)
}

/// Fallback intro background, deployed next to the binary. A missing file
/// is a plain 404; the intro page renders fine without it.
async fn intro_background() -> axum::response::Response {
    match tokio::fs::read("public/intro-background.png").await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
