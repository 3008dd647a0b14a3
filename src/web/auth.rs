use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::web::{AppState, render_login_page, responses::ApiError};

pub const SESSION_COOKIE: &str = "bulletin_admin";
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    if session_is_valid(&state, &jar).await {
        return Err(Redirect::to("/admin"));
    }
    Ok(Html(render_login_page(None)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    if !state.verify_admin(form.username.trim(), &form.password) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Html(render_login_page(Some(
                "아이디 또는 비밀번호가 올바르지 않습니다.",
            ))),
        ));
    }

    let token = Uuid::new_v4();
    let expires_at = Utc::now() + ChronoDuration::days(SESSION_TTL_DAYS);

    // Opportunistic cleanup; expired rows are also ignored on lookup.
    if let Err(err) = sqlx::query("DELETE FROM admin_sessions WHERE expires_at < NOW()")
        .execute(state.pool_ref())
        .await
    {
        error!(?err, "failed to purge expired admin sessions");
    }

    if let Err(err) = sqlx::query("INSERT INTO admin_sessions (id, expires_at) VALUES ($1, $2)")
        .bind(token)
        .bind(expires_at)
        .execute(state.pool_ref())
        .await
    {
        error!(?err, "failed to create admin session");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_login_page(Some("서버 오류가 발생했습니다. 잠시 후 다시 시도해 주세요."))),
        ));
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));

    Ok((jar.add(cookie), Redirect::to("/admin")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
                .bind(token)
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove admin session during logout");
            }
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/"))
}

pub async fn session_is_valid(state: &AppState, jar: &CookieJar) -> bool {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return false;
    };
    let Ok(token) = Uuid::parse_str(cookie.value()) else {
        return false;
    };

    match sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM admin_sessions WHERE id = $1 AND expires_at > NOW())",
    )
    .bind(token)
    .fetch_one(state.pool_ref())
    .await
    {
        Ok(valid) => valid,
        Err(err) => {
            error!(?err, "failed to validate admin session");
            false
        }
    }
}

/// Page gate: unauthenticated requests are sent to the login form.
pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), Redirect> {
    if session_is_valid(state, jar).await {
        Ok(())
    } else {
        Err(Redirect::to("/admin/login"))
    }
}

/// API gate for every protected write operation.
pub async fn require_admin_api(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(), (StatusCode, Json<ApiError>)> {
    if session_is_valid(state, jar).await {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("로그인이 필요합니다.")),
        ))
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trips() {
        let hash = hash_password("dasibon123").unwrap();
        assert!(verify_password("dasibon123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
