use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::debug;

use crate::bulletin::is_valid_date;
use crate::viewer::carousel::ScoreCarousel;
use crate::viewer::sections::{SectionNav, build_sections, default_sections};
use crate::web::{
    AppState,
    templates::{render_intro_page, render_order_page, render_score_missing_page, render_score_page},
};

#[derive(Deserialize)]
pub struct HomeQuery {
    date: Option<String>,
    view: Option<String>,
    section: Option<usize>,
}

/// GET / — the intro screen, or the worship order when `view=order`.
/// An explicit date that matches nothing (including a malformed one) renders
/// the placeholder content, never an error page and never the latest
/// bulletin.
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Html<String> {
    let date = requested_date(query.date.as_deref());

    let resolution = state.read_path().resolve(date).await;
    let record = resolution.record;

    if query.view.as_deref() == Some("order") {
        let sections = match &record {
            Some(record) => build_sections(record),
            None => default_sections(),
        };
        let mut nav = SectionNav::new(sections.len());
        if let Some(section) = query.section {
            nav.select(section.min(sections.len() - 1));
        }
        return Html(render_order_page(record.as_ref(), &sections, &nav, date));
    }

    // The intro's date picker needs the full list; its failure only costs
    // the picker, never the page.
    let list = match state.store().list().await {
        Ok(list) => list,
        Err(err) => {
            debug!(?err, "bulletin list fetch failed; rendering intro without picker");
            Vec::new()
        }
    };
    Html(render_intro_page(record.as_ref(), &list))
}

#[derive(Deserialize)]
pub struct ScoreQuery {
    url: Option<String>,
    index: Option<usize>,
    date: Option<String>,
}

/// GET /score — the sheet-music viewer, entered via a praise card's deep
/// link. Without a `url` there is nothing to show; a failed or empty card
/// fetch silently degrades to the single requested image.
pub async fn score(State(state): State<AppState>, Query(query): Query<ScoreQuery>) -> Html<String> {
    let Some(url) = query.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Html(render_score_missing_page());
    };
    let date = query.date.as_deref().unwrap_or("");

    let mut carousel = ScoreCarousel::new(date, url, query.index.unwrap_or(0));

    if is_valid_date(date) {
        match state.store().get(date).await {
            Ok(Some(record)) => carousel.load(&crate::praise::decode(&record.praises)),
            Ok(None) => {}
            Err(err) => {
                debug!(%date, ?err, "bulletin fetch for score viewer failed; showing single image");
            }
        }
    }

    Html(render_score_page(&carousel))
}

/// An explicit date request stays explicit: only a blank param means
/// "latest". Lookup by an unparseable date simply finds no record.
fn requested_date(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_date_params_mean_latest() {
        assert_eq!(requested_date(None), None);
        assert_eq!(requested_date(Some("   ")), None);
    }

    #[test]
    fn malformed_dates_stay_explicit_requests() {
        // Resolving "garbage" finds no bulletin and renders the empty
        // state; it must not be rewritten into a latest request.
        assert_eq!(requested_date(Some("garbage")), Some("garbage"));
        assert_eq!(requested_date(Some(" 2025-01-26 ")), Some("2025-01-26"));
    }
}
