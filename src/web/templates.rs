use crate::bulletin::{BulletinRecord, BulletinSummary};
use crate::viewer::carousel::ScoreCarousel;
use crate::viewer::sections::{Section, SectionBody, SectionNav};
use crate::viewer::{SWIPE_THRESHOLD, carousel::ScoreLink};

pub const DEFAULT_BACKGROUND: &str = "/intro-background.png";
const DEFAULT_DATE_LABEL: &str = "날짜 없음 · 오전 11시";
const DEFAULT_SERMON_MAIN: &str = "다시본교회 주일 예배";
// Color inputs coerce an empty value to #000000, so absent overrides are
// seeded white instead of silently going black on the first save.
const DEFAULT_TITLE_COLOR: &str = "#ffffff";

const VIEWER_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        * { box-sizing: border-box; }
        body { margin: 0; font-family: "Apple SD Gothic Neo", "Noto Sans KR", sans-serif; background: #f7f1e6; color: #3b2a20; }
        .screen { position: relative; min-height: 100dvh; display: flex; align-items: center; justify-content: center; padding: 1rem; background-size: cover; background-position: center; overflow: hidden; }
        .scrim { position: absolute; inset: 0; background: linear-gradient(to bottom, rgba(0,0,0,0.35), rgba(0,0,0,0.15), rgba(247,241,230,0.95)); pointer-events: none; }
        .card { position: relative; z-index: 1; width: 100%; max-width: 28rem; height: calc(100dvh - 2rem); display: flex; flex-direction: column; border: 1px solid #f5e1c4; border-radius: 1.5rem; overflow: hidden; box-shadow: 0 18px 40px rgba(59, 42, 32, 0.25); }
        .eyebrow { font-size: 11px; letter-spacing: 0.22em; text-transform: uppercase; }
        .corner-buttons { position: absolute; right: 1rem; top: 1rem; z-index: 2; display: flex; gap: 0.5rem; }
        .corner-buttons a { display: flex; align-items: center; justify-content: center; height: 2rem; width: 2rem; border-radius: 999px; background: rgba(0,0,0,0.35); border: 1px solid rgba(255,255,255,0.4); color: rgba(255,255,255,0.9); text-decoration: none; font-size: 0.85rem; }
        .tabs { display: flex; justify-content: space-between; gap: 0.5rem; padding: 0.75rem 0.5rem 0; border-top: 1px solid rgba(229,214,192,0.8); margin-top: 1rem; }
        .tabs a { flex-shrink: 0; padding: 0.4rem 0.6rem; font-size: 12px; color: rgba(59,42,32,0.7); text-decoration: none; border-bottom: 2px solid transparent; }
        .tabs a.active { color: #3b2a20; font-weight: 600; border-bottom-color: #3b2a20; }
        .section-pane { flex: 1; min-height: 0; margin-top: 1rem; border: 1px solid #e5d6c0; border-radius: 1rem; background: rgba(251,245,235,0.95); padding: 1rem 1.25rem; overflow-y: auto; touch-action: pan-y; }
        .section-title { font-size: 12px; letter-spacing: 0.28em; text-align: center; color: rgba(59,42,32,0.7); margin: 0 0 1rem; }
        .section-body { font-size: 15px; line-height: 1.6; }
        .praise-card { display: block; margin-bottom: 0.75rem; padding: 1rem; border: 1px solid #e5d6c0; border-radius: 0.75rem; background: rgba(251,245,235,0.95); color: inherit; font-size: 15px; }
        a.praise-card { font-weight: 500; text-decoration: none; box-shadow: 0 1px 3px rgba(59,42,32,0.12); }
        .swipe-hint { margin-top: 0.75rem; text-align: center; font-size: 11px; color: rgba(59,42,32,0.6); }
        .font-buttons button { height: 2rem; width: 2rem; border-radius: 999px; border: 1px solid #d3c2aa; background: rgba(255,255,255,0.7); font-size: 11px; cursor: pointer; }
"#;

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Stored rich text is rendered verbatim (it only ever originates from the
/// authenticated editor), with bare newlines promoted to `<br />`.
pub fn rich_text_html(raw: &str) -> String {
    raw.replace('\n', "<br />")
}

/// `2025-01-26` + `11:00` → `2025년 1월 26일 · 오전 11:00`.
pub fn format_date_label(date: &str, time: &str) -> String {
    let Some((y, m, d)) = split_date(date) else {
        return DEFAULT_DATE_LABEL.to_string();
    };
    let time_label = if time.is_empty() {
        "오전 11시".to_string()
    } else {
        format!("오전 {time}")
    };
    format!("{y}년 {m}월 {d}일 · {time_label}")
}

/// Date-picker option label: `2025년 1월 26일 주일 예배`.
pub fn format_bulletin_option(date: &str, event_type: &str) -> String {
    let Some((y, m, d)) = split_date(date) else {
        return if date.is_empty() { "—".to_string() } else { date.to_string() };
    };
    let kind = if event_type.trim().is_empty() {
        "주일 예배"
    } else {
        event_type
    };
    format!("{y}년 {m}월 {d}일 {kind}")
}

fn split_date(date: &str) -> Option<(u32, u32, u32)> {
    let mut parts = date.split('-');
    let y = parts.next()?.parse().ok()?;
    let m = parts.next()?.parse().ok()?;
    let d = parts.next()?.parse().ok()?;
    Some((y, m, d))
}

fn color_style(color: Option<&str>) -> String {
    color
        .map(|c| format!(" style=\"color: {}\"", escape_html(c)))
        .unwrap_or_default()
}

fn order_url(date: Option<&str>, section: usize) -> String {
    match date {
        Some(date) => format!(
            "/?date={}&view=order&section={section}",
            urlencoding::encode(date)
        ),
        None => format!("/?view=order&section={section}"),
    }
}

/// Intro screen: background, date label, sermon titles, date picker,
/// tap-to-enter into the worship order.
pub fn render_intro_page(bulletin: Option<&BulletinRecord>, list: &[BulletinSummary]) -> String {
    let background = bulletin
        .and_then(|b| b.intro_background_url.as_deref())
        .unwrap_or(DEFAULT_BACKGROUND);
    let date_label = bulletin
        .map(|b| format_date_label(&b.date, &b.time))
        .unwrap_or_else(|| DEFAULT_DATE_LABEL.to_string());
    let title_main = bulletin
        .map(|b| b.sermon_title_main.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_SERMON_MAIN);
    let title_main_style =
        color_style(bulletin.and_then(|b| b.sermon_title_main_color.as_deref()));
    let title_sub = bulletin.map(|b| b.sermon_title_sub.as_str()).unwrap_or("");
    let title_sub_style = color_style(bulletin.and_then(|b| b.sermon_title_sub_color.as_deref()));
    let date_param = bulletin.map(|b| b.date.as_str());
    let order_href = order_url(date_param, 0);

    let og_image = bulletin
        .and_then(|b| b.og_image_url.as_deref())
        .map(|url| format!(r#"<meta property="og:image" content="{}">"#, escape_html(url)))
        .unwrap_or_default();

    let youtube_link = bulletin
        .and_then(|b| b.youtube_url.as_deref())
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" aria-label="유튜브" onclick="event.stopPropagation()">▶</a>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let options = list
        .iter()
        .map(|item| {
            let selected = if Some(item.date.as_str()) == date_param {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(&item.date),
                escape_html(&format_bulletin_option(&item.date, &item.event_type))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let picker = if list.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="picker-note">아래에서 날짜를 선택하면 해당 주보를 볼 수 있습니다.</p>
            <select aria-label="주보 날짜 선택" onclick="event.stopPropagation()" onchange="if (this.value) location.href = '/?date=' + encodeURIComponent(this.value);">
{options}
            </select>"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>다시본교회 주보</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {og_image}
    <style>
{VIEWER_BASE_STYLES}
        .intro-inner {{ position: relative; flex: 1; min-height: 0; display: flex; flex-direction: column; justify-content: space-between; padding: 1.5rem 1.25rem; color: #fff; }}
        .intro-header {{ text-align: center; color: rgba(255,255,255,0.85); font-size: 11px; }}
        .intro-main {{ flex: 1; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1rem; text-align: center; }}
        .intro-main h1 {{ margin: 0; font-size: 28px; line-height: 1.3; font-weight: 600; text-shadow: 0 1px 3px rgba(0,0,0,0.4); white-space: pre-line; }}
        .intro-main .sub {{ display: block; margin-top: 0.5rem; font-size: 20px; font-weight: 500; color: rgba(255,255,255,0.95); white-space: pre-line; }}
        .intro-footer {{ border-top: 1px solid rgba(255,255,255,0.4); padding-top: 1rem; font-size: 11px; color: rgba(255,255,255,0.75); }}
        .picker-note {{ margin: 0 0 0.5rem; }}
        select {{ width: 100%; max-width: 220px; border-radius: 0.375rem; border: 1px solid rgba(255,255,255,0.4); background: rgba(0,0,0,0.3); color: rgba(255,255,255,0.95); padding: 0.5rem 0.75rem; font-size: 11px; }}
    </style>
</head>
<body>
    <div class="screen" style="background-image: url('{background}')" onclick="location.href='{order_href}'">
        <div class="scrim"></div>
        <div class="card">
            <div class="corner-buttons">
                {youtube_link}
                <a href="/admin/login" aria-label="관리자 설정" onclick="event.stopPropagation()">⚙</a>
            </div>
            <div class="intro-inner">
                <header class="intro-header">
                    <div>{date_label}</div>
                    <div class="eyebrow">DASIBON WORSHIP</div>
                </header>
                <section class="intro-main">
                    <h1><span{title_main_style}>{title_main}</span><span class="sub"{title_sub_style}>{title_sub}</span></h1>
                    <p>다시본교회 주일 예배</p>
                </section>
                <footer class="intro-footer" onclick="event.stopPropagation()">
                    {picker}
                    <p>화면을 탭하면 예배 순서로 이동합니다</p>
                </footer>
            </div>
        </div>
    </div>
</body>
</html>"#,
        background = escape_html(background),
        title_main = escape_html(title_main),
        title_sub = escape_html(title_sub),
    )
}

fn render_section_body(body: &SectionBody, date: &str) -> String {
    match body {
        SectionBody::PraiseCards(cards) => {
            let mut image_position = 0usize;
            let items = cards
                .iter()
                .map(|card| {
                    let title = if card.title.is_empty() {
                        "찬양"
                    } else {
                        card.title.as_str()
                    };
                    if card.has_image() {
                        let link = ScoreLink {
                            url: card.image_url.clone(),
                            index: image_position,
                            date: date.to_string(),
                        };
                        image_position += 1;
                        format!(
                            r#"<a class="praise-card" href="{}">{}</a>"#,
                            link.href(),
                            escape_html(title)
                        )
                    } else {
                        format!(
                            r#"<div class="praise-card">{}</div>"#,
                            escape_html(if card.title.is_empty() { "—" } else { title })
                        )
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("<div>{items}</div>")
        }
        SectionBody::Html(raw) => rich_text_html(raw),
        SectionBody::Sermon {
            title_main,
            title_main_color,
            title_sub,
            title_sub_color,
            description,
        } => {
            let mut parts = Vec::new();
            if !title_main.is_empty() {
                parts.push(format!(
                    r#"<p{} style="font-weight: 500; white-space: pre-line">{}</p>"#,
                    color_style(title_main_color.as_deref()),
                    escape_html(title_main)
                ));
            }
            if !title_sub.is_empty() {
                parts.push(format!(
                    r#"<p{} style="white-space: pre-line; opacity: 0.8">{}</p>"#,
                    color_style(title_sub_color.as_deref()),
                    escape_html(title_sub)
                ));
            }
            if !description.is_empty() {
                parts.push(rich_text_html(description));
            }
            parts.join("\n")
        }
    }
}

/// Worship-order screen: tab strip, the active section, swipe navigation
/// between section URLs, and A−/A+ font controls.
pub fn render_order_page(
    bulletin: Option<&BulletinRecord>,
    sections: &[Section],
    nav: &SectionNav,
    date_param: Option<&str>,
) -> String {
    let background = bulletin
        .and_then(|b| b.intro_background_url.as_deref())
        .unwrap_or(DEFAULT_BACKGROUND);
    let date_label = bulletin
        .map(|b| format_date_label(&b.date, &b.time))
        .unwrap_or_else(|| DEFAULT_DATE_LABEL.to_string());
    let active = nav.active();
    let record_date = bulletin.map(|b| b.date.as_str()).unwrap_or("");

    let tabs = sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let class = if i == active { " class=\"active\"" } else { "" };
            format!(
                r#"<a{class} href="{}">{}</a>"#,
                order_url(date_param, i),
                section.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let section = &sections[active];
    let body = render_section_body(&section.body, record_date);

    let prev_href = if active > 0 {
        order_url(date_param, active - 1)
    } else {
        String::new()
    };
    let next_href = if active + 1 < sections.len() {
        order_url(date_param, active + 1)
    } else {
        String::new()
    };

    let intro_href = match date_param {
        Some(date) => format!("/?date={}", urlencoding::encode(date)),
        None => "/".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>예배 순서 · 다시본교회</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{VIEWER_BASE_STYLES}
        .order-card {{ background: rgba(247,241,230,0.92); padding: 1rem 1.25rem; }}
        .order-header {{ display: flex; justify-content: space-between; align-items: flex-start; gap: 0.75rem; }}
        .order-header .meta {{ font-size: 11px; color: rgba(59,42,32,0.55); }}
        .order-buttons {{ display: flex; gap: 0.5rem; }}
        .order-buttons a, .order-buttons button {{ height: 2rem; width: 2rem; display: flex; align-items: center; justify-content: center; border-radius: 999px; border: 1px solid #d3c2aa; background: rgba(255,255,255,0.7); color: rgba(59,42,32,0.8); text-decoration: none; font-size: 11px; cursor: pointer; }}
    </style>
</head>
<body>
    <div class="screen" style="background-image: url('{background}')">
        <div class="scrim"></div>
        <div class="card order-card">
            <header>
                <div class="order-header">
                    <div class="meta">
                        <div>{date_label}</div>
                        <div class="eyebrow">DASIBON Worship</div>
                    </div>
                    <div class="order-buttons">
                        <a href="{intro_href}" aria-label="홈(인트로)" title="인트로 화면으로">⌂</a>
                        <div class="font-buttons">
                            <button type="button" aria-label="글자 작게" onclick="adjustFont(-0.1)">A-</button>
                            <button type="button" aria-label="글자 크게" onclick="adjustFont(0.1)">A+</button>
                        </div>
                    </div>
                </div>
                <nav class="tabs">
{tabs}
                </nav>
            </header>
            <div class="section-pane" id="section-pane">
                <h2 class="section-title">{title}</h2>
                <div class="section-body" id="section-body" data-scale="{scale}" style="font-size: {size}px">{body}</div>
            </div>
            <div class="swipe-hint">← 옆으로 넘기며 예배 순서를 볼 수 있어요 →</div>
        </div>
    </div>
    <script>
        (function () {{
            var prevHref = "{prev_href}";
            var nextHref = "{next_href}";
            var threshold = {threshold};
            var start = null;
            var pane = document.getElementById("section-pane");
            pane.addEventListener("touchstart", function (e) {{
                start = {{ x: e.touches[0].clientX, y: e.touches[0].clientY }};
            }});
            pane.addEventListener("touchend", function (e) {{
                if (!start) return;
                var dx = e.changedTouches[0].clientX - start.x;
                var dy = e.changedTouches[0].clientY - start.y;
                start = null;
                if (Math.abs(dx) < Math.abs(dy) || Math.abs(dx) < threshold) return;
                if (dx > threshold && prevHref) location.href = prevHref;
                else if (dx < -threshold && nextHref) location.href = nextHref;
            }});
        }})();
        function adjustFont(step) {{
            var body = document.getElementById("section-body");
            var current = parseFloat(body.dataset.scale || "1");
            var next = Math.round((current + step) * 10) / 10;
            next = Math.min(1.2, Math.max(0.9, next));
            body.dataset.scale = next;
            body.style.fontSize = (15 * next) + "px";
        }}
    </script>
</body>
</html>"#,
        background = escape_html(background),
        title = section.title,
        threshold = SWIPE_THRESHOLD,
        scale = nav.font_scale(),
        size = 15.0 * nav.font_scale(),
    )
}

/// Score viewer: the current sheet image, dot/arrow navigation over the
/// image-card deep links, swipe handling with the pointer/touch thresholds.
pub fn render_score_page(carousel: &ScoreCarousel) -> String {
    let current_url = carousel.current_url();
    let close_href = if carousel.link().date.is_empty() {
        "/?view=order".to_string()
    } else {
        format!(
            "/?date={}&view=order",
            urlencoding::encode(&carousel.link().date)
        )
    };

    let (dots, prev_href, next_href) = if carousel.has_multiple() {
        let mut probe = carousel.clone();
        let dots = (0..carousel.len())
            .map(|i| {
                let class = if i == carousel.current_index() {
                    " class=\"active\""
                } else {
                    ""
                };
                let href = probe.select(i).href();
                format!(r#"<a{class} href="{href}" aria-label="악보 {n}"></a>"#, n = i + 1)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prev = if carousel.current_index() > 0 {
            probe.select(carousel.current_index() - 1).href()
        } else {
            String::new()
        };
        let next = if carousel.current_index() + 1 < carousel.len() {
            probe.select(carousel.current_index() + 1).href()
        } else {
            String::new()
        };
        (format!(r#"<nav class="dots">{dots}</nav>"#), prev, next)
    } else {
        (String::new(), String::new(), String::new())
    };

    let title = carousel
        .current_title()
        .filter(|t| !t.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "찬양 악보".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>{title} · 다시본교회</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        :root {{ color-scheme: dark; }}
        body {{ margin: 0; background: rgba(0,0,0,0.98); color: rgba(255,255,255,0.9); font-family: "Apple SD Gothic Neo", "Noto Sans KR", sans-serif; }}
        .topbar {{ position: fixed; top: 0; left: 0; right: 0; display: flex; justify-content: space-between; align-items: center; padding: 0.75rem; z-index: 10; background: linear-gradient(to bottom, rgba(0,0,0,0.6), transparent); }}
        .topbar a {{ color: rgba(255,255,255,0.95); font-size: 15px; font-weight: 500; text-decoration: none; padding: 0.5rem 1rem; border-radius: 999px; background: rgba(0,0,0,0.4); }}
        .viewport {{ min-height: 100dvh; display: flex; align-items: flex-start; justify-content: center; padding: 3.5rem 1rem 3rem; overflow: auto; }}
        .viewport img {{ max-width: 100%; height: auto; object-fit: contain; border-radius: 0.5rem; box-shadow: 0 25px 50px rgba(0,0,0,0.5); }}
        .dots {{ position: fixed; bottom: 1rem; left: 0; right: 0; display: flex; justify-content: center; gap: 0.5rem; }}
        .dots a {{ height: 0.5rem; width: 0.5rem; border-radius: 999px; background: rgba(255,255,255,0.35); }}
        .dots a.active {{ background: rgba(255,255,255,0.95); }}
    </style>
</head>
<body>
    <div class="topbar">
        <a href="{close_href}">닫기</a>
        <span>{title}</span>
    </div>
    <div class="viewport" id="viewport">
        <img src="{current_url}" alt="찬양 악보">
    </div>
    {dots}
    <script>
        (function () {{
            var prevHref = "{prev_href}";
            var nextHref = "{next_href}";
            var threshold = {threshold};
            var mouseJitter = {mouse_jitter};
            var lockThreshold = {lock_threshold};
            var start = null;
            var recognized = false;
            var viewport = document.getElementById("viewport");

            function evaluate(dx, dy) {{
                if (Math.abs(dx) < Math.abs(dy) || Math.abs(dx) < threshold) return;
                if (dx > threshold && prevHref) location.href = prevHref;
                else if (dx < -threshold && nextHref) location.href = nextHref;
            }}

            viewport.addEventListener("touchstart", function (e) {{
                start = {{ x: e.touches[0].clientX, y: e.touches[0].clientY }};
            }});
            viewport.addEventListener("touchmove", function (e) {{
                if (!start) return;
                var dx = e.touches[0].clientX - start.x;
                var dy = e.touches[0].clientY - start.y;
                if (Math.abs(dx) > Math.abs(dy) && Math.abs(dx) > lockThreshold) e.preventDefault();
            }}, {{ passive: false }});
            viewport.addEventListener("touchend", function (e) {{
                if (!start) return;
                var dx = e.changedTouches[0].clientX - start.x;
                var dy = e.changedTouches[0].clientY - start.y;
                start = null;
                evaluate(dx, dy);
            }});

            viewport.addEventListener("mousedown", function (e) {{
                start = {{ x: e.clientX, y: e.clientY }};
                recognized = false;
            }});
            viewport.addEventListener("mousemove", function (e) {{
                if (!start) return;
                if (Math.abs(e.clientX - start.x) > mouseJitter || Math.abs(e.clientY - start.y) > mouseJitter) recognized = true;
            }});
            viewport.addEventListener("mouseup", function (e) {{
                if (!start) return;
                var dx = e.clientX - start.x;
                var dy = e.clientY - start.y;
                var ok = recognized;
                start = null;
                recognized = false;
                if (ok) evaluate(dx, dy);
            }});
            viewport.addEventListener("mouseleave", function () {{
                start = null;
                recognized = false;
            }});
        }})();
    </script>
</body>
</html>"#,
        current_url = escape_html(current_url),
        threshold = SWIPE_THRESHOLD,
        mouse_jitter = crate::viewer::carousel::MOUSE_JITTER_THRESHOLD,
        lock_threshold = crate::viewer::carousel::SCROLL_LOCK_THRESHOLD,
    )
}

pub fn render_score_missing_page() -> String {
    r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>악보 · 다시본교회</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,0.95); color: rgba(255,255,255,0.7); font-family: "Apple SD Gothic Neo", "Noto Sans KR", sans-serif; }
        a { position: absolute; top: 1rem; left: 1rem; color: rgba(255,255,255,0.9); font-size: 14px; }
    </style>
</head>
<body>
    <a href="/?view=order">뒤로</a>
    <p>악보 주소가 없습니다.</p>
</body>
</html>"#
        .to_string()
}

pub fn render_login_page(error: Option<&str>) -> String {
    let error_html = error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>관리자 로그인 · 다시본교회</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center; background: #f7f1e6; color: #3b2a20; font-family: "Apple SD Gothic Neo", "Noto Sans KR", sans-serif; padding: 1.5rem; box-sizing: border-box; }}
        .panel {{ width: 100%; max-width: 24rem; border: 1px solid #e5d6c0; background: rgba(251,245,235,0.95); border-radius: 1rem; box-shadow: 0 18px 40px rgba(59,42,32,0.15); padding: 1.75rem 1.5rem; }}
        h1 {{ margin: 0; font-size: 1.1rem; text-align: center; }}
        p.description {{ margin: 0.25rem 0 1.25rem; font-size: 12px; text-align: center; color: rgba(59,42,32,0.6); }}
        label {{ display: block; font-size: 12px; color: rgba(59,42,32,0.7); margin-bottom: 0.25rem; }}
        input {{ width: 100%; box-sizing: border-box; border-radius: 0.375rem; border: 1px solid #e5d6c0; background: rgba(255,255,255,0.9); padding: 0.5rem 0.75rem; font-size: 13px; margin-bottom: 1rem; }}
        input:focus {{ outline: none; box-shadow: 0 0 0 2px rgba(196,154,108,0.6); }}
        button {{ width: 100%; border: none; border-radius: 999px; background: #c49a6c; color: #fff; font-size: 13px; font-weight: 600; padding: 0.6rem 1rem; cursor: pointer; }}
        button:hover {{ background: #b48857; }}
        .error {{ font-size: 12px; color: #dc2626; text-align: center; }}
    </style>
</head>
<body>
    <div class="panel">
        <h1>관리자 로그인</h1>
        <p class="description">주보 내용을 수정하려면 로그인이 필요합니다.</p>
        <form method="post" action="/admin/login">
            <label for="username">아이디</label>
            <input id="username" name="username" autocomplete="username" required>
            <label for="password">비밀번호</label>
            <input id="password" type="password" name="password" autocomplete="current-password" required>
            {error_html}
            <button type="submit">로그인</button>
        </form>
    </div>
</body>
</html>"#
    )
}

/// Admin editor: bulletin picker, the full field form, and a praise-card
/// editor that re-serializes the rows into the stored JSON form on save.
pub fn render_admin_page(selected: Option<&BulletinRecord>, list: &[BulletinSummary]) -> String {
    let date = selected.map(|b| b.date.as_str()).unwrap_or("");
    let praise_rows = selected
        .map(|b| crate::praise::decode(&b.praises))
        .unwrap_or_default();
    let praise_json = escape_html(&serde_json::to_string(&praise_rows).unwrap_or_default());

    let options = list
        .iter()
        .map(|item| {
            let selected_attr = if item.date == date { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected_attr}>{}</option>"#,
                escape_html(&item.date),
                escape_html(&format_bulletin_option(&item.date, &item.event_type))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let field = |value: Option<&str>| escape_html(value.unwrap_or(""));
    let event_type = selected.map(|b| b.event_type.as_str()).unwrap_or("주일 예배");
    let time = selected.map(|b| b.time.as_str()).unwrap_or("11:00");

    format!(
        r##"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>주보 관리 · 다시본교회</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ margin: 0; background: #f7f1e6; color: #3b2a20; font-family: "Apple SD Gothic Neo", "Noto Sans KR", sans-serif; }}
        .wrap {{ max-width: 44rem; margin: 0 auto; padding: 1.5rem 1rem 4rem; }}
        header {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.25rem; }}
        h1 {{ margin: 0; font-size: 1.15rem; }}
        header form button {{ border: 1px solid #d3c2aa; background: rgba(255,255,255,0.7); border-radius: 999px; padding: 0.35rem 0.9rem; font-size: 12px; cursor: pointer; }}
        .panel {{ border: 1px solid #e5d6c0; background: rgba(251,245,235,0.95); border-radius: 1rem; padding: 1.25rem; margin-bottom: 1rem; }}
        label {{ display: block; font-size: 12px; color: rgba(59,42,32,0.7); margin: 0.75rem 0 0.25rem; }}
        input[type="text"], input[type="date"], input[type="color"], select, textarea {{ width: 100%; box-sizing: border-box; border-radius: 0.375rem; border: 1px solid #e5d6c0; background: #fff; padding: 0.5rem 0.75rem; font-size: 13px; font-family: inherit; }}
        textarea {{ min-height: 6rem; resize: vertical; }}
        .row {{ display: flex; gap: 0.75rem; }}
        .row > div {{ flex: 1; }}
        .praise-row {{ display: flex; gap: 0.5rem; align-items: center; margin-bottom: 0.5rem; }}
        .praise-row input[type="text"] {{ flex: 1; }}
        .praise-row .thumb {{ font-size: 11px; color: rgba(59,42,32,0.55); max-width: 10rem; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }}
        button.small {{ border: 1px solid #d3c2aa; background: rgba(255,255,255,0.8); border-radius: 0.375rem; padding: 0.3rem 0.6rem; font-size: 12px; cursor: pointer; }}
        .actions {{ display: flex; gap: 0.75rem; margin-top: 1.25rem; }}
        .actions button {{ border: none; border-radius: 999px; padding: 0.6rem 1.5rem; font-size: 13px; font-weight: 600; cursor: pointer; }}
        #save {{ background: #c49a6c; color: #fff; }}
        #delete {{ background: transparent; border: 1px solid #dc2626; color: #dc2626; }}
        #status {{ font-size: 12px; margin-top: 0.75rem; min-height: 1rem; }}
    </style>
</head>
<body>
    <div class="wrap">
        <header>
            <h1>주보 관리</h1>
            <form method="post" action="/admin/logout"><button type="submit">로그아웃</button></form>
        </header>

        <div class="panel">
            <label for="picker">수정할 주보</label>
            <select id="picker" onchange="location.href = this.value ? '/admin?date=' + encodeURIComponent(this.value) : '/admin';">
                <option value="">새 주보 작성</option>
{options}
            </select>
        </div>

        <form id="editor" class="panel">
            <div class="row">
                <div>
                    <label for="date">날짜</label>
                    <input type="date" id="date" name="date" value="{date}" required>
                </div>
                <div>
                    <label for="eventType">예배 구분</label>
                    <input type="text" id="eventType" name="eventType" value="{event_type}">
                </div>
                <div>
                    <label for="time">시간</label>
                    <input type="text" id="time" name="time" value="{time}">
                </div>
            </div>

            <div class="row">
                <div>
                    <label for="sermonTitleMain">설교 제목</label>
                    <input type="text" id="sermonTitleMain" value="{sermon_title_main}">
                </div>
                <div style="flex: 0 0 5rem">
                    <label for="sermonTitleMainColor">색상</label>
                    <input type="color" id="sermonTitleMainColor" value="{sermon_title_main_color}">
                </div>
            </div>
            <div class="row">
                <div>
                    <label for="sermonTitleSub">설교 부제</label>
                    <input type="text" id="sermonTitleSub" value="{sermon_title_sub}">
                </div>
                <div style="flex: 0 0 5rem">
                    <label for="sermonTitleSubColor">색상</label>
                    <input type="color" id="sermonTitleSubColor" value="{sermon_title_sub_color}">
                </div>
            </div>

            <label>찬양</label>
            <div id="praise-rows"></div>
            <button type="button" class="small" onclick="addPraiseRow('', '')">+ 찬양 추가</button>
            <input type="hidden" id="praises" value="{praise_json}">

            <label for="prayers">주기도문</label>
            <textarea id="prayers">{prayers}</textarea>

            <label for="passage">말씀</label>
            <textarea id="passage">{passage}</textarea>

            <label for="sermonDescription">나눔 질문</label>
            <textarea id="sermonDescription">{sermon_description}</textarea>

            <label for="announcements">광고</label>
            <textarea id="announcements">{announcements}</textarea>

            <label for="introBackgroundUrl">인트로 배경 이미지 URL</label>
            <input type="text" id="introBackgroundUrl" value="{intro_background_url}">
            <input type="file" id="background-upload" accept="image/*" onchange="uploadInto(this, 'introBackgroundUrl')">

            <label for="youtubeUrl">유튜브 URL</label>
            <input type="text" id="youtubeUrl" value="{youtube_url}">

            <label for="ogImageUrl">미리보기(OG) 이미지 URL</label>
            <input type="text" id="ogImageUrl" value="{og_image_url}">

            <div class="actions">
                <button type="submit" id="save">저장</button>
                <button type="button" id="delete" onclick="removeBulletin()">삭제</button>
            </div>
            <p id="status"></p>
        </form>
    </div>

    <script>
        var rowsEl = document.getElementById("praise-rows");
        var statusEl = document.getElementById("status");

        function addPraiseRow(title, imageUrl) {{
            var row = document.createElement("div");
            row.className = "praise-row";
            row.innerHTML =
                '<input type="text" placeholder="찬양 제목" class="praise-title">' +
                '<span class="thumb"></span>' +
                '<input type="file" accept="image/*" style="display:none">' +
                '<button type="button" class="small">악보</button>' +
                '<button type="button" class="small">삭제</button>';
            row.querySelector(".praise-title").value = title;
            row.querySelector(".thumb").textContent = imageUrl;
            row.dataset.imageUrl = imageUrl;
            var fileInput = row.querySelector("input[type=file]");
            var buttons = row.querySelectorAll("button");
            buttons[0].addEventListener("click", function () {{ fileInput.click(); }});
            fileInput.addEventListener("change", function () {{
                uploadFile(fileInput.files[0]).then(function (url) {{
                    discardAsset(row.dataset.imageUrl);
                    row.dataset.imageUrl = url;
                    row.querySelector(".thumb").textContent = url;
                }}).catch(showError);
            }});
            buttons[1].addEventListener("click", function () {{ row.remove(); }});
            rowsEl.appendChild(row);
        }}

        function collectPraises() {{
            return Array.prototype.map.call(rowsEl.children, function (row) {{
                return {{
                    title: row.querySelector(".praise-title").value.trim(),
                    imageUrl: row.dataset.imageUrl || ""
                }};
            }}).filter(function (card) {{ return card.title || card.imageUrl; }});
        }}

        function uploadFile(file) {{
            var form = new FormData();
            form.append("file", file);
            return fetch("/api/upload", {{ method: "POST", body: form }}).then(function (res) {{
                if (!res.ok) return res.json().then(function (body) {{ throw new Error(body.error); }});
                return res.json().then(function (body) {{ return body.url; }});
            }});
        }}

        function uploadInto(input, targetId) {{
            if (!input.files[0]) return;
            uploadFile(input.files[0]).then(function (url) {{
                discardAsset(document.getElementById(targetId).value);
                document.getElementById(targetId).value = url;
            }}).catch(showError);
        }}

        // Replaced images are deleted fire-and-forget; a failed delete only
        // leaves an orphaned object behind, never an error in the editor.
        function discardAsset(url) {{
            if (!url) return;
            fetch("/api/upload", {{
                method: "DELETE",
                headers: {{ "Content-Type": "application/json" }},
                body: JSON.stringify({{ url: url }})
            }}).catch(function () {{}});
        }}

        function showError(err) {{
            statusEl.textContent = err.message || "요청에 실패했습니다.";
            statusEl.style.color = "#dc2626";
        }}

        function val(id) {{ return document.getElementById(id).value; }}

        document.getElementById("editor").addEventListener("submit", function (e) {{
            e.preventDefault();
            var cards = collectPraises();
            var payload = {{
                date: val("date"),
                eventType: val("eventType"),
                time: val("time"),
                sermonTitleMain: val("sermonTitleMain"),
                sermonTitleMainColor: val("sermonTitleMainColor"),
                sermonTitleSub: val("sermonTitleSub"),
                sermonTitleSubColor: val("sermonTitleSubColor"),
                praises: cards.length ? JSON.stringify(cards) : "",
                prayers: val("prayers"),
                passage: val("passage"),
                sermonDescription: val("sermonDescription"),
                announcements: val("announcements"),
                introBackgroundUrl: val("introBackgroundUrl"),
                youtubeUrl: val("youtubeUrl"),
                ogImageUrl: val("ogImageUrl")
            }};
            fetch("/api/bulletins", {{
                method: "POST",
                headers: {{ "Content-Type": "application/json" }},
                body: JSON.stringify(payload)
            }}).then(function (res) {{
                if (!res.ok) return res.json().then(function (body) {{ throw new Error(body.error); }});
                statusEl.textContent = "저장되었습니다.";
                statusEl.style.color = "#16a34a";
            }}).catch(showError);
        }});

        function removeBulletin() {{
            var date = val("date");
            if (!date || !confirm(date + " 주보를 삭제할까요?")) return;
            fetch("/api/bulletins/" + encodeURIComponent(date), {{ method: "DELETE" }}).then(function (res) {{
                if (!res.ok) return res.json().then(function (body) {{ throw new Error(body.error); }});
                location.href = "/admin";
            }}).catch(showError);
        }}

        JSON.parse(document.getElementById("praises").value || "[]").forEach(function (card) {{
            addPraiseRow(card.title, card.imageUrl);
        }});
        if (rowsEl.children.length === 0) addPraiseRow("", "");
    </script>
</body>
</html>"##,
        date = escape_html(date),
        event_type = escape_html(event_type),
        time = escape_html(time),
        sermon_title_main = field(selected.map(|b| b.sermon_title_main.as_str())),
        sermon_title_main_color = escape_html(
            selected
                .and_then(|b| b.sermon_title_main_color.as_deref())
                .unwrap_or(DEFAULT_TITLE_COLOR)
        ),
        sermon_title_sub = field(selected.map(|b| b.sermon_title_sub.as_str())),
        sermon_title_sub_color = escape_html(
            selected
                .and_then(|b| b.sermon_title_sub_color.as_deref())
                .unwrap_or(DEFAULT_TITLE_COLOR)
        ),
        prayers = field(selected.map(|b| b.prayers.as_str())),
        passage = field(selected.map(|b| b.passage.as_str())),
        sermon_description = field(selected.map(|b| b.sermon_description.as_str())),
        announcements = field(selected.map(|b| b.announcements.as_str())),
        intro_background_url = field(selected.and_then(|b| b.intro_background_url.as_deref())),
        youtube_url = field(selected.and_then(|b| b.youtube_url.as_deref())),
        og_image_url = field(selected.and_then(|b| b.og_image_url.as_deref())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_usual_suspects() {
        assert_eq!(
            escape_html(r#"<b a="x">&'"#),
            "&lt;b a=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn rich_text_keeps_markup_and_promotes_newlines() {
        assert_eq!(
            rich_text_html("<p>광고</p>\n다음 줄"),
            "<p>광고</p><br />다음 줄"
        );
    }

    #[test]
    fn date_labels_drop_leading_zeros() {
        assert_eq!(
            format_date_label("2025-01-26", "11:00"),
            "2025년 1월 26일 · 오전 11:00"
        );
        assert_eq!(format_date_label("", "11:00"), DEFAULT_DATE_LABEL);
        assert_eq!(format_date_label("not-a-date", ""), DEFAULT_DATE_LABEL);
    }

    #[test]
    fn option_labels_fall_back_to_default_event_type() {
        assert_eq!(
            format_bulletin_option("2025-01-26", ""),
            "2025년 1월 26일 주일 예배"
        );
        assert_eq!(
            format_bulletin_option("2025-01-26", "금요 기도회"),
            "2025년 1월 26일 금요 기도회"
        );
        assert_eq!(format_bulletin_option("", ""), "—");
    }

    #[test]
    fn admin_page_renders_editor_script_with_status_colors() {
        // The inline script's quoted hex colors must survive into the page
        // markup intact.
        let page = render_admin_page(None, &[]);
        assert!(page.contains(r##"statusEl.style.color = "#dc2626";"##));
        assert!(page.contains(r##"statusEl.style.color = "#16a34a";"##));
        assert!(page.contains("fetch(\"/api/bulletins\""));
    }

    #[test]
    fn absent_title_colors_seed_the_pickers_white() {
        let page = render_admin_page(None, &[]);
        assert!(page.contains(r##"id="sermonTitleMainColor" value="#ffffff""##));
        assert!(page.contains(r##"id="sermonTitleSubColor" value="#ffffff""##));
    }

    #[test]
    fn order_urls_carry_the_date_param() {
        assert_eq!(order_url(None, 2), "/?view=order&section=2");
        assert_eq!(
            order_url(Some("2025-01-26"), 0),
            "/?date=2025-01-26&view=order&section=0"
        );
    }
}
