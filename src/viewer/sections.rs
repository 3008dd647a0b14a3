use crate::bulletin::BulletinRecord;
use crate::praise::{self, PraiseCard};
use crate::viewer::{SwipeDirection, SwipeTracker};

pub const FONT_SCALE_MIN: f32 = 0.9;
pub const FONT_SCALE_MAX: f32 = 1.2;
pub const FONT_SCALE_STEP: f32 = 0.1;

pub const DEFAULT_PRAYERS: &str = "하늘에 계신 우리 아버지, 아버지의 이름을 거룩하게 하시며,\n아버지의 나라가 오게 하시며, 아버지의 뜻이 하늘에서와 같이 땅에서도 이루어지게 하소서.\n오늘 우리에게 일용할 양식을 주시고, 우리가 우리에게 잘못한 사람을 용서해 준 것 같이 우리 죄를 용서해 주시고,\n우리를 시험에 빠지지 않게 하시고 악에서 구하소서.\n\n나라와 권능과 영광이 영원히 아버지의 것입니다. 아멘.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionId {
    Praises,
    Prayers,
    Passage,
    Sermon,
    Announcements,
}

/// One paged screen of the worship-order viewer, rebuilt from the bulletin
/// on every render.
#[derive(Clone, Debug)]
pub struct Section {
    pub id: SectionId,
    pub label: &'static str,
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Clone, Debug)]
pub enum SectionBody {
    /// Decoded praise cards; cards with an image link into the score viewer.
    PraiseCards(Vec<PraiseCard>),
    /// Stored rich text, rendered verbatim with newline → `<br>` conversion.
    Html(String),
    /// Sermon composite: titles with optional color overrides plus the
    /// rich-text description.
    Sermon {
        title_main: String,
        title_main_color: Option<String>,
        title_sub: String,
        title_sub_color: Option<String>,
        description: String,
    },
}

/// Build the five viewer sections from a bulletin record.
pub fn build_sections(record: &BulletinRecord) -> Vec<Section> {
    let cards = praise::decode(&record.praises);
    let praises_body = if cards.is_empty() {
        // Legacy bulletins may hold free text that decodes to nothing useful.
        SectionBody::Html(record.praises.clone())
    } else {
        SectionBody::PraiseCards(cards)
    };

    vec![
        Section {
            id: SectionId::Praises,
            label: "찬양",
            title: "[찬양]",
            body: praises_body,
        },
        Section {
            id: SectionId::Prayers,
            label: "주기도문",
            title: "[주기도문]",
            body: SectionBody::Html(record.prayers.clone()),
        },
        Section {
            id: SectionId::Passage,
            label: "말씀",
            title: "[말씀]",
            body: SectionBody::Html(or_dash(&record.passage)),
        },
        Section {
            id: SectionId::Sermon,
            label: "나눔 질문",
            title: "[나눔 질문]",
            body: SectionBody::Sermon {
                title_main: record.sermon_title_main.clone(),
                title_main_color: record.sermon_title_main_color.clone(),
                title_sub: record.sermon_title_sub.clone(),
                title_sub_color: record.sermon_title_sub_color.clone(),
                description: record.sermon_description.clone(),
            },
        },
        Section {
            id: SectionId::Announcements,
            label: "광고",
            title: "[광고]",
            body: SectionBody::Html(or_dash(&record.announcements)),
        },
    ]
}

/// Placeholder sections shown when no bulletin exists for the request.
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            id: SectionId::Praises,
            label: "찬양",
            title: "[찬양]",
            body: SectionBody::PraiseCards(vec![
                PraiseCard::new("찬양하세", ""),
                PraiseCard::new("풀은 마르고 꽃은 시드나", ""),
                PraiseCard::new("온 땅의 주인", ""),
            ]),
        },
        Section {
            id: SectionId::Prayers,
            label: "주기도문",
            title: "[주기도문]",
            body: SectionBody::Html(DEFAULT_PRAYERS.to_string()),
        },
        Section {
            id: SectionId::Passage,
            label: "말씀",
            title: "[말씀]",
            body: SectionBody::Html("본문을 입력해 주세요.".to_string()),
        },
        Section {
            id: SectionId::Sermon,
            label: "나눔 질문",
            title: "[나눔 질문]",
            body: SectionBody::Html("나눔 질문을 입력해 주세요.".to_string()),
        },
        Section {
            id: SectionId::Announcements,
            label: "광고",
            title: "[광고]",
            body: SectionBody::Html("광고 내용을 입력해 주세요.".to_string()),
        },
    ]
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}

/// Linear, non-cyclic pager over a fixed section list, with a clamped font
/// scale orthogonal to the position.
#[derive(Clone, Copy, Debug)]
pub struct SectionNav {
    active: usize,
    len: usize,
    font_scale: f32,
    tracker: SwipeTracker,
}

impl SectionNav {
    pub fn new(len: usize) -> Self {
        Self {
            active: 0,
            len: len.max(1),
            font_scale: 1.0,
            tracker: SwipeTracker::default(),
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    /// Tab select: tabs enumerate valid indices, so the jump is unconditional.
    pub fn select(&mut self, index: usize) {
        self.active = index;
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.tracker.begin(x, y);
    }

    /// Evaluate the release. Returns `true` when the active section changed;
    /// boundary swipes are no-ops, never wraparounds.
    pub fn touch_end(&mut self, x: f32, y: f32) -> bool {
        match self.tracker.end(x, y) {
            Some(SwipeDirection::Back) if self.active > 0 => {
                self.active -= 1;
                true
            }
            Some(SwipeDirection::Forward) if self.active < self.len - 1 => {
                self.active += 1;
                true
            }
            _ => false,
        }
    }

    pub fn increase_font(&mut self) {
        self.font_scale = clamp_scale(self.font_scale + FONT_SCALE_STEP);
    }

    pub fn decrease_font(&mut self) {
        self.font_scale = clamp_scale(self.font_scale - FONT_SCALE_STEP);
    }
}

// Round to one decimal so repeated steps do not accumulate float drift.
fn clamp_scale(value: f32) -> f32 {
    let rounded = (value * 10.0).round() / 10.0;
    rounded.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BulletinRecord {
        BulletinRecord {
            date: "2025-01-26".to_string(),
            event_type: "주일 예배".to_string(),
            time: "11:00".to_string(),
            sermon_title_main: "다시 부르심".to_string(),
            sermon_title_main_color: Some("#ffe0b2".to_string()),
            sermon_title_sub: "".to_string(),
            sermon_title_sub_color: None,
            praises: crate::praise::encode(&[
                PraiseCard::new("찬양하세", ""),
                PraiseCard::new("창조의 아버지", "/uploads/score.png"),
            ]),
            prayers: DEFAULT_PRAYERS.to_string(),
            passage: "요한복음 3:16".to_string(),
            sermon_description: "나눔 질문입니다.".to_string(),
            announcements: "".to_string(),
            intro_background_url: None,
            youtube_url: None,
            og_image_url: None,
        }
    }

    #[test]
    fn builds_five_sections_in_fixed_order() {
        let sections = build_sections(&record());
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[0].id, SectionId::Praises);
        assert_eq!(sections[4].id, SectionId::Announcements);
        match &sections[0].body {
            SectionBody::PraiseCards(cards) => assert_eq!(cards.len(), 2),
            other => panic!("expected praise cards, got {other:?}"),
        }
    }

    #[test]
    fn empty_announcements_render_as_dash() {
        let sections = build_sections(&record());
        match &sections[4].body {
            SectionBody::Html(html) => assert_eq!(html, "—"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn swipe_left_advances_and_right_is_noop_at_start() {
        let mut nav = SectionNav::new(5);

        // Swipe right at the first section: already at the boundary.
        nav.touch_start(40.0, 100.0);
        assert!(!nav.touch_end(140.0, 100.0));
        assert_eq!(nav.active(), 0);

        // Swipe left moves forward.
        nav.touch_start(300.0, 100.0);
        assert!(nav.touch_end(200.0, 100.0));
        assert_eq!(nav.active(), 1);
    }

    #[test]
    fn vertical_dominant_gesture_never_pages() {
        let mut nav = SectionNav::new(5);
        nav.select(1);
        nav.touch_start(0.0, 0.0);
        assert!(!nav.touch_end(-500.0, 600.0));
        assert_eq!(nav.active(), 1);
    }

    #[test]
    fn forward_swipes_clamp_at_last_section() {
        let mut nav = SectionNav::new(3);
        for _ in 0..5 {
            nav.touch_start(200.0, 0.0);
            nav.touch_end(100.0, 0.0);
        }
        assert_eq!(nav.active(), 2);
    }

    #[test]
    fn tab_select_is_unconditional() {
        let mut nav = SectionNav::new(5);
        nav.select(4);
        assert_eq!(nav.active(), 4);
        nav.select(0);
        assert_eq!(nav.active(), 0);
    }

    #[test]
    fn font_scale_clamps_at_both_ends() {
        let mut nav = SectionNav::new(5);
        for _ in 0..5 {
            nav.increase_font();
        }
        assert!((nav.font_scale() - FONT_SCALE_MAX).abs() < f32::EPSILON);

        for _ in 0..10 {
            nav.decrease_font();
        }
        assert!((nav.font_scale() - FONT_SCALE_MIN).abs() < f32::EPSILON);
    }
}
