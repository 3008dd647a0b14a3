use crate::praise::{self, PraiseCard};
use crate::viewer::{SwipeDirection, swipe_direction};

/// Mouse drags need this much cumulative travel before a release is
/// evaluated at all; it filters out click jitter.
pub const MOUSE_JITTER_THRESHOLD: f32 = 10.0;

/// Once horizontal travel dominates and exceeds this, the viewport's
/// vertical scrolling is suppressed for the rest of a touch gesture.
pub const SCROLL_LOCK_THRESHOLD: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Shareable deep link for the image currently on screen. Every successful
/// index change produces a fresh one so the position is bookmarkable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreLink {
    pub url: String,
    pub index: usize,
    pub date: String,
}

impl ScoreLink {
    pub fn href(&self) -> String {
        format!(
            "/score?url={}&index={}&date={}",
            urlencoding::encode(&self.url),
            self.index,
            urlencoding::encode(&self.date)
        )
    }
}

/// Drag interpreter shared by mouse and touch input on the carousel.
#[derive(Clone, Copy, Debug, Default)]
struct DragTracker {
    start: Option<(f32, f32, PointerKind)>,
    recognized: bool,
    scroll_locked: bool,
}

impl DragTracker {
    fn begin(&mut self, kind: PointerKind, x: f32, y: f32) {
        self.start = Some((x, y, kind));
        self.recognized = kind == PointerKind::Touch;
        self.scroll_locked = false;
    }

    /// Track movement mid-gesture. Returns `true` while vertical scrolling
    /// must stay suppressed.
    fn moved(&mut self, x: f32, y: f32) -> bool {
        let Some((x0, y0, kind)) = self.start else {
            return false;
        };
        let dx = x - x0;
        let dy = y - y0;
        match kind {
            PointerKind::Mouse => {
                if dx.abs() > MOUSE_JITTER_THRESHOLD || dy.abs() > MOUSE_JITTER_THRESHOLD {
                    self.recognized = true;
                }
            }
            PointerKind::Touch => {
                if dx.abs() > dy.abs() && dx.abs() > SCROLL_LOCK_THRESHOLD {
                    self.scroll_locked = true;
                }
            }
        }
        self.scroll_locked
    }

    fn end(&mut self, x: f32, y: f32) -> Option<SwipeDirection> {
        let (x0, y0, _) = self.start.take()?;
        let recognized = self.recognized;
        self.recognized = false;
        self.scroll_locked = false;
        if !recognized {
            return None;
        }
        swipe_direction(x - x0, y - y0)
    }

    // Pointer-leave handler: discard in-progress drag state.
    fn cancel(&mut self) {
        self.start = None;
        self.recognized = false;
        self.scroll_locked = false;
    }
}

/// Pager over the image-bearing praise cards of one bulletin, entered from a
/// specific card's deep link.
#[derive(Clone, Debug)]
pub struct ScoreCarousel {
    date: String,
    requested_url: String,
    current: usize,
    cards: Vec<PraiseCard>,
    loaded: bool,
    drag: DragTracker,
}

impl ScoreCarousel {
    /// Build from deep-link parameters. Until [`load`](Self::load) runs the
    /// carousel shows the single requested image with no paging affordance.
    pub fn new(date: impl Into<String>, url: impl Into<String>, index: usize) -> Self {
        Self {
            date: date.into(),
            requested_url: url.into(),
            current: index,
            cards: Vec::new(),
            loaded: false,
            drag: DragTracker::default(),
        }
    }

    /// Feed the freshly fetched card list. Cards without an image are
    /// filtered out; an empty result is a silent degrade to the single
    /// requested image. When the requested URL is found at a different
    /// position (the list was edited since the link was created), the index
    /// snaps to the fresh position.
    pub fn load(&mut self, cards: &[PraiseCard]) {
        let images = praise::image_cards(cards);
        if images.is_empty() {
            self.cards.clear();
            self.loaded = false;
            return;
        }

        let snapped = images
            .iter()
            .position(|card| card.image_url == self.requested_url)
            .unwrap_or_else(|| self.current.min(images.len() - 1));

        self.cards = images;
        self.current = snapped;
        self.loaded = true;
    }

    pub fn has_multiple(&self) -> bool {
        self.loaded && self.cards.len() > 1
    }

    /// Number of pages; a not-yet-loaded or degraded carousel is one page.
    pub fn len(&self) -> usize {
        if self.loaded { self.cards.len() } else { 1 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_url(&self) -> &str {
        if self.loaded {
            &self.cards[self.current].image_url
        } else {
            &self.requested_url
        }
    }

    pub fn current_title(&self) -> Option<&str> {
        self.loaded.then(|| self.cards[self.current].title.as_str())
    }

    /// Current deep link regardless of whether anything just changed.
    pub fn link(&self) -> ScoreLink {
        ScoreLink {
            url: self.current_url().to_string(),
            index: self.current,
            date: self.date.clone(),
        }
    }

    /// Dot tap: immediate, unconditional jump. Always yields the new link.
    pub fn select(&mut self, index: usize) -> ScoreLink {
        if self.loaded {
            self.current = index.min(self.cards.len() - 1);
        }
        self.link()
    }

    pub fn drag_start(&mut self, kind: PointerKind, x: f32, y: f32) {
        self.drag.begin(kind, x, y);
    }

    /// Returns `true` while the viewport must not scroll vertically.
    pub fn drag_move(&mut self, x: f32, y: f32) -> bool {
        self.drag.moved(x, y)
    }

    /// Evaluate the release. A changed index yields the updated deep link —
    /// the required side effect of every successful transition.
    pub fn drag_end(&mut self, x: f32, y: f32) -> Option<ScoreLink> {
        let direction = self.drag.end(x, y)?;
        if !self.has_multiple() {
            return None;
        }
        match direction {
            SwipeDirection::Back if self.current > 0 => {
                self.current -= 1;
                Some(self.link())
            }
            SwipeDirection::Forward if self.current < self.cards.len() - 1 => {
                self.current += 1;
                Some(self.link())
            }
            _ => None,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_image_cards() -> Vec<PraiseCard> {
        vec![
            PraiseCard::new("無 이미지", ""),
            PraiseCard::new("a", "/uploads/a.png"),
            PraiseCard::new("b", "/uploads/b.png"),
            PraiseCard::new("c", "/uploads/c.png"),
        ]
    }

    #[test]
    fn degrades_to_single_image_before_load() {
        let carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        assert!(!carousel.has_multiple());
        assert_eq!(carousel.current_url(), "/uploads/a.png");
        assert_eq!(carousel.len(), 1);
    }

    #[test]
    fn load_filters_to_image_cards() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());
        assert!(carousel.has_multiple());
        assert_eq!(carousel.len(), 3);
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn snaps_to_requested_url_after_list_edit() {
        // The link was minted when this image sat at index 1; it is at
        // position 2 of the fresh list now.
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/c.png", 1);
        carousel.load(&three_image_cards());
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(carousel.current_url(), "/uploads/c.png");
    }

    #[test]
    fn unknown_url_clamps_requested_index() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/gone.png", 9);
        carousel.load(&three_image_cards());
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn empty_image_list_is_a_silent_degrade() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&[PraiseCard::new("텍스트만", "")]);
        assert!(!carousel.has_multiple());
        assert_eq!(carousel.current_url(), "/uploads/a.png");
    }

    #[test]
    fn touch_swipe_changes_index_and_updates_link() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());

        carousel.drag_start(PointerKind::Touch, 300.0, 100.0);
        let link = carousel.drag_end(200.0, 105.0).expect("swipe should page");
        assert_eq!(link.index, 1);
        assert_eq!(link.url, "/uploads/b.png");
        assert_eq!(link.date, "2025-01-26");
        assert!(link.href().starts_with("/score?url=%2Fuploads%2Fb.png&index=1"));
    }

    #[test]
    fn mouse_release_without_jitter_is_a_click() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());

        carousel.drag_start(PointerKind::Mouse, 300.0, 100.0);
        // No intermediate movement beyond the jitter threshold was observed.
        assert_eq!(carousel.drag_end(200.0, 100.0), None);
        assert_eq!(carousel.current_index(), 0);

        carousel.drag_start(PointerKind::Mouse, 300.0, 100.0);
        carousel.drag_move(288.0, 100.0);
        assert!(carousel.drag_end(200.0, 100.0).is_some());
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn touch_drag_locks_scroll_once_horizontal_dominates() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());

        carousel.drag_start(PointerKind::Touch, 100.0, 100.0);
        assert!(!carousel.drag_move(105.0, 102.0));
        assert!(carousel.drag_move(120.0, 104.0));
        // Locked for the remainder of the gesture.
        assert!(carousel.drag_move(121.0, 104.0));
        carousel.drag_cancel();
    }

    #[test]
    fn boundary_swipes_are_noops() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());

        carousel.drag_start(PointerKind::Touch, 100.0, 0.0);
        assert_eq!(carousel.drag_end(200.0, 0.0), None);
        assert_eq!(carousel.current_index(), 0);

        carousel.select(2);
        carousel.drag_start(PointerKind::Touch, 200.0, 0.0);
        assert_eq!(carousel.drag_end(100.0, 0.0), None);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn dot_select_jumps_directly() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());
        let link = carousel.select(2);
        assert_eq!(link.index, 2);
        assert_eq!(carousel.current_url(), "/uploads/c.png");
    }

    #[test]
    fn cancel_discards_drag_state() {
        let mut carousel = ScoreCarousel::new("2025-01-26", "/uploads/a.png", 0);
        carousel.load(&three_image_cards());
        carousel.drag_start(PointerKind::Touch, 300.0, 0.0);
        carousel.drag_cancel();
        assert_eq!(carousel.drag_end(100.0, 0.0), None);
    }
}
