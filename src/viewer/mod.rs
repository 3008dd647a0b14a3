pub mod carousel;
pub mod read_path;
pub mod sections;

/// Minimum horizontal travel, in pixels, before a release counts as a page
/// change. Shared by the section pager and the score carousel.
pub const SWIPE_THRESHOLD: f32 = 36.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Rightward swipe: go to the previous page.
    Back,
    /// Leftward swipe: go to the next page.
    Forward,
}

/// Interpret a completed gesture. Vertical intent wins on ties
/// (`|dx| < |dy|` is a scroll, not a page change), and sub-threshold travel
/// is a no-op.
pub fn swipe_direction(dx: f32, dy: f32) -> Option<SwipeDirection> {
    if dx.abs() < dy.abs() || dx.abs() < SWIPE_THRESHOLD {
        return None;
    }
    if dx > 0.0 {
        Some(SwipeDirection::Back)
    } else {
        Some(SwipeDirection::Forward)
    }
}

/// Records the start point of a touch gesture; the release is evaluated
/// atomically against the start. No mid-gesture state beyond the origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Consume the gesture. Returns `None` when no start was recorded, the
    /// travel is sub-threshold, or vertical movement dominates.
    pub fn end(&mut self, x: f32, y: f32) -> Option<SwipeDirection> {
        let (x0, y0) = self.start.take()?;
        swipe_direction(x - x0, y - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_dominant_gesture_is_a_scroll() {
        assert_eq!(swipe_direction(50.0, 80.0), None);
        assert_eq!(swipe_direction(-200.0, 300.0), None);
    }

    #[test]
    fn tie_goes_to_vertical_intent() {
        // |dx| == |dy| still pages: the asymmetric rule is |dx| < |dy| → scroll.
        assert_eq!(swipe_direction(40.0, 40.0), Some(SwipeDirection::Back));
        assert_eq!(swipe_direction(40.0, 41.0), None);
    }

    #[test]
    fn sub_threshold_travel_is_ignored() {
        assert_eq!(swipe_direction(35.9, 0.0), None);
        assert_eq!(swipe_direction(-20.0, 0.0), None);
        assert_eq!(swipe_direction(36.0, 0.0), Some(SwipeDirection::Back));
        assert_eq!(swipe_direction(-36.0, 0.0), Some(SwipeDirection::Forward));
    }

    #[test]
    fn tracker_requires_a_recorded_start() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.end(100.0, 0.0), None);

        tracker.begin(100.0, 10.0);
        assert_eq!(tracker.end(10.0, 12.0), Some(SwipeDirection::Forward));
        // The start point is consumed with the gesture.
        assert_eq!(tracker.end(300.0, 12.0), None);
    }
}
