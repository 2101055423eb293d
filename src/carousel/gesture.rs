//! Drag/swipe gesture as a pure state machine.
//!
//! [`step`] takes the current [`DragState`] and one [`PointerEvent`] and
//! returns the next state plus a [`DragEffect`] for the engine to apply.
//! Mouse and touch go through the same transitions.

use crate::input::PointerKind;

/// Fraction of the container width a release must exceed to change slides.
pub const SWIPE_THRESHOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start_x: f64,
        dx: f64,
        kind: PointerKind,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, kind: PointerKind },
    Move { x: f64 },
    Up,
    /// Pointer lost (touchcancel, window blur). Snaps back.
    Cancel,
}

/// Where a released drag should take the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeIntent {
    Previous,
    Next,
    SnapBack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    None,
    /// Unanimated offset, in pixels, on top of the current slide position.
    Preview { offset_px: f64 },
    Release(SwipeIntent),
}

/// Advance the gesture by one pointer event.
///
/// `width` is the container width at the time of the event. A resize during
/// a drag only changes the threshold used on release.
pub fn step(state: DragState, event: PointerEvent, width: f64) -> (DragState, DragEffect) {
    match (state, event) {
        (_, PointerEvent::Down { x, kind }) => (
            DragState::Dragging {
                start_x: x,
                dx: 0.0,
                kind,
            },
            DragEffect::None,
        ),
        (DragState::Dragging { start_x, kind, .. }, PointerEvent::Move { x }) => {
            let dx = x - start_x;
            (
                DragState::Dragging { start_x, dx, kind },
                DragEffect::Preview { offset_px: dx },
            )
        }
        (DragState::Dragging { dx, .. }, PointerEvent::Up) => {
            (DragState::Idle, DragEffect::Release(classify(dx, width)))
        }
        (DragState::Dragging { .. }, PointerEvent::Cancel) => {
            (DragState::Idle, DragEffect::Release(SwipeIntent::SnapBack))
        }
        (DragState::Idle, _) => (DragState::Idle, DragEffect::None),
    }
}

fn classify(dx: f64, width: f64) -> SwipeIntent {
    let threshold = width.max(0.0) * SWIPE_THRESHOLD;
    if dx > threshold {
        SwipeIntent::Previous
    } else if dx < -threshold {
        SwipeIntent::Next
    } else {
        SwipeIntent::SnapBack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(from: f64, to: f64, width: f64) -> SwipeIntent {
        let (s, _) = step(
            DragState::Idle,
            PointerEvent::Down {
                x: from,
                kind: PointerKind::Mouse,
            },
            width,
        );
        let (s, _) = step(s, PointerEvent::Move { x: to }, width);
        match step(s, PointerEvent::Up, width) {
            (DragState::Idle, DragEffect::Release(intent)) => intent,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn right_drag_past_threshold_goes_previous() {
        assert_eq!(drag(100.0, 200.0, 400.0), SwipeIntent::Previous);
    }

    #[test]
    fn left_drag_past_threshold_goes_next() {
        assert_eq!(drag(300.0, 200.0, 400.0), SwipeIntent::Next);
    }

    #[test]
    fn short_drag_snaps_back() {
        // 15% of 400 is 60
        assert_eq!(drag(100.0, 160.0, 400.0), SwipeIntent::SnapBack);
        assert_eq!(drag(100.0, 40.0, 400.0), SwipeIntent::SnapBack);
    }

    #[test]
    fn move_reports_offset() {
        let (s, _) = step(
            DragState::Idle,
            PointerEvent::Down {
                x: 50.0,
                kind: PointerKind::Touch,
            },
            300.0,
        );
        let (s, effect) = step(s, PointerEvent::Move { x: 20.0 }, 300.0);
        assert_eq!(effect, DragEffect::Preview { offset_px: -30.0 });
        assert!(s.is_dragging());
    }

    #[test]
    fn events_without_drag_are_ignored() {
        assert_eq!(
            step(DragState::Idle, PointerEvent::Move { x: 10.0 }, 100.0),
            (DragState::Idle, DragEffect::None)
        );
        assert_eq!(
            step(DragState::Idle, PointerEvent::Up, 100.0),
            (DragState::Idle, DragEffect::None)
        );
    }

    #[test]
    fn cancel_snaps_back() {
        let dragging = DragState::Dragging {
            start_x: 0.0,
            dx: 500.0,
            kind: PointerKind::Touch,
        };
        assert_eq!(
            step(dragging, PointerEvent::Cancel, 100.0),
            (DragState::Idle, DragEffect::Release(SwipeIntent::SnapBack))
        );
    }

    #[test]
    fn width_change_mid_drag_uses_release_width() {
        let (s, _) = step(
            DragState::Idle,
            PointerEvent::Down {
                x: 0.0,
                kind: PointerKind::Mouse,
            },
            1000.0,
        );
        let (s, _) = step(s, PointerEvent::Move { x: 100.0 }, 1000.0);
        // 100px is under 15% of 1000 but over 15% of 500.
        assert_eq!(
            step(s, PointerEvent::Up, 500.0).1,
            DragEffect::Release(SwipeIntent::Previous)
        );
    }
}
