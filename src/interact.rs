// Pointer state machine: raw press/move/release events in, preview and
// committed shapes out. The state is an explicit value owned by the driver,
// threaded through `handle` — no globals, no callbacks.

use crate::canvas::{Shape, Tool};
use crate::frame::Point;

/// Raw pointer events as delivered by the window layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
}

/// Where the current gesture stands. `Dragging` pins the tool chosen at
/// press time, so changing tools mid-drag doesn't morph the gesture.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InteractionState {
    Idle,
    Dragging { anchor: Point, tool: Tool },
}

/// What one transition produced. A preview lives for this tick's overlay
/// only; a commit is handed to the canvas and persists.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Outcome {
    pub preview: Option<Shape>,
    pub committed: Option<Shape>,
}

impl InteractionState {
    /// Apply one pointer event. `tool` and `color` are the currently
    /// selected pen settings from the parameter snapshot.
    pub fn handle(self, event: PointerEvent, tool: Tool, color: u32) -> (Self, Outcome) {
        match (self, event) {
            // Press anchors a new gesture; nothing is drawn yet.
            (InteractionState::Idle, PointerEvent::Press(p)) => {
                (InteractionState::Dragging { anchor: p, tool }, Outcome::default())
            }

            // Rubber-band feedback: preview only, never committed.
            (InteractionState::Dragging { anchor, tool }, PointerEvent::Move(p)) => {
                let preview = Shape { tool, anchor, end: p, color };
                (
                    InteractionState::Dragging { anchor, tool },
                    Outcome { preview: Some(preview), committed: None },
                )
            }

            // Release finalizes the shape exactly once and returns to Idle.
            (InteractionState::Dragging { anchor, tool }, PointerEvent::Release(p)) => {
                let committed = Shape { tool, anchor, end: p, color };
                (InteractionState::Idle, Outcome { preview: None, committed: Some(committed) })
            }

            // A second press mid-drag can happen after a focus loss ate the
            // release; restart the gesture from the new point.
            (InteractionState::Dragging { .. }, PointerEvent::Press(p)) => {
                (InteractionState::Dragging { anchor: p, tool }, Outcome::default())
            }

            // Stale move/release while idle: pointer events may arrive out
            // of order around focus changes. Ignore, not an error.
            (InteractionState::Idle, PointerEvent::Move(_) | PointerEvent::Release(_)) => {
                (InteractionState::Idle, Outcome::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn full_gesture_commits_exactly_one_shape() {
        let color = 0x0000FF00;
        let state = InteractionState::Idle;

        let (state, out) = state.handle(PointerEvent::Press(p(10, 10)), Tool::Rect, color);
        assert!(out.preview.is_none() && out.committed.is_none());

        let (state, out) = state.handle(PointerEvent::Move(p(30, 40)), Tool::Rect, color);
        let preview = out.preview.expect("drag move must preview");
        assert_eq!(preview.anchor, p(10, 10));
        assert_eq!(preview.end, p(30, 40));
        assert!(out.committed.is_none());

        let (state, out) = state.handle(PointerEvent::Release(p(50, 50)), Tool::Rect, color);
        let committed = out.committed.expect("release must commit");
        assert_eq!(committed.anchor, p(10, 10));
        assert_eq!(committed.end, p(50, 50));
        assert!(out.preview.is_none());
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn bare_release_is_a_no_op() {
        let (state, out) =
            InteractionState::Idle.handle(PointerEvent::Release(p(5, 5)), Tool::Line, 0);
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(out, Outcome::default());
    }

    #[test]
    fn idle_move_is_ignored() {
        let (state, out) =
            InteractionState::Idle.handle(PointerEvent::Move(p(5, 5)), Tool::Line, 0);
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(out, Outcome::default());
    }

    #[test]
    fn tool_is_pinned_at_press_time() {
        let (state, _) = InteractionState::Idle.handle(PointerEvent::Press(p(0, 0)), Tool::Circle, 0);
        // Tool switched to Line mid-drag; the gesture stays a circle.
        let (_, out) = state.handle(PointerEvent::Release(p(9, 9)), Tool::Line, 0);
        assert_eq!(out.committed.unwrap().tool, Tool::Circle);
    }

    #[test]
    fn double_press_restarts_the_gesture() {
        let (state, _) = InteractionState::Idle.handle(PointerEvent::Press(p(1, 1)), Tool::Rect, 0);
        let (state, out) = state.handle(PointerEvent::Press(p(7, 7)), Tool::Rect, 0);
        assert_eq!(out, Outcome::default());
        let (_, out) = state.handle(PointerEvent::Release(p(8, 8)), Tool::Rect, 0);
        assert_eq!(out.committed.unwrap().anchor, p(7, 7));
    }
}
