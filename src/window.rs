// Presentation seam plus the minifb implementation. minifb exposes polled
// key/mouse state, not callbacks; `poll_events` edge-detects that state and
// turns it into the typed events the driver dispatches, so the loop stays
// single-writer over parameters and interaction state.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::canvas::Tool;
use crate::error::{Error, Result};
use crate::frame::{Frame, Point};
use crate::interact::PointerEvent;
use crate::params::Knob;

/// Everything the input layer can ask of the loop, one tick's worth at a
/// time. Keyboard knob nudges play the role sliders would in a widget UI.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Quit,
    ClearCanvas,
    ToggleMirror,
    ToggleGrayscale,
    ToggleRecording,
    SelectTool(Tool),
    Adjust(Knob, f64),
}

pub trait Presenter {
    /// Push the composited frame to the screen.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Drain the input events that arrived since the last poll.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Where the pointer currently is, for the crosshair.
    fn pointer_pos(&self) -> Option<Point>;

    /// Tear down the window. Called exactly once during shutdown.
    fn close(&mut self) {}
}

pub struct MiniFbWindow {
    window: Window,
    mouse_was_down: bool,
    last_mouse_pos: Option<Point>,
}

impl MiniFbWindow {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, mouse_was_down: false, last_mouse_pos: None })
    }

    fn mouse_point(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| Point::new(x.max(0.0) as i32, y.max(0.0) as i32))
    }
}

impl Presenter for MiniFbWindow {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
        {
            events.push(InputEvent::Quit);
        }

        if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
            events.push(InputEvent::ClearCanvas);
        }
        if self.window.is_key_pressed(Key::M, KeyRepeat::No) {
            events.push(InputEvent::ToggleMirror);
        }
        if self.window.is_key_pressed(Key::G, KeyRepeat::No) {
            events.push(InputEvent::ToggleGrayscale);
        }
        if self.window.is_key_pressed(Key::R, KeyRepeat::No) {
            events.push(InputEvent::ToggleRecording);
        }

        if self.window.is_key_pressed(Key::Key1, KeyRepeat::No) {
            events.push(InputEvent::SelectTool(Tool::Line));
        }
        if self.window.is_key_pressed(Key::Key2, KeyRepeat::No) {
            events.push(InputEvent::SelectTool(Tool::Rect));
        }
        if self.window.is_key_pressed(Key::Key3, KeyRepeat::No) {
            events.push(InputEvent::SelectTool(Tool::Circle));
        }

        // Knob nudges; the store clamps, so holding a key is safe.
        for (key, knob, delta) in [
            (Key::Minus, Knob::Brightness, -5.0),
            (Key::Equal, Knob::Brightness, 5.0),
            (Key::LeftBracket, Knob::Contrast, -0.1),
            (Key::RightBracket, Knob::Contrast, 0.1),
            (Key::Comma, Knob::Blur, -1.0),
            (Key::Period, Knob::Blur, 1.0),
        ] {
            if self.window.is_key_pressed(key, KeyRepeat::Yes) {
                events.push(InputEvent::Adjust(knob, delta));
            }
        }

        // Edge-detect the left button into press/move/release events.
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self.mouse_point();
        match (self.mouse_was_down, down, pos) {
            (false, true, Some(p)) => events.push(InputEvent::Pointer(PointerEvent::Press(p))),
            (true, true, Some(p)) => {
                if self.last_mouse_pos != Some(p) {
                    events.push(InputEvent::Pointer(PointerEvent::Move(p)));
                }
            }
            (true, false, Some(p)) => events.push(InputEvent::Pointer(PointerEvent::Release(p))),
            _ => {}
        }
        self.mouse_was_down = down;
        self.last_mouse_pos = pos;

        events
    }

    fn pointer_pos(&self) -> Option<Point> {
        self.mouse_point()
    }

    fn close(&mut self) {
        tracing::info!("window closed");
    }
}
