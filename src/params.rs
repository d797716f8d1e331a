// User-tunable knobs. The input layer writes them (key presses acting as
// sliders), the pipeline reads one consistent snapshot
// per tick. Every field always holds a last-known-valid value: writes clamp
// to the declared range and unknown knobs are rejected outright.

use crate::canvas::Tool;
use crate::error::{Error, Result};

pub const BRIGHTNESS_RANGE: (i32, i32) = (-100, 100);
pub const CONTRAST_RANGE: (f32, f32) = (0.0, 3.0);
/// Blur needs an explicit ceiling so a single knob can't make a tick
/// arbitrarily slow.
pub const BLUR_MAX: u32 = 25;

/// The numeric knobs addressable by name from the control surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Knob {
    Brightness,
    Contrast,
    Blur,
}

impl Knob {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "brightness" => Some(Knob::Brightness),
            "contrast" => Some(Knob::Contrast),
            "blur" => Some(Knob::Blur),
            _ => None,
        }
    }
}

/// A snapshot of every knob, copied out of the store once per tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ParameterSet {
    /// Additive offset per channel, applied after contrast.
    pub brightness: i32,
    /// Multiplicative scale per channel; 1.0 = unchanged.
    pub contrast: f32,
    /// Requested blur kernel size; 0 disables the stage entirely.
    pub blur_radius: u32,
    /// Mirror horizontally (selfie view).
    pub mirror: bool,
    /// Collapse to luma before the remap.
    pub grayscale: bool,
    pub tool: Tool,
    pub color: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
            blur_radius: 0,
            mirror: true,
            grayscale: false,
            tool: Tool::Rect,
            color: 0x0000FF00, // default pen: green
        }
    }
}

/// Owns the live knob values. Single-writer: all mutation happens on the
/// tick thread between frames, so `get` never observes a half-applied set.
#[derive(Default)]
pub struct ParameterStore {
    current: ParameterSet,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A consistent snapshot, never a live reference.
    pub fn get(&self) -> ParameterSet {
        self.current
    }

    /// Set a numeric knob, clamping to its declared range.
    pub fn set(&mut self, knob: Knob, value: f64) {
        match knob {
            Knob::Brightness => {
                let (lo, hi) = BRIGHTNESS_RANGE;
                self.current.brightness = (value as i32).clamp(lo, hi);
            }
            Knob::Contrast => {
                let (lo, hi) = CONTRAST_RANGE;
                self.current.contrast = (value as f32).clamp(lo, hi);
            }
            Knob::Blur => {
                self.current.blur_radius = (value.max(0.0) as u32).min(BLUR_MAX);
            }
        }
    }

    /// Nudge a numeric knob by a delta (the keyboard control surface).
    pub fn adjust(&mut self, knob: Knob, delta: f64) {
        let base = match knob {
            Knob::Brightness => self.current.brightness as f64,
            Knob::Contrast => self.current.contrast as f64,
            Knob::Blur => self.current.blur_radius as f64,
        };
        self.set(knob, base + delta);
    }

    /// Named-knob entry point for external control surfaces. Unknown names
    /// are an error; the store keeps its previous values.
    pub fn set_named(&mut self, name: &str, value: f64) -> Result<()> {
        let knob = Knob::from_name(name)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown knob {name:?}")))?;
        self.set(knob, value);
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.current.tool = tool;
    }

    pub fn set_color(&mut self, color: u32) {
        self.current.color = color & 0x00FF_FFFF;
    }

    pub fn toggle_mirror(&mut self) {
        self.current.mirror = !self.current.mirror;
    }

    pub fn toggle_grayscale(&mut self) {
        self.current.grayscale = !self.current.grayscale;
    }
}
