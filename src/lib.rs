// Live-camera sketch pad: capture, tunable processing, rubber-band drawing,
// HUD, optional recording. The binary in main.rs wires the hardware-backed
// implementations into the driver; everything else is testable in-process.

pub mod camera;
pub mod canvas;
pub mod driver;
pub mod error;
pub mod fps;
pub mod frame;
pub mod interact;
pub mod overlay;
pub mod params;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod window;

pub use error::{Error, Result};
