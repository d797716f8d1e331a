// Core pixel types shared by every stage of the loop.

/// One video frame: a rectangular grid of pixels, each packed 0x00RRGGBB
/// (the layout minifb pushes straight to the screen).
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // length = width * height
}

impl Frame {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// True when the dimensions are sane and match the pixel count.
    /// A frame that fails this is a transient glitch, not a usable image.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0 && self.height > 0 && self.pixels.len() == self.width * self.height
    }
}

/// Unpack a 0x00RRGGBB pixel into its channels.
#[inline]
pub fn unpack(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Pack channels back into a 0x00RRGGBB pixel.
#[inline]
pub fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// A pixel position in window coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
