// Per-frame transform chain. Stage order is fixed: mirror, normalize (+
// optional grayscale), brightness/contrast remap, blur. Deterministic for a
// given frame + parameter snapshot; the blur scratch buffer is reused
// across ticks, so the output never aliases the input.

use crate::error::{Error, Result};
use crate::frame::{pack, unpack, Frame};
use crate::params::ParameterSet;

/// Promote the blur knob to an effective odd kernel size. 0 disables the
/// stage; even values bump to the next odd (4 and 5 both yield 5), because
/// a box window needs a center pixel.
pub fn effective_kernel(radius: u32) -> u32 {
    match radius {
        0 => 0,
        r if r % 2 == 1 => r,
        r => r + 1,
    }
}

pub struct ProcessingPipeline {
    blur_tmp: Vec<u32>, // horizontal-pass scratch, resized lazily
}

impl ProcessingPipeline {
    pub fn new() -> Self {
        Self { blur_tmp: Vec::new() }
    }

    /// Run the full chain. Rejects malformed frames with `BadFrame`; the
    /// driver skips the rest of that tick and keeps looping.
    pub fn process(&mut self, frame: &Frame, params: &ParameterSet) -> Result<Frame> {
        if !frame.is_well_formed() {
            return Err(Error::bad_frame(format!(
                "unusable frame: {}x{} with {} pixels",
                frame.width,
                frame.height,
                frame.pixels.len()
            )));
        }

        let mut work = frame.clone();

        // 1) Geometric mirror (selfie view).
        if params.mirror {
            mirror_horizontal(&mut work);
        }

        // 2) Normalize: strip any stray high byte, optionally collapse to
        //    luma so the remap below acts on a gray image.
        for px in &mut work.pixels {
            *px &= 0x00FF_FFFF;
        }
        if params.grayscale {
            grayscale(&mut work);
        }

        // 3) Brightness/contrast affine remap, clamped per channel.
        if params.contrast != 1.0 || params.brightness != 0 {
            remap(&mut work, params.contrast, params.brightness);
        }

        // 4) Blur. Kernel 0/1 is an identity; skip the passes entirely.
        let kernel = effective_kernel(params.blur_radius);
        if kernel > 1 {
            let half = ((kernel - 1) / 2) as usize;
            self.blur_tmp.resize(work.pixels.len(), 0);
            let mut out = vec![0u32; work.pixels.len()];
            box_blur(
                work.width,
                work.height,
                &work.pixels,
                &mut self.blur_tmp,
                &mut out,
                half,
            );
            work.pixels = out;
        }

        Ok(work)
    }
}

impl Default for ProcessingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn mirror_horizontal(frame: &mut Frame) {
    for row in frame.pixels.chunks_mut(frame.width) {
        row.reverse();
    }
}

fn grayscale(frame: &mut Frame) {
    for px in &mut frame.pixels {
        let (r, g, b) = unpack(*px);
        // Rec.601 luma, integer approximation.
        let y = ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8;
        *px = pack(y, y, y);
    }
}

fn remap(frame: &mut Frame, contrast: f32, brightness: i32) {
    for px in &mut frame.pixels {
        let (r, g, b) = unpack(*px);
        let scale = |v: u8| -> u8 {
            let out = (v as f32 * contrast).round() as i32 + brightness;
            out.clamp(0, 255) as u8
        };
        *px = pack(scale(r), scale(g), scale(b));
    }
}

/// Two-pass sliding-window box blur with edge extension. `half` is the
/// half-extent, so the averaging window is `2 * half + 1` wide everywhere.
fn box_blur(
    width: usize,
    height: usize,
    src: &[u32],
    tmp: &mut [u32],
    dst: &mut [u32],
    half: usize,
) {
    let w = width as i32;
    let h = height as i32;
    let r = half as i32;
    let win = (2 * r + 1) as u32;

    // Pass 1: horizontal, src -> tmp.
    for y in 0..h {
        let row = (y as usize) * width;

        // Prime the window: the edge pixel is extended r+1 times.
        let px0 = src[row];
        let (mut sr, mut sg, mut sb) = {
            let (r0, g0, b0) = unpack(px0);
            (
                r0 as u32 * (r as u32 + 1),
                g0 as u32 * (r as u32 + 1),
                b0 as u32 * (r as u32 + 1),
            )
        };
        for x in 1..=r {
            let (pr, pg, pb) = unpack(src[row + x.min(w - 1) as usize]);
            sr += pr as u32;
            sg += pg as u32;
            sb += pb as u32;
        }

        for x in 0..w {
            tmp[row + x as usize] =
                pack((sr / win) as u8, (sg / win) as u8, (sb / win) as u8);

            // Slide: drop the leftmost sample, add the next on the right.
            let left = (x - r).max(0) as usize;
            let right = (x + r + 1).min(w - 1) as usize;
            let (lr, lg, lb) = unpack(src[row + left]);
            let (rr, rg, rb) = unpack(src[row + right]);
            sr = sr + rr as u32 - lr as u32;
            sg = sg + rg as u32 - lg as u32;
            sb = sb + rb as u32 - lb as u32;
        }
    }

    // Pass 2: vertical, tmp -> dst.
    for x in 0..w {
        let col = x as usize;

        let (r0, g0, b0) = unpack(tmp[col]);
        let (mut sr, mut sg, mut sb) = (
            r0 as u32 * (r as u32 + 1),
            g0 as u32 * (r as u32 + 1),
            b0 as u32 * (r as u32 + 1),
        );
        for y in 1..=r {
            let (pr, pg, pb) = unpack(tmp[(y.min(h - 1) as usize) * width + col]);
            sr += pr as u32;
            sg += pg as u32;
            sb += pb as u32;
        }

        for y in 0..h {
            dst[(y as usize) * width + col] =
                pack((sr / win) as u8, (sg / win) as u8, (sb / win) as u8);

            let top = (y - r).max(0) as usize;
            let bottom = (y + r + 1).min(h - 1) as usize;
            let (tr, tg, tb) = unpack(tmp[top * width + col]);
            let (br, bg, bb) = unpack(tmp[bottom * width + col]);
            sr = sr + br as u32 - tr as u32;
            sg = sg + bg as u32 - tg as u32;
            sb = sb + bb as u32 - tb as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::pack;

    fn params() -> ParameterSet {
        ParameterSet { mirror: false, ..ParameterSet::default() }
    }

    fn uniform_frame(w: usize, h: usize, px: u32) -> Frame {
        Frame { width: w, height: h, pixels: vec![px; w * h] }
    }

    #[test]
    fn remap_clamps_instead_of_overflowing() {
        let mut pipe = ProcessingPipeline::new();
        let frame = uniform_frame(4, 4, pack(200, 200, 200));
        let mut p = params();
        p.contrast = 2.0;
        p.brightness = 50;
        let out = pipe.process(&frame, &p).unwrap();
        // 200 * 2.0 + 50 = 450 -> clamps to 255, not a wrapped value.
        assert!(out.pixels.iter().all(|&px| px == pack(255, 255, 255)));
    }

    #[test]
    fn remap_clamps_at_the_bottom_too() {
        let mut pipe = ProcessingPipeline::new();
        let frame = uniform_frame(2, 2, pack(10, 10, 10));
        let mut p = params();
        p.brightness = -100;
        let out = pipe.process(&frame, &p).unwrap();
        assert!(out.pixels.iter().all(|&px| px == 0));
    }

    #[test]
    fn blur_zero_is_a_strict_identity() {
        let mut pipe = ProcessingPipeline::new();
        let mut frame = Frame::new(8, 6);
        for (i, px) in frame.pixels.iter_mut().enumerate() {
            *px = pack((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8);
        }
        let out = pipe.process(&frame, &params()).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn even_radius_promotes_to_the_next_odd_kernel() {
        assert_eq!(effective_kernel(0), 0);
        assert_eq!(effective_kernel(1), 1);
        assert_eq!(effective_kernel(4), 5);
        assert_eq!(effective_kernel(5), 5);

        // Radii 4 and 5 must therefore produce identical output.
        let mut pipe = ProcessingPipeline::new();
        let mut frame = Frame::new(16, 12);
        for (i, px) in frame.pixels.iter_mut().enumerate() {
            *px = pack((i % 256) as u8, (i * 3 % 256) as u8, (i * 5 % 256) as u8);
        }
        let mut p4 = params();
        p4.blur_radius = 4;
        let mut p5 = params();
        p5.blur_radius = 5;
        let out4 = pipe.process(&frame, &p4).unwrap();
        let out5 = pipe.process(&frame, &p5).unwrap();
        assert_eq!(out4, out5);
    }

    #[test]
    fn blur_preserves_a_uniform_frame() {
        let mut pipe = ProcessingPipeline::new();
        let frame = uniform_frame(10, 10, pack(120, 60, 30));
        let mut p = params();
        p.blur_radius = 7;
        let out = pipe.process(&frame, &p).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn mirror_reverses_rows() {
        let mut pipe = ProcessingPipeline::new();
        let frame = Frame { width: 3, height: 1, pixels: vec![1, 2, 3] };
        let mut p = params();
        p.mirror = true;
        let out = pipe.process(&frame, &p).unwrap();
        assert_eq!(out.pixels, vec![3, 2, 1]);
    }

    #[test]
    fn grayscale_collapses_channels() {
        let mut pipe = ProcessingPipeline::new();
        let frame = uniform_frame(2, 2, pack(200, 100, 50));
        let mut p = params();
        p.grayscale = true;
        let out = pipe.process(&frame, &p).unwrap();
        let (r, g, b) = unpack(out.pixels[0]);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn zero_dimension_frame_is_a_bad_frame() {
        let mut pipe = ProcessingPipeline::new();
        let frame = Frame { width: 0, height: 0, pixels: Vec::new() };
        let err = pipe.process(&frame, &params()).unwrap_err();
        assert!(matches!(err, Error::BadFrame(_)));
    }

    #[test]
    fn output_never_aliases_the_input() {
        let mut pipe = ProcessingPipeline::new();
        let frame = uniform_frame(4, 4, pack(9, 9, 9));
        let out = pipe.process(&frame, &params()).unwrap();
        assert_ne!(out.pixels.as_ptr(), frame.pixels.as_ptr());
    }
}
