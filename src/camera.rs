// Live webcam source backed by nokhwa. Frames come back as packed
// 0x00RRGGBB buffers ready for the pipeline and, eventually, minifb.

use nokhwa::{
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
    Camera,
};
use tracing::info;

use crate::error::{Error, Result};
use crate::frame::{pack, Frame};
use crate::source::{Acquired, FrameSource};

/// A small wrapper around nokhwa::Camera so the driver stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution; the device may
    /// pick a close-but-different format, so the actual one is reported by
    /// `resolution()` afterwards.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::device(format!("create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::device(format!("open stream: {e}")))?;

        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), "camera stream open");
        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// The resolution the device actually delivers.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSource for CameraCapture {
    fn read(&mut self) -> Result<Acquired> {
        // Blocks until the next frame is ready (one frame interval at most).
        // A fetch failure means the device went away; a decode failure is a
        // mangled frame we can skip.
        let raw = self
            .cam
            .frame()
            .map_err(|e| Error::device(format!("fetch frame: {e}")))?;

        let rgb = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::bad_frame(format!("decode rgb: {e}")))?;

        let (w, h) = rgb.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for px in rgb.pixels() {
            pixels.push(pack(px[0], px[1], px[2]));
        }
        Ok(Acquired::Frame(Frame { width: w as usize, height: h as usize, pixels }))
    }

    fn close(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            tracing::warn!("stop stream: {e}");
        }
        info!("camera stream closed");
    }
}
