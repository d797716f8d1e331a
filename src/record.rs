// Optional recording sink for presented frames. The driver just writes to
// it; it never owns the loop. The file flavor saves numbered PNGs, one per
// presented frame.

use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};
use crate::frame::{unpack, Frame};

pub trait RecordSink {
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close. Called exactly once during shutdown.
    fn finish(&mut self) -> Result<()>;
}

/// Writes `frame_000001.png`, `frame_000002.png`, ... into a directory.
pub struct PngSequenceRecorder {
    dir: PathBuf,
    written: u64,
    rgb_scratch: Vec<u8>,
}

impl PngSequenceRecorder {
    pub fn create(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Record(format!("create {}: {e}", dir.display())))?;
        info!(dir = %dir.display(), "recording sink ready");
        Ok(Self { dir, written: 0, rgb_scratch: Vec::new() })
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

impl RecordSink for PngSequenceRecorder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        self.rgb_scratch.clear();
        self.rgb_scratch.reserve(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            let (r, g, b) = unpack(px);
            self.rgb_scratch.extend_from_slice(&[r, g, b]);
        }

        self.written += 1;
        let path = self.dir.join(format!("frame_{:06}.png", self.written));
        image::save_buffer(
            &path,
            &self.rgb_scratch,
            frame.width as u32,
            frame.height as u32,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| Error::Record(format!("write {}: {e}", path.display())))
    }

    fn finish(&mut self) -> Result<()> {
        info!(frames = self.written, "recording finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::pack;

    #[test]
    fn writes_numbered_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = PngSequenceRecorder::create(dir.path().join("rec")).unwrap();
        let frame = Frame { width: 3, height: 2, pixels: vec![pack(1, 2, 3); 6] };
        rec.write(&frame).unwrap();
        rec.write(&frame).unwrap();
        rec.finish().unwrap();

        assert_eq!(rec.frames_written(), 2);
        assert!(dir.path().join("rec/frame_000001.png").exists());
        assert!(dir.path().join("rec/frame_000002.png").exists());
    }
}
