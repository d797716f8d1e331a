// Frame acquisition seam. The driver only ever sees this trait, so a live
// camera, a directory of still frames, or a scripted test source all look
// the same. End-of-stream is a value, not an error; a decode hiccup is a
// transient BadFrame, a dead device is DeviceUnavailable.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::frame::{pack, Frame};

/// One acquisition attempt's outcome.
pub enum Acquired {
    Frame(Frame),
    EndOfStream,
}

pub trait FrameSource {
    /// Block (at most one frame interval) for the next frame.
    fn read(&mut self) -> Result<Acquired>;

    /// Release the underlying device/handles. Called exactly once by the
    /// driver during shutdown.
    fn close(&mut self);
}

/// A directory of still images played back in sorted filename order — the
/// "file" flavor of a frame source, treated uniformly with a live device.
#[derive(Debug)]
pub struct ImageSequenceSource {
    files: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| Error::device(format!("open {}: {e}", dir.display())))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|x| x.to_str()).map(|x| x.to_ascii_lowercase()),
                    Some(ref ext) if ["png", "jpg", "jpeg", "bmp"].contains(&ext.as_str())
                )
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(Error::device(format!("no image frames in {}", dir.display())));
        }
        info!(frames = files.len(), dir = %dir.display(), "image sequence opened");
        Ok(Self { files, next: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> Result<Acquired> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(Acquired::EndOfStream);
        };
        self.next += 1;

        // A single unreadable file is a transient glitch, not the end of
        // the sequence.
        let img = image::open(path)
            .map_err(|e| Error::bad_frame(format!("decode {}: {e}", path.display())))?
            .to_rgb8();

        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for px in img.pixels() {
            pixels.push(pack(px[0], px[1], px[2]));
        }
        Ok(Acquired::Frame(Frame { width: w as usize, height: h as usize, pixels }))
    }

    fn close(&mut self) {
        self.files.clear();
    }
}
