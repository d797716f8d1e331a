// Wiring: parse the CLI, install logging, open the source and window, and
// hand everything to the frame loop.
//
// Controls: drag LMB to rubber-band a shape, 1/2/3 pick line/rect/circle,
// C clears the canvas, M mirrors, G grayscales, -/= brightness,
// [/] contrast, ,/. blur, R toggles recording, Q/ESC quits.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sketchcam::camera::CameraCapture;
use sketchcam::driver::FrameLoopDriver;
use sketchcam::record::{PngSequenceRecorder, RecordSink};
use sketchcam::source::{FrameSource, ImageSequenceSource};
use sketchcam::window::MiniFbWindow;

#[derive(Parser, Debug)]
#[command(name = "sketchcam", about = "Live-camera sketch pad with a tunable pipeline")]
struct Args {
    /// Camera index to capture from.
    #[arg(long, default_value_t = 0, conflicts_with = "frames")]
    device: u32,

    /// Play a directory of image frames instead of a live camera.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Requested capture width (the device may pick the closest match).
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Directory to record presented frames into (toggle with R).
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> sketchcam::Result<()> {
    let recorder: Option<Box<dyn RecordSink>> = match args.record {
        Some(dir) => Some(Box::new(PngSequenceRecorder::create(dir)?)),
        None => None,
    };

    match args.frames {
        Some(dir) => {
            let source = ImageSequenceSource::open(&dir)?;
            run_with(source, args.width as usize, args.height as usize, recorder)
        }
        None => {
            let source = CameraCapture::open(args.device, args.width, args.height)?;
            let (w, h) = source.resolution();
            run_with(source, w as usize, h as usize, recorder)
        }
    }
}

fn run_with<S: FrameSource>(
    source: S,
    width: usize,
    height: usize,
    recorder: Option<Box<dyn RecordSink>>,
) -> sketchcam::Result<()> {
    let window = MiniFbWindow::new("sketchcam", width, height)?;
    FrameLoopDriver::new(source, window, recorder).run()
}
