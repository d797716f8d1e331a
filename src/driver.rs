// The frame loop: acquire, snapshot knobs, process, overlay, present,
// record, then drain input events. One tick at a time, one thread, until
// the source ends or the user quits. Shutdown releases the recorder, the
// window, then the source — reverse acquisition order — exactly once, on
// every exit path.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::fps::FpsMeter;
use crate::interact::{InteractionState, PointerEvent};
use crate::overlay::OverlayRenderer;
use crate::params::ParameterStore;
use crate::pipeline::ProcessingPipeline;
use crate::record::RecordSink;
use crate::source::{Acquired, FrameSource};
use crate::window::{InputEvent, Presenter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct FrameLoopDriver<S: FrameSource, P: Presenter> {
    source: S,
    presenter: P,
    recorder: Option<Box<dyn RecordSink>>,

    store: ParameterStore,
    pipeline: ProcessingPipeline,
    overlay: OverlayRenderer,
    canvas: Canvas,
    interaction: InteractionState,
    fps: FpsMeter,

    preview: Option<crate::canvas::Shape>,
    recording: bool,
    state: LoopState,
    released: bool,
}

impl<S: FrameSource, P: Presenter> FrameLoopDriver<S, P> {
    pub fn new(source: S, presenter: P, recorder: Option<Box<dyn RecordSink>>) -> Self {
        Self {
            source,
            presenter,
            recorder,
            store: ParameterStore::new(),
            pipeline: ProcessingPipeline::new(),
            overlay: OverlayRenderer::new(),
            canvas: Canvas::new(),
            interaction: InteractionState::Idle,
            fps: FpsMeter::new(),
            preview: None,
            recording: false,
            state: LoopState::Running,
            released: false,
        }
    }

    /// Run ticks until stopped, then release resources. The release runs
    /// on the error path too, before the error propagates.
    pub fn run(&mut self) -> Result<()> {
        let result = self.run_loop();
        self.release();
        result
    }

    fn run_loop(&mut self) -> Result<()> {
        while self.state == LoopState::Running {
            self.tick()?;
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        // 1) Acquire. End-of-stream is a clean stop; a transient read error
        //    skips the tick; a device error aborts the session.
        let frame = match self.source.read() {
            Ok(Acquired::Frame(f)) => f,
            Ok(Acquired::EndOfStream) => {
                info!("end of stream");
                self.state = LoopState::Stopped;
                return Ok(());
            }
            Err(e) if e.is_transient() => {
                warn!("skipping tick: {e}");
                return Ok(());
            }
            Err(e) => {
                self.state = LoopState::Stopped;
                return Err(e);
            }
        };

        // 2) One consistent knob snapshot for the whole tick.
        let params = self.store.get();

        // 3) Transform chain. A bad frame skips the rest of this tick but
        //    never stops the loop.
        let mut processed = match self.pipeline.process(&frame, &params) {
            Ok(f) => f,
            Err(e) => {
                warn!("skipping tick: {e}");
                return Ok(());
            }
        };

        // 4) HUD on top of the processed frame.
        let fps = self.fps.tick(Instant::now());
        let mut labels = vec![format!(
            "{} | TOOL: {}",
            if self.recording { "REC" } else { "LIVE" },
            params.tool.label()
        )];
        if params.blur_radius > 0 {
            labels.push(format!("BLUR: {}", params.blur_radius));
        }
        self.overlay.render(
            &mut processed,
            &self.canvas,
            self.preview,
            self.presenter.pointer_pos(),
            fps,
            &labels,
        );

        // 5) Present, and hand the same composited frame to the sink when
        //    recording. A sink failure stops the recording, not the show.
        self.presenter.present(&processed)?;
        if self.recording {
            if let Some(recorder) = self.recorder.as_mut() {
                if let Err(e) = recorder.write(&processed) {
                    warn!("recording stopped: {e}");
                    self.recording = false;
                }
            }
        }

        // 6) Drain input. Events mutate the store / canvas / interaction
        //    state here and nowhere else, so the next tick's snapshot sees
        //    them applied whole.
        for event in self.presenter.poll_events() {
            self.dispatch(event);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer(pe) => self.dispatch_pointer(pe),
            InputEvent::Quit => {
                info!("quit requested");
                self.state = LoopState::Stopped;
            }
            InputEvent::ClearCanvas => {
                debug!("canvas cleared");
                self.canvas.clear();
                // Interaction state is untouched: an in-flight drag may
                // still commit onto the now-empty canvas.
            }
            InputEvent::ToggleMirror => self.store.toggle_mirror(),
            InputEvent::ToggleGrayscale => self.store.toggle_grayscale(),
            InputEvent::ToggleRecording => {
                if self.recorder.is_some() {
                    self.recording = !self.recording;
                    info!(on = self.recording, "recording toggled");
                } else {
                    warn!("no recording sink configured");
                }
            }
            InputEvent::SelectTool(tool) => self.store.set_tool(tool),
            InputEvent::Adjust(knob, delta) => self.store.adjust(knob, delta),
        }
    }

    fn dispatch_pointer(&mut self, event: PointerEvent) {
        let params = self.store.get();
        let (next, outcome) = self.interaction.handle(event, params.tool, params.color);
        self.interaction = next;
        self.preview = outcome.preview;
        if let Some(shape) = outcome.committed {
            debug!(tool = ?shape.tool, "shape committed");
            self.canvas.commit(shape);
        }
    }

    /// Release everything exactly once, in reverse acquisition order:
    /// recorder, window, capture device.
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.finish() {
                warn!("recorder finish: {e}");
            }
        }
        self.presenter.close();
        self.source.close();
        info!("session resources released");
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn params(&self) -> crate::params::ParameterSet {
        self.store.get()
    }
}

impl<S: FrameSource, P: Presenter> Drop for FrameLoopDriver<S, P> {
    fn drop(&mut self) {
        self.release();
    }
}
