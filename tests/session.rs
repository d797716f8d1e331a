// End-to-end session: a scripted three-frame source whose middle frame is
// malformed. The loop must present frames 1 and 3, skip frame 2, and stop
// cleanly at end-of-stream with every resource released exactly once.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use sketchcam::driver::{FrameLoopDriver, LoopState};
use sketchcam::frame::{pack, Frame, Point};
use sketchcam::source::{Acquired, FrameSource};
use sketchcam::window::{InputEvent, Presenter};
use sketchcam::Result;

struct ThreeFrameSource {
    script: VecDeque<Frame>,
    open_balance: Rc<Cell<i32>>,
}

impl ThreeFrameSource {
    fn new(open_balance: Rc<Cell<i32>>) -> Self {
        open_balance.set(open_balance.get() + 1); // "acquired"
        let good = |v: u8| Frame { width: 32, height: 24, pixels: vec![pack(v, v, v); 32 * 24] };
        let malformed = Frame { width: 0, height: 0, pixels: Vec::new() };
        Self { script: VecDeque::from([good(10), malformed, good(30)]), open_balance }
    }
}

impl FrameSource for ThreeFrameSource {
    fn read(&mut self) -> Result<Acquired> {
        Ok(match self.script.pop_front() {
            Some(frame) => Acquired::Frame(frame),
            None => Acquired::EndOfStream,
        })
    }

    fn close(&mut self) {
        self.open_balance.set(self.open_balance.get() - 1);
    }
}

struct CollectingPresenter {
    presented: Rc<RefCell<Vec<Frame>>>,
    open_balance: Rc<Cell<i32>>,
}

impl CollectingPresenter {
    fn new(presented: Rc<RefCell<Vec<Frame>>>, open_balance: Rc<Cell<i32>>) -> Self {
        open_balance.set(open_balance.get() + 1);
        Self { presented, open_balance }
    }
}

impl Presenter for CollectingPresenter {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.presented.borrow_mut().push(frame.clone());
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }

    fn pointer_pos(&self) -> Option<Point> {
        None
    }

    fn close(&mut self) {
        self.open_balance.set(self.open_balance.get() - 1);
    }
}

#[test]
fn malformed_middle_frame_is_skipped_and_session_ends_cleanly() {
    let open_balance = Rc::new(Cell::new(0));
    let presented = Rc::new(RefCell::new(Vec::new()));

    let source = ThreeFrameSource::new(open_balance.clone());
    let presenter = CollectingPresenter::new(presented.clone(), open_balance.clone());
    assert_eq!(open_balance.get(), 2, "two resources acquired");

    let mut driver = FrameLoopDriver::new(source, presenter, None);
    driver.run().expect("session must absorb the bad frame");
    assert_eq!(driver.state(), LoopState::Stopped);

    // Frames 1 and 3 made it to the screen; frame 2 did not.
    let presented = presented.borrow();
    assert_eq!(presented.len(), 2);
    // The default pipeline mirrors, which is invisible on uniform frames,
    // so the source pixel values survive where the HUD didn't draw.
    let bottom_right = |f: &Frame| f.pixels[f.width * f.height - 1];
    assert_eq!(bottom_right(&presented[0]), pack(10, 10, 10));
    assert_eq!(bottom_right(&presented[1]), pack(30, 30, 30));

    drop(driver);
    assert_eq!(open_balance.get(), 0, "acquisitions and releases must balance");
}
