use crate::viewport::Viewport;
use log::debug;
use std::time::{Duration, Instant};

const FRAME_TIME_CAP: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Pending per-frame callbacks, one display refresh at a time.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameId>,
}

impl FrameQueue {
    pub fn request(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.push(id);
        id
    }

    pub fn cancel(&mut self, id: FrameId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != id);
        self.pending.len() != before
    }

    /// Frames due this refresh. Requests made afterwards wait for the next one.
    pub fn drain(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Self re-arming run loop: at most one frame armed at a time, none after
/// `stop`.
#[derive(Debug, Default)]
pub struct FrameLoop {
    armed: Option<FrameId>,
    running: bool,
}

impl FrameLoop {
    pub fn start(&mut self, viewport: &mut dyn Viewport) {
        if self.running {
            return;
        }
        self.running = true;
        self.armed = Some(viewport.request_frame());
    }

    pub fn stop(&mut self, viewport: &mut dyn Viewport) {
        self.running = false;
        if let Some(id) = self.armed.take() {
            viewport.cancel_frame(id);
        }
    }

    /// Consumes `frame` if it is the one currently armed.
    pub fn accept(&mut self, frame: FrameId) -> bool {
        if self.running && self.armed == Some(frame) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn rearm(&mut self, viewport: &mut dyn Viewport) {
        if !self.running || self.armed.is_some() {
            return;
        }
        self.armed = Some(viewport.request_frame());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn armed(&self) -> Option<FrameId> {
        self.armed
    }
}

/// Caps the host loop at roughly 60 refreshes a second.
pub struct FramePacer {
    last_frame: Instant,
    cap: Duration,
}

impl Default for FramePacer {
    fn default() -> Self {
        FramePacer {
            last_frame: Instant::now(),
            cap: FRAME_TIME_CAP,
        }
    }
}

impl FramePacer {
    pub fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        debug!("Frame time: {:?}", elapsed);
        if let Some(remaining) = self.cap.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }
        self.last_frame = Instant::now();
    }
}
