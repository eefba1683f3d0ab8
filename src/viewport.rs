use crate::error::Result;
use crate::frame_loop::FrameId;
use crate::sample::Point;
use crate::surface::{Surface, SurfaceSize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    PointerMoved(Point),
    Resized(SurfaceSize),
}

impl ViewportEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            ViewportEvent::PointerMoved(_) => ListenerKind::PointerMove,
            ViewportEvent::Resized(_) => ListenerKind::Resize,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A viewport event addressed to one listener.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delivery {
    pub listener: ListenerId,
    pub event: ViewportEvent,
}

/// Everything the host loop hands to mounted overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    Deliver(Delivery),
    Frame(FrameId),
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, ListenerKind)>,
}

impl ListenerRegistry {
    pub fn add(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, kind));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(listener, _)| *listener == id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// One delivery per listener registered for the event's kind, in
    /// registration order.
    pub fn fan_out(&self, event: ViewportEvent) -> Vec<HostEvent> {
        let kind = event.kind();
        self.listeners
            .iter()
            .filter(|(_, listening)| *listening == kind)
            .map(|(listener, _)| {
                HostEvent::Deliver(Delivery {
                    listener: *listener,
                    event,
                })
            })
            .collect()
    }
}

/// Host environment an overlay mounts into.
pub trait Viewport {
    fn size(&self) -> SurfaceSize;

    fn acquire_surface(&mut self, size: SurfaceSize) -> Result<Box<dyn Surface>>;

    fn add_listener(&mut self, kind: ListenerKind) -> Result<ListenerId>;

    fn remove_listener(&mut self, id: ListenerId);

    /// Schedules one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameId;

    fn cancel_frame(&mut self, id: FrameId);
}

/// A decorative layer mounted behind the page content. It only observes
/// deliveries and never consumes input.
pub trait Overlay {
    fn handle(&mut self, event: &HostEvent, viewport: &mut dyn Viewport);

    /// Removes every listener and cancels the armed frame.
    fn unmount(&mut self, viewport: &mut dyn Viewport);

    fn is_running(&self) -> bool;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::OverlayError;
    use crate::frame_loop::FrameQueue;
    use crate::surface::recording::{DrawLog, RecordingSurface};

    /// In-memory viewport driven step by step from tests.
    pub struct ScriptedViewport {
        size: SurfaceSize,
        registry: ListenerRegistry,
        frames: FrameQueue,
        log: DrawLog,
        surface_ready: bool,
        listeners_ready: bool,
    }

    impl ScriptedViewport {
        pub fn new(size: SurfaceSize) -> Self {
            ScriptedViewport {
                size,
                registry: ListenerRegistry::default(),
                frames: FrameQueue::default(),
                log: DrawLog::default(),
                surface_ready: true,
                listeners_ready: true,
            }
        }

        pub fn without_surface(mut self) -> Self {
            self.surface_ready = false;
            self
        }

        pub fn without_listeners(mut self) -> Self {
            self.listeners_ready = false;
            self
        }

        pub fn log(&self) -> &DrawLog {
            &self.log
        }

        pub fn listener_count(&self) -> usize {
            self.registry.len()
        }

        pub fn pending_frames(&self) -> usize {
            self.frames.len()
        }

        pub fn move_pointer(&mut self, x: f64, y: f64) -> Vec<HostEvent> {
            self.registry
                .fan_out(ViewportEvent::PointerMoved(Point::new(x, y)))
        }

        pub fn resize(&mut self, width: u32, height: u32) -> Vec<HostEvent> {
            self.size = SurfaceSize::new(width, height);
            self.registry.fan_out(ViewportEvent::Resized(self.size))
        }

        pub fn next_frame(&mut self) -> Vec<HostEvent> {
            self.frames.drain().into_iter().map(HostEvent::Frame).collect()
        }
    }

    impl Viewport for ScriptedViewport {
        fn size(&self) -> SurfaceSize {
            self.size
        }

        fn acquire_surface(&mut self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
            if !self.surface_ready {
                return Err(OverlayError::SurfaceUnavailable(
                    "no drawing context".to_string(),
                ));
            }
            Ok(Box::new(RecordingSurface::new(size, self.log.clone())))
        }

        fn add_listener(&mut self, kind: ListenerKind) -> Result<ListenerId> {
            if !self.listeners_ready {
                return Err(OverlayError::ListenerRegistration(format!("{:?}", kind)));
            }
            Ok(self.registry.add(kind))
        }

        fn remove_listener(&mut self, id: ListenerId) {
            self.registry.remove(id);
        }

        fn request_frame(&mut self) -> FrameId {
            self.frames.request()
        }

        fn cancel_frame(&mut self, id: FrameId) {
            self.frames.cancel(id);
        }
    }

    pub fn dispatch(
        overlay: &mut dyn Overlay,
        viewport: &mut ScriptedViewport,
        events: Vec<HostEvent>,
    ) {
        for event in events.iter() {
            overlay.handle(event, viewport);
        }
    }
}
