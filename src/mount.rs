use crate::error::Result;
use crate::frame_loop::FrameLoop;
use crate::sample::Point;
use crate::surface::SurfaceSize;
use crate::viewport::{HostEvent, ListenerId, ListenerKind, Viewport, ViewportEvent};

/// What a host event means to the layer that owns these subscriptions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Routed {
    Pointer(Point),
    Resize(SurfaceSize),
    Frame,
}

/// Pointer and resize listeners plus the frame loop of one mounted layer.
#[derive(Debug)]
pub struct Subscriptions {
    pointer: ListenerId,
    resize: ListenerId,
    frames: FrameLoop,
}

impl Subscriptions {
    /// Registers both listeners and arms the first frame. Nothing stays
    /// registered if any step fails.
    pub fn attach(viewport: &mut dyn Viewport) -> Result<Self> {
        let pointer = viewport.add_listener(ListenerKind::PointerMove)?;
        let resize = match viewport.add_listener(ListenerKind::Resize) {
            Ok(id) => id,
            Err(e) => {
                viewport.remove_listener(pointer);
                return Err(e);
            }
        };
        let mut frames = FrameLoop::default();
        frames.start(viewport);
        Ok(Subscriptions {
            pointer,
            resize,
            frames,
        })
    }

    pub fn route(&mut self, event: &HostEvent) -> Option<Routed> {
        match *event {
            HostEvent::Deliver(delivery) => match delivery.event {
                ViewportEvent::PointerMoved(at) if delivery.listener == self.pointer => {
                    Some(Routed::Pointer(at))
                }
                ViewportEvent::Resized(size) if delivery.listener == self.resize => {
                    Some(Routed::Resize(size))
                }
                _ => None,
            },
            HostEvent::Frame(frame) => {
                if self.frames.accept(frame) {
                    Some(Routed::Frame)
                } else {
                    None
                }
            }
        }
    }

    pub fn rearm(&mut self, viewport: &mut dyn Viewport) {
        self.frames.rearm(viewport);
    }

    pub fn detach(&mut self, viewport: &mut dyn Viewport) {
        viewport.remove_listener(self.pointer);
        viewport.remove_listener(self.resize);
        self.frames.stop(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::testing::ScriptedViewport;

    #[test]
    fn routes_own_deliveries() {
        let mut viewport = ScriptedViewport::new(SurfaceSize::new(100, 100));
        let mut subscriptions = Subscriptions::attach(&mut viewport).unwrap();
        let mut other = Subscriptions::attach(&mut viewport).unwrap();

        let moved = viewport.move_pointer(4.0, 5.0);
        assert_eq!(moved.len(), 2);
        assert_eq!(
            subscriptions.route(&moved[0]),
            Some(Routed::Pointer(Point::new(4.0, 5.0)))
        );
        assert_eq!(subscriptions.route(&moved[1]), None);
        assert_eq!(
            other.route(&moved[1]),
            Some(Routed::Pointer(Point::new(4.0, 5.0)))
        );

        let resized = viewport.resize(20, 30);
        assert_eq!(
            subscriptions.route(&resized[0]),
            Some(Routed::Resize(SurfaceSize::new(20, 30)))
        );
    }

    #[test]
    fn frames_route_to_their_owner() {
        let mut viewport = ScriptedViewport::new(SurfaceSize::new(100, 100));
        let mut first = Subscriptions::attach(&mut viewport).unwrap();
        let mut second = Subscriptions::attach(&mut viewport).unwrap();
        let frames = viewport.next_frame();
        assert_eq!(frames.len(), 2);
        assert_eq!(first.route(&frames[0]), Some(Routed::Frame));
        assert_eq!(first.route(&frames[1]), None);
        assert_eq!(second.route(&frames[1]), Some(Routed::Frame));
    }

    #[test]
    fn failed_attach_leaves_nothing_registered() {
        let mut viewport = ScriptedViewport::new(SurfaceSize::new(100, 100)).without_listeners();
        assert!(Subscriptions::attach(&mut viewport).is_err());
        assert_eq!(viewport.listener_count(), 0);
        assert_eq!(viewport.pending_frames(), 0);
    }

    #[test]
    fn detach_clears_everything() {
        let mut viewport = ScriptedViewport::new(SurfaceSize::new(100, 100));
        let mut subscriptions = Subscriptions::attach(&mut viewport).unwrap();
        subscriptions.detach(&mut viewport);
        assert_eq!(viewport.listener_count(), 0);
        assert_eq!(viewport.pending_frames(), 0);
        subscriptions.rearm(&mut viewport);
        assert_eq!(viewport.pending_frames(), 0);
    }
}
