//! Desktop host: an SDL window stands in for the page.
//!
//! Every layer draws into its own software RGBA surface. Once per refresh the
//! host fans out input, runs the frames that were requested, then composites
//! the layers in the order they were acquired over the page color.

use crate::config::DisplayConfig;
use crate::error::{OverlayError, Result};
use crate::frame_loop::{FrameId, FramePacer, FrameQueue};
use crate::sample::{Point, Rgba};
use crate::surface::{Glow, Surface, SurfaceSize};
use crate::viewport::{
    HostEvent, ListenerId, ListenerKind, ListenerRegistry, Overlay, Viewport, ViewportEvent,
};
use log::{debug, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{BlendMode, Canvas, TextureCreator};
use sdl2::surface::Surface as Pixels;
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::cell::RefCell;
use std::rc::Rc;

type LayerCanvas = Canvas<Pixels<'static>>;
type SharedLayer = Rc<RefCell<LayerCanvas>>;

fn to_color(rgba: Rgba) -> Color {
    Color::RGBA(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn to_pixel(v: f64) -> i16 {
    v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

fn new_layer(size: SurfaceSize) -> Result<LayerCanvas> {
    let pixels = Pixels::new(size.width.max(1), size.height.max(1), PixelFormatEnum::RGBA8888)
        .map_err(OverlayError::SurfaceUnavailable)?;
    let mut canvas = pixels
        .into_canvas()
        .map_err(OverlayError::SurfaceUnavailable)?;
    canvas.set_blend_mode(BlendMode::Blend);
    Ok(canvas)
}

/// A layer's view of its software surface. The host keeps the other handle
/// for compositing.
pub struct SdlSurface {
    layer: SharedLayer,
    size: SurfaceSize,
    glow: Option<Glow>,
}

impl SdlSurface {
    /// Approximates a blurred shadow with translucent rings fading outward.
    fn paint_glow(&self, canvas: &LayerCanvas, x: i16, y: i16, radius: f64, glow: Glow) {
        let rings = (glow.blur / 2.0).ceil().max(1.0) as i32;
        for ring in (1..=rings).rev() {
            let t = ring as f64 / rings as f64;
            let alpha = glow.color.a as f64 * 0.35 * (1.0 - t * t);
            let color = glow.color.with_alpha(alpha.round() as u8);
            let r = to_pixel(radius + glow.blur * t);
            if let Err(e) = canvas.filled_circle(x, y, r, to_color(color)) {
                debug!("glow ring failed: {}", e);
            }
        }
    }
}

impl Surface for SdlSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        *self.layer.borrow_mut() = new_layer(size)?;
        self.size = size;
        Ok(())
    }

    fn clear(&mut self) {
        let mut canvas = self.layer.borrow_mut();
        canvas.set_blend_mode(BlendMode::None);
        canvas.set_draw_color(Color::RGBA(0, 0, 0, 0));
        canvas.clear();
        canvas.set_blend_mode(BlendMode::Blend);
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow;
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba) {
        let canvas = self.layer.borrow();
        let (x, y) = (to_pixel(center.x), to_pixel(center.y));
        if let Some(glow) = self.glow {
            self.paint_glow(&canvas, x, y, radius, glow);
        }
        let r = to_pixel(radius).max(1);
        let drawn = canvas
            .filled_circle(x, y, r, to_color(fill))
            .and_then(|_| canvas.aa_circle(x, y, r, to_color(fill)));
        if let Err(e) = drawn {
            debug!("circle at {:?} failed: {}", center, e);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        let canvas = self.layer.borrow();
        let (x1, y1, x2, y2) = (
            to_pixel(from.x),
            to_pixel(from.y),
            to_pixel(to.x),
            to_pixel(to.y),
        );
        let drawn = if width <= 1.5 {
            canvas.aa_line(x1, y1, x2, y2, to_color(color))
        } else {
            let w = width.round().clamp(1.0, u8::MAX as f64) as u8;
            canvas.thick_line(x1, y1, x2, y2, w, to_color(color))
        };
        if let Err(e) = drawn {
            debug!("line {:?} -> {:?} failed: {}", from, to, e);
        }
    }
}

/// The SDL window seen as a viewport: listeners, frame requests and the layer
/// stack.
pub struct SdlViewport {
    size: SurfaceSize,
    registry: ListenerRegistry,
    frames: FrameQueue,
    layers: Vec<SharedLayer>,
}

impl SdlViewport {
    fn new(size: SurfaceSize) -> Self {
        SdlViewport {
            size,
            registry: ListenerRegistry::default(),
            frames: FrameQueue::default(),
            layers: Vec::new(),
        }
    }

    /// Drops layers whose owner released its surface.
    fn prune_layers(&mut self) {
        self.layers.retain(|layer| Rc::strong_count(layer) > 1);
    }
}

impl Viewport for SdlViewport {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn acquire_surface(&mut self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
        let layer = Rc::new(RefCell::new(new_layer(size)?));
        self.layers.push(Rc::clone(&layer));
        Ok(Box::new(SdlSurface {
            layer,
            size,
            glow: None,
        }))
    }

    fn add_listener(&mut self, kind: ListenerKind) -> Result<ListenerId> {
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

pub struct SdlHost {
    _sdl: sdl2::Sdl,
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    event_pump: EventPump,
    viewport: SdlViewport,
    page_color: Color,
    pacer: FramePacer,
}

impl SdlHost {
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        let sdl = sdl2::init().map_err(OverlayError::Platform)?;
        let video = sdl.video().map_err(OverlayError::Platform)?;
        let requested = config.size();
        let window = video
            .window(&config.title, requested.width, requested.height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| OverlayError::Platform(e.to_string()))?;
        let builder = window.into_canvas();
        let builder = if config.vsync {
            builder.present_vsync()
        } else {
            builder
        };
        let canvas = builder
            .build()
            .map_err(|e| OverlayError::Platform(e.to_string()))?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(OverlayError::Platform)?;
        let (width, height) = canvas.window().size();
        info!("Window {}x{} ready", width, height);

        Ok(SdlHost {
            _sdl: sdl,
            canvas,
            texture_creator,
            event_pump,
            viewport: SdlViewport::new(SurfaceSize::new(width, height)),
            page_color: to_color(config.page_color),
            pacer: FramePacer::default(),
        })
    }

    pub fn viewport_mut(&mut self) -> &mut SdlViewport {
        &mut self.viewport
    }

    /// Events for this refresh, or `None` once the window should close.
    fn poll(&mut self) -> Option<Vec<HostEvent>> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return None,
                Event::MouseMotion { x, y, .. } => {
                    let moved = ViewportEvent::PointerMoved(Point::new(x as f64, y as f64));
                    events.extend(self.viewport.registry.fan_out(moved));
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => {
                    let size = SurfaceSize::new(width.max(1) as u32, height.max(1) as u32);
                    debug!("Viewport resized to {:?}", size);
                    self.viewport.size = size;
                    events.extend(self.viewport.registry.fan_out(ViewportEvent::Resized(size)));
                }
                _ => {}
            }
        }
        events.extend(self.viewport.frames.drain().into_iter().map(HostEvent::Frame));
        Some(events)
    }

    fn present(&mut self) -> Result<()> {
        self.viewport.prune_layers();
        self.canvas.set_draw_color(self.page_color);
        self.canvas.clear();
        for layer in self.viewport.layers.iter() {
            let layer = layer.borrow();
            let mut texture = self
                .texture_creator
                .create_texture_from_surface(layer.surface())
                .map_err(|e| OverlayError::Platform(e.to_string()))?;
            texture.set_blend_mode(BlendMode::Blend);
            self.canvas
                .copy(&texture, None, None)
                .map_err(OverlayError::Platform)?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Drives the overlays until the window closes.
    pub fn run(&mut self, overlays: &mut [Box<dyn Overlay>]) -> Result<()> {
        while let Some(events) = self.poll() {
            for event in events.iter() {
                for overlay in overlays.iter_mut() {
                    overlay.handle(event, &mut self.viewport);
                }
            }
            self.present()?;
            self.pacer.wait();
        }
        info!("Window closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::ParticleBackground;
    use crate::config::{BackgroundConfig, TrailConfig};
    use crate::trail::TrailAnimator;

    fn layer_widths(viewport: &SdlViewport) -> Vec<u32> {
        viewport
            .layers
            .iter()
            .map(|layer| layer.borrow().surface().width())
            .collect()
    }

    #[test]
    fn released_surfaces_leave_the_stack() {
        let mut viewport = SdlViewport::new(SurfaceSize::new(64, 48));
        let first = viewport.acquire_surface(SurfaceSize::new(64, 48)).unwrap();
        let second = viewport.acquire_surface(SurfaceSize::new(32, 16)).unwrap();
        assert_eq!(layer_widths(&viewport), vec![64, 32]);

        drop(first);
        viewport.prune_layers();
        assert_eq!(viewport.layers.len(), 1);
        assert_eq!(layer_widths(&viewport), vec![32]);

        drop(second);
        viewport.prune_layers();
        assert!(viewport.layers.is_empty());
    }

    #[test]
    fn every_overlay_owns_one_layer() {
        let mut viewport = SdlViewport::new(SurfaceSize::new(64, 48));
        let mut background = ParticleBackground::mount(&mut viewport, BackgroundConfig::default());
        let mut trail = TrailAnimator::mount(&mut viewport, TrailConfig::default());
        assert!(background.is_running() && trail.is_running());
        assert_eq!(viewport.layers.len(), 2);

        background.unmount(&mut viewport);
        viewport.prune_layers();
        assert_eq!(viewport.layers.len(), 1);

        trail.unmount(&mut viewport);
        viewport.prune_layers();
        assert!(viewport.layers.is_empty());
        assert!(viewport.registry.is_empty());
        assert!(viewport.frames.is_empty());
    }

    #[test]
    fn unmounted_trail_layer_is_pruned() {
        let mut viewport = SdlViewport::new(SurfaceSize::new(64, 48));
        let mut trail = TrailAnimator::mount(&mut viewport, TrailConfig::default());
        viewport.prune_layers();
        assert_eq!(viewport.layers.len(), 1);

        trail.unmount(&mut viewport);
        viewport.prune_layers();
        assert!(viewport.layers.is_empty());
    }
}
