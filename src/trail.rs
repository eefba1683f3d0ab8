//! Pointer-following trail.
//!
//! A fixed chain of dots eases toward the pointer every frame: the head closes
//! a quarter of its distance to the pointer, every following dot a quarter of
//! its distance to the dot ahead of it. The whole chain is repainted on every
//! frame.

use crate::chain::{glow_blur_for, radius_for, Chain};
use crate::config::TrailConfig;
use crate::error::Result;
use crate::mount::{Routed, Subscriptions};
use crate::sample::Point;
use crate::surface::{Glow, Graphics, SurfaceSize};
use crate::viewport::{HostEvent, Overlay, Viewport};
use legion::{system, Resources, Schedule, World};
use log::{debug, info, warn};

/// Latest pointer position reported by the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Point,
}

impl PointerState {
    /// Non-finite positions are dropped so the chain stays finite.
    pub fn update(&mut self, to: Point) -> bool {
        if !(to.x.is_finite() && to.y.is_finite()) {
            return false;
        }
        self.position = to;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Easing {
    pub factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailStyle {
    pub trail_length: usize,
    pub fill_alpha: u8,
}

#[system]
pub fn ease_chain(
    #[resource] chain: &mut Chain,
    #[resource] pointer: &PointerState,
    #[resource] easing: &Easing,
) {
    chain.step(pointer.position, easing.factor);
}

#[system]
pub fn render_trail(
    #[resource] chain: &Chain,
    #[resource] style: &TrailStyle,
    #[resource] graphics: &mut Graphics,
) {
    let surface = &mut graphics.surface;
    surface.clear();
    for (index, sample) in chain.samples().iter().enumerate() {
        let color = sample.color();
        let blur = glow_blur_for(index, style.trail_length);
        if blur > 0.0 {
            surface.set_glow(Some(Glow { color, blur }));
        }
        surface.fill_circle(
            sample.position,
            radius_for(index, style.trail_length),
            color.with_alpha(style.fill_alpha),
        );
        surface.set_glow(None);
    }
}

struct Running {
    world: World,
    resources: Resources,
    schedule: Schedule,
    subscriptions: Subscriptions,
}

impl Running {
    fn start(viewport: &mut dyn Viewport, config: &TrailConfig) -> Result<Self> {
        config.validate()?;
        let size = viewport.size();
        let surface = viewport.acquire_surface(size)?;
        let pointer = PointerState {
            position: size.center(),
        };

        let mut chain = Chain::default();
        chain.seed_if_empty(config.sample_count(), pointer.position, &config.palette);

        let mut resources = Resources::default();
        resources.insert(chain);
        resources.insert(pointer);
        resources.insert(Easing {
            factor: config.easing,
        });
        resources.insert(TrailStyle {
            trail_length: config.trail_length,
            fill_alpha: config.fill_alpha,
        });
        resources.insert(Graphics { surface });

        let schedule = Schedule::builder()
            .add_system(ease_chain_system())
            .add_thread_local(render_trail_system())
            .build();

        let subscriptions = Subscriptions::attach(viewport)?;
        Ok(Running {
            world: World::default(),
            resources,
            schedule,
            subscriptions,
        })
    }

    fn resize(&mut self, size: SurfaceSize) {
        if let Some(mut graphics) = self.resources.get_mut::<Graphics>() {
            if let Err(e) = graphics.surface.resize(size) {
                warn!("Trail surface resize to {:?} failed: {}", size, e);
            }
        }
    }
}

pub struct TrailAnimator {
    state: Option<Running>,
}

impl TrailAnimator {
    /// Mounts the trail. Any failure leaves an inert animator that draws
    /// nothing.
    pub fn mount(viewport: &mut dyn Viewport, config: TrailConfig) -> Self {
        match Running::start(viewport, &config) {
            Ok(running) => {
                info!(
                    "Trail mounted with {} samples on {:?}",
                    config.sample_count(),
                    viewport.size()
                );
                TrailAnimator {
                    state: Some(running),
                }
            }
            Err(e) => {
                warn!("Trail disabled: {}", e);
                TrailAnimator { state: None }
            }
        }
    }

    pub fn with_chain<R>(&self, f: impl FnOnce(&Chain) -> R) -> Option<R> {
        let running = self.state.as_ref()?;
        let chain = running.resources.get::<Chain>()?;
        Some(f(&chain))
    }

    pub fn pointer(&self) -> Option<Point> {
        let running = self.state.as_ref()?;
        let pointer = running.resources.get::<PointerState>()?;
        Some(pointer.position)
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        let running = self.state.as_ref()?;
        let graphics = running.resources.get::<Graphics>()?;
        Some(graphics.surface.size())
    }
}

impl Overlay for TrailAnimator {
    fn handle(&mut self, event: &HostEvent, viewport: &mut dyn Viewport) {
        let running = match self.state.as_mut() {
            Some(running) => running,
            None => return,
        };
        match running.subscriptions.route(event) {
            Some(Routed::Pointer(at)) => {
                if let Some(mut pointer) = running.resources.get_mut::<PointerState>() {
                    if !pointer.update(at) {
                        debug!("Ignoring pointer at {:?}", at);
                    }
                }
            }
            Some(Routed::Resize(size)) => running.resize(size),
            Some(Routed::Frame) => {
                running
                    .schedule
                    .execute(&mut running.world, &mut running.resources);
                running.subscriptions.rearm(viewport);
            }
            None => {}
        }
    }

    fn unmount(&mut self, viewport: &mut dyn Viewport) {
        if let Some(mut running) = self.state.take() {
            running.subscriptions.detach(viewport);
            info!("Trail unmounted");
        }
    }

    fn is_running(&self) -> bool {
        self.state.is_some()
    }
}
