//! Particle-link background: slowly drifting dots joined by faint lines when
//! they come close, plus lines grabbing toward the pointer.

pub mod grid;
pub mod particles;

use crate::config::BackgroundConfig;
use crate::error::Result;
use crate::mount::{Routed, Subscriptions};
use crate::sample::Point;
use crate::surface::{Graphics, SurfaceSize};
use crate::viewport::{HostEvent, Overlay, Viewport};
use grid::SpatialGrid;
use legion::{system, world::SubWorld, IntoQuery, Resources, Schedule, World};
use log::{info, warn};
use particles::{FieldBounds, Particle};

/// Pointer position once the pointer has moved over the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hover(pub Option<Point>);

#[system(par_for_each)]
pub fn drift_particles(particle: &mut Particle, #[resource] bounds: &FieldBounds) {
    particle.advance(bounds.0);
}

#[system]
#[read_component(Particle)]
pub fn render_particles(
    world: &mut SubWorld,
    #[resource] hover: &Hover,
    #[resource] style: &BackgroundConfig,
    #[resource] grid: &mut SpatialGrid,
    #[resource] graphics: &mut Graphics,
) {
    let surface = &mut graphics.surface;
    let particles: Vec<Particle> = <&Particle>::query().iter(world).copied().collect();
    let positions: Vec<Point> = particles.iter().map(|p| p.position).collect();
    grid.rebuild(&positions);
    surface.clear();

    for (i, j, distance) in grid.pairs_within(&positions, style.link_distance) {
        let opacity = style.link_opacity * (1.0 - distance / style.link_distance);
        surface.stroke_line(
            positions[i],
            positions[j],
            style.link_width,
            style.color.with_opacity(opacity),
        );
    }

    if let Hover(Some(pointer)) = *hover {
        for (index, distance) in grid.near(&positions, pointer, style.grab_distance) {
            let opacity = style.grab_opacity * (1.0 - distance / style.grab_distance);
            surface.stroke_line(
                pointer,
                positions[index],
                style.link_width,
                style.color.with_opacity(opacity),
            );
        }
    }

    let fill = style.color.with_opacity(style.particle_opacity);
    for particle in particles.iter() {
        surface.fill_circle(particle.position, particle.radius, fill);
    }
}

struct Running {
    world: World,
    resources: Resources,
    schedule: Schedule,
    subscriptions: Subscriptions,
}

impl Running {
    fn start(viewport: &mut dyn Viewport, config: &BackgroundConfig) -> Result<Self> {
        config.validate()?;
        let size = viewport.size();
        let surface = viewport.acquire_surface(size)?;

        let mut world = World::default();
        world.extend(particles::generate(config, size));

        let mut resources = Resources::default();
        resources.insert(FieldBounds(size));
        resources.insert(SpatialGrid::new(config.link_distance));
        resources.insert(Hover::default());
        resources.insert(*config);
        resources.insert(Graphics { surface });

        let schedule = Schedule::builder()
            .add_system(drift_particles_system())
            .add_thread_local(render_particles_system())
            .build();

        let subscriptions = Subscriptions::attach(viewport)?;
        Ok(Running {
            world,
            resources,
            schedule,
            subscriptions,
        })
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.resources.insert(FieldBounds(size));
        for particle in <&mut Particle>::query().iter_mut(&mut self.world) {
            particle.wrap_into(size);
        }
        if let Some(mut graphics) = self.resources.get_mut::<Graphics>() {
            if let Err(e) = graphics.surface.resize(size) {
                warn!("Background surface resize to {:?} failed: {}", size, e);
            }
        }
    }
}

pub struct ParticleBackground {
    state: Option<Running>,
}

impl ParticleBackground {
    pub fn mount(viewport: &mut dyn Viewport, config: BackgroundConfig) -> Self {
        match Running::start(viewport, &config) {
            Ok(running) => {
                info!("Background mounted with {} particles", running.world.len());
                ParticleBackground {
                    state: Some(running),
                }
            }
            Err(e) => {
                warn!("Background disabled: {}", e);
                ParticleBackground { state: None }
            }
        }
    }

    /// Current particles, empty while inert.
    pub fn particles(&self) -> Vec<Particle> {
        match self.state.as_ref() {
            Some(running) => <&Particle>::query().iter(&running.world).copied().collect(),
            None => Vec::new(),
        }
    }

    pub fn hover(&self) -> Option<Point> {
        let running = self.state.as_ref()?;
        let hover = running.resources.get::<Hover>()?;
        hover.0
    }
}

impl Overlay for ParticleBackground {
    fn handle(&mut self, event: &HostEvent, viewport: &mut dyn Viewport) {
        let running = match self.state.as_mut() {
            Some(running) => running,
            None => return,
        };
        match running.subscriptions.route(event) {
            Some(Routed::Pointer(at)) => {
                if let Some(mut hover) = running.resources.get_mut::<Hover>() {
                    if at.x.is_finite() && at.y.is_finite() {
                        hover.0 = Some(at);
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
            info!("Background unmounted");
        }
    }

    fn is_running(&self) -> bool {
        self.state.is_some()
    }
}
