use crate::config::BackgroundConfig;
use crate::sample::Point;
use crate::surface::SurfaceSize;
use nalgebra::Vector2;
use rand::Rng;
use rand_pcg::Pcg64;

const STREAM: u128 = 0xa02bdbf7bb3c0a7ac28fa16a64abf96;

/// Area the particles drift in. Shared by every particle entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBounds(pub SurfaceSize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Pixels per frame.
    pub velocity: Vector2<f64>,
    pub radius: f64,
}

impl Particle {
    /// Moves one frame. A particle that fully leaves an edge comes back in
    /// through the opposite one.
    pub fn advance(&mut self, bounds: SurfaceSize) {
        self.position += self.velocity;
        let (width, height) = (bounds.width as f64, bounds.height as f64);
        let r = self.radius;
        if self.position.x < -r {
            self.position.x = width + r;
        } else if self.position.x > width + r {
            self.position.x = -r;
        }
        if self.position.y < -r {
            self.position.y = height + r;
        } else if self.position.y > height + r {
            self.position.y = -r;
        }
    }

    /// Folds the position into new bounds after a resize.
    pub fn wrap_into(&mut self, bounds: SurfaceSize) {
        let width = (bounds.width as f64).max(1.0);
        let height = (bounds.height as f64).max(1.0);
        self.position.x = self.position.x.rem_euclid(width);
        self.position.y = self.position.y.rem_euclid(height);
    }
}

/// Seeded particles for `bounds`, ready to be pushed into a world.
pub fn generate(config: &BackgroundConfig, bounds: SurfaceSize) -> Vec<(Particle,)> {
    let mut rng = Pcg64::new(config.seed, STREAM);
    let count = config.particle_count_for(bounds);
    let width = (bounds.width as f64).max(1.0);
    let height = (bounds.height as f64).max(1.0);

    let mut particles = Vec::with_capacity(count);
    while particles.len() < count {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let particle = Particle {
            position: Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
            velocity: Vector2::new(config.speed * angle.cos(), config.speed * angle.sin()),
            radius: rng.gen_range(config.min_radius..=config.max_radius),
        };
        particles.push((particle,));
    }
    particles
}
