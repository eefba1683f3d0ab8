use crate::sample::{color_for, Point, Rgba, Sample};

const BASE_RADIUS: f64 = 7.0;
const RADIUS_STEP: f64 = 0.3;
const BASE_GLOW: f64 = 12.0;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

pub fn ease_toward(from: Point, to: Point, t: f64) -> Point {
    Point::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
}

/// Dot radius; shrinks along each group of `trail_length` samples.
pub fn radius_for(index: usize, trail_length: usize) -> f64 {
    BASE_RADIUS - (index % trail_length) as f64 * RADIUS_STEP
}

/// Glow blur for a dot. Groups longer than the base glow fade to no glow
/// instead of going negative.
pub fn glow_blur_for(index: usize, trail_length: usize) -> f64 {
    (BASE_GLOW - (index % trail_length) as f64).max(0.0)
}

/// Fixed-length chain of samples. Index 0 is the head.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chain {
    samples: Vec<Sample>,
}

impl Chain {
    pub fn seeded(len: usize, at: Point, palette: &[Rgba]) -> Self {
        let samples = (0..len)
            .map(|index| Sample::new(at, color_for(index, palette)))
            .collect();
        Chain { samples }
    }

    /// Returns true if the chain was empty and got populated.
    pub fn seed_if_empty(&mut self, len: usize, at: Point, palette: &[Rgba]) -> bool {
        if !self.samples.is_empty() {
            return false;
        }
        *self = Chain::seeded(len, at, palette);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// One forward pass: the head eases toward `target`, every other sample
    /// toward its predecessor's already-updated position.
    pub fn step(&mut self, target: Point, alpha: f64) {
        let mut leader = target;
        for sample in self.samples.iter_mut() {
            sample.position = ease_toward(sample.position, leader, alpha);
            leader = sample.position;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .all(|s| s.position.x.is_finite() && s.position.y.is_finite())
    }
}
