use crate::sample::Point;
use fnv::FnvHashMap;

/// Uniform bucket grid for neighbour queries over a point set.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    buckets: FnvHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        SpatialGrid {
            cell_size,
            buckets: FnvHashMap::default(),
        }
    }

    fn cell_of(&self, point: Point) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    fn reach(&self, distance: f64) -> i32 {
        (distance / self.cell_size).ceil() as i32
    }

    pub fn rebuild(&mut self, points: &[Point]) {
        // Keep allocations across frames.
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (index, point) in points.iter().enumerate() {
            let cell = self.cell_of(*point);
            self.buckets.entry(cell).or_default().push(index);
        }
    }

    /// Every pair `(i, j, distance)` with `i < j` closer than `distance`.
    pub fn pairs_within(&self, points: &[Point], distance: f64) -> Vec<(usize, usize, f64)> {
        let reach = self.reach(distance);
        let mut pairs = Vec::new();
        for (i, point) in points.iter().enumerate() {
            let (cx, cy) = self.cell_of(*point);
            for dx in -reach..=reach {
                for dy in -reach..=reach {
                    let bucket = match self.buckets.get(&(cx + dx, cy + dy)) {
                        Some(bucket) => bucket,
                        None => continue,
                    };
                    for &j in bucket.iter().filter(|&&j| j > i) {
                        let d = (points[j] - *point).norm();
                        if d < distance {
                            pairs.push((i, j, d));
                        }
                    }
                }
            }
        }
        pairs
    }

    /// Points closer than `distance` to `at`, with their distance.
    pub fn near(&self, points: &[Point], at: Point, distance: f64) -> Vec<(usize, f64)> {
        let reach = self.reach(distance);
        let (cx, cy) = self.cell_of(at);
        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if let Some(bucket) = self.buckets.get(&(cx + dx, cy + dy)) {
                    for &index in bucket.iter() {
                        let d = (points[index] - at).norm();
                        if d < distance {
                            found.push((index, d));
                        }
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_pcg::Pcg64;

    fn scattered(count: usize) -> Vec<Point> {
        let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
        (0..count)
            .map(|_| Point::new(rng.gen_range(-20.0..820.0), rng.gen_range(-20.0..620.0)))
            .collect()
    }

    #[test]
    fn pairs_match_brute_force() {
        let points = scattered(120);
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&points);

        let mut found: Vec<_> = grid
            .pairs_within(&points, 150.0)
            .into_iter()
            .map(|(i, j, _)| (i, j))
            .collect();
        found.sort_unstable();

        let mut expected = Vec::new();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                if (points[j] - points[i]).norm() < 150.0 {
                    expected.push((i, j));
                }
            }
        }
        assert_eq!(found, expected);
    }

    #[test]
    fn near_matches_brute_force() {
        let points = scattered(80);
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&points);
        let at = Point::new(400.0, 300.0);

        let mut found: Vec<_> = grid
            .near(&points, at, 140.0)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        found.sort_unstable();
        let expected: Vec<_> = (0..points.len())
            .filter(|&i| (points[i] - at).norm() < 140.0)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn rebuild_forgets_old_points() {
        let mut grid = SpatialGrid::new(10.0);
        grid.rebuild(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        grid.rebuild(&[Point::new(500.0, 500.0)]);
        assert!(grid
            .near(&[Point::new(500.0, 500.0)], Point::new(1.0, 1.0), 5.0)
            .is_empty());
    }
}
