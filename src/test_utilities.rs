use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Point2, Point3};

pub const SEED: &[u8; 32] = b"deltriangulationbistellarflips01";

pub fn random_points_in_range(range: f64, num_points: usize, seed: &[u8; 32]) -> Vec<Point2> {
    let mut rng = StdRng::from_seed(*seed);
    let range = Uniform::new(-range, range);
    (0..num_points)
        .map(|_| Point2::new(range.sample(&mut rng), range.sample(&mut rng)))
        .collect()
}

pub fn random_points_in_range_3d(range: f64, num_points: usize, seed: &[u8; 32]) -> Vec<Point3> {
    let mut rng = StdRng::from_seed(*seed);
    let range = Uniform::new(-range, range);
    (0..num_points)
        .map(|_| {
            Point3::new(
                range.sample(&mut rng),
                range.sample(&mut rng),
                range.sample(&mut rng),
            )
        })
        .collect()
}
