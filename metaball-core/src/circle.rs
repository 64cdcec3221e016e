use glam::Vec2;
use rand::Rng;

/// A moving disk on the `[-1, 1]` torus.
///
/// `r` scales the circle's influence on the field and its repulsion
/// strength; it is always positive.
#[derive(Clone, Copy, Debug)]
pub struct Circle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub r: f32,
}

impl Circle {
    pub fn new(pos: Vec2, vel: Vec2, r: f32) -> Self {
        Self { pos, vel, r }
    }
}

/// An ordered set of circles. Order is irrelevant to the physics but
/// stays stable within a frame, so frame output is deterministic.
#[derive(Clone, Debug)]
pub struct CircleSet {
    pub circles: Vec<Circle>,
}

impl CircleSet {
    pub fn from_circles(circles: Vec<Circle>) -> Self {
        Self { circles }
    }

    /// The canonical four-circle arrangement used as the default scene.
    pub fn default_set() -> Self {
        Self::from_circles(vec![
            Circle::new(Vec2::new(0.5, 0.2), Vec2::new(0.00002, 0.00006), 0.29),
            Circle::new(Vec2::new(-0.2, 0.1), Vec2::new(-0.00005, 0.00008), 0.35),
            Circle::new(Vec2::new(-0.2, -0.4), Vec2::new(-0.00002, -0.0001), 0.25),
            Circle::new(Vec2::new(0.0, 0.0), Vec2::new(-0.0002, 0.0001), 0.22),
        ])
    }

    /// Spawns `count` circles with random position, radius and velocity.
    pub fn random_in_domain(count: usize, rng: &mut impl Rng) -> Self {
        let circles = (0..count)
            .map(|_| {
                let pos = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0));
                let vel = Vec2::new(
                    rng.random_range(-0.0002..=0.0002),
                    rng.random_range(-0.0002..=0.0002),
                );
                let r = rng.random_range(0.15..=0.4);
                Circle::new(pos, vel, r)
            })
            .collect();

        Self::from_circles(circles)
    }
}
