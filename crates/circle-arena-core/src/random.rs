//! Random placement and coloring of new shapes.

use kurbo::{Point, Rect};
use peniko::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of positions and colors for newly created shapes.
pub trait Generator {
    /// Any point inside `rect`, edges inclusive.
    fn random_point_in(&mut self, rect: Rect) -> Point;

    /// An opaque color.
    fn random_color(&mut self) -> Color;
}

/// `rand`-backed generator.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: StdRng,
}

impl RandomGenerator {
    /// Generator seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded when `seed` is set, from the OS otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn random_point_in(&mut self, rect: Rect) -> Point {
        let rect = rect.abs();
        let x = self.rng.random_range(rect.x0..=rect.x1);
        let y = self.rng.random_range(rect.y0..=rect.y1);
        Point::new(x, y)
    }

    fn random_color(&mut self) -> Color {
        let [r, g, b]: [u8; 3] = self.rng.random();
        Color::from_rgba8(r, g, b, u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;

    #[test]
    fn test_points_stay_in_rect() {
        let mut generator = RandomGenerator::seeded(7);
        let rect = Rect::new(0.0, 0.0, 722.0, 324.0);
        for _ in 0..500 {
            let p = generator.random_point_in(rect);
            assert!(p.x >= 0.0 && p.x <= 722.0);
            assert!(p.y >= 0.0 && p.y <= 324.0);
        }
    }

    #[test]
    fn test_degenerate_rect() {
        let mut generator = RandomGenerator::seeded(7);
        let p = generator.random_point_in(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomGenerator::seeded(42);
        let mut b = RandomGenerator::seeded(42);
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.random_point_in(rect), b.random_point_in(rect));
        assert_eq!(
            SerializableColor::from(a.random_color()),
            SerializableColor::from(b.random_color())
        );
    }

    #[test]
    fn test_colors_are_opaque() {
        let mut generator = RandomGenerator::seeded(3);
        for _ in 0..20 {
            assert_eq!(generator.random_color().to_rgba8().a, 255);
        }
    }
}
