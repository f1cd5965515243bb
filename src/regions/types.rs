use serde::Serialize;
use std::f64::consts::PI;

/// Axis-aligned pixel rectangle enclosing a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A connected patch of changed pixels, described by its outer border.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Pixels enclosed by the outer border, interior holes included.
    pub area: u32,
    /// Length of the closed outer border polyline.
    pub perimeter: f64,
    pub bounds: Bounds,
}

impl Region {
    pub fn new(area: u32, perimeter: f64, bounds: Bounds) -> Self {
        Self {
            area,
            perimeter,
            bounds,
        }
    }

    /// 4πA/P²: 1.0 for a disc, smaller for elongated or ragged shapes.
    pub fn circularity(&self) -> f64 {
        if self.perimeter > 0.0 {
            4.0 * PI * self.area as f64 / (self.perimeter * self.perimeter)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn circularity_of_ideal_disc_is_one() {
        let r = 30.0_f64;
        let region = Region::new((PI * r * r).round() as u32, 2.0 * PI * r, bounds());
        assert!((region.circularity() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn zero_perimeter_means_zero_circularity() {
        assert_eq!(Region::new(1, 0.0, bounds()).circularity(), 0.0);
    }
}
