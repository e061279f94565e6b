//! Geometry primitives shared by the layout solver, boxes and renderer
//!
//! All rectangles live in window units with a bottom-left origin: `y` grows
//! upwards, so the visual top row of a layout has the largest `y`.

/// Absolute rectangle in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Degenerate all-zero rectangle
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a rectangle; negative extents are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Inclusive containment test on all four edges
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Scale position and extent independently on each axis
    pub fn scaled(&self, width_ratio: f32, height_ratio: f32) -> Self {
        Self::new(
            self.x * width_ratio,
            self.y * height_ratio,
            self.width * width_ratio,
            self.height * height_ratio,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Position a sub-rectangle as a fraction of this one.
    ///
    /// `ratio` holds fractional x/y offsets and fractional width/height.
    pub fn fraction(&self, ratio: Rect) -> Rect {
        Rect::new(
            self.x + ratio.x * self.width,
            self.y + ratio.y * self.height,
            ratio.width * self.width,
            ratio.height * self.height,
        )
    }
}

/// Point in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Fraction of `value` between `min` and `max`; zero for an empty range
pub fn calculate_ratio(value: f32, min: f32, max: f32) -> f32 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Inverse of [`calculate_ratio`]
pub fn ratio_to_value(ratio: f32, min: f32, max: f32) -> f32 {
    min + ratio * (max - min)
}

pub fn distance_between_points(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn point_in_circle(point: Point, center: Point, radius: f32) -> bool {
    distance_between_points(point, center) <= radius
}

/// Clamp a coordinate into `[min, max]`
pub fn clamp_coordinate(coord: f32, min: f32, max: f32) -> f32 {
    if coord < min {
        min
    } else if coord > max {
        max
    } else {
        coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_clamps_negative_extent() {
        let rect = Rect::new(10.0, 10.0, -5.0, 20.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 20.0);
        assert!(rect.is_empty());
    }

    #[test]
    fn test_contains_point_is_edge_inclusive() {
        let rect = Rect::new(730.0, 560.0, 70.0, 40.0);
        assert!(rect.contains_point(750.0, 575.0));
        assert!(rect.contains_point(730.0, 560.0));
        assert!(rect.contains_point(800.0, 600.0));
        assert!(!rect.contains_point(729.9, 575.0));
        assert!(!rect.contains_point(750.0, 600.1));
    }

    #[test]
    fn test_scaled_doubles_everything() {
        let rect = Rect::new(5.0, 10.0, 20.0, 40.0).scaled(2.0, 2.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 80.0));
    }

    #[test]
    fn test_fraction_of_parent() {
        let parent = Rect::new(100.0, 0.0, 400.0, 200.0);
        let child = parent.fraction(Rect::new(0.5, 0.25, 0.5, 0.5));
        assert_eq!(child, Rect::new(300.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_ratio_helpers() {
        assert_eq!(calculate_ratio(5.0, 0.0, 10.0), 0.5);
        assert_eq!(calculate_ratio(5.0, 3.0, 3.0), 0.0);
        assert_eq!(ratio_to_value(0.25, 0.0, 8.0), 2.0);
    }

    #[test]
    fn test_circle_and_clamp() {
        let center = Point { x: 0.0, y: 0.0 };
        assert!(point_in_circle(Point { x: 3.0, y: 4.0 }, center, 5.0));
        assert!(!point_in_circle(Point { x: 3.0, y: 4.1 }, center, 5.0));
        assert_eq!(clamp_coordinate(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_coordinate(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp_coordinate(4.0, 0.0, 10.0), 4.0);
    }
}
