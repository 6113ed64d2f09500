use num_traits::ToPrimitive;
use winit::dpi::{PhysicalPosition, PhysicalSize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub fn new<T: ToPrimitive>(x: T, y: T) -> Self {
        Self {
            x: x.to_i32().unwrap_or(0),
            y: y.to_i32().unwrap_or(0),
        }
    }

    /// True when either axis is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.x <= 0 || self.y <= 0
    }

    pub const ZERO: Self = Self { x: 0, y: 0 };
    pub const ONE: Self = Self { x: 1, y: 1 };
}

impl Default for Point2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<PhysicalSize<u32>> for Point2 {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Point2> for PhysicalSize<u32> {
    fn from(point: Point2) -> Self {
        PhysicalSize::new(point.x.max(0) as u32, point.y.max(0) as u32)
    }
}

impl From<Point2> for PhysicalPosition<i32> {
    fn from(point: Point2) -> Self {
        PhysicalPosition::new(point.x, point.y)
    }
}

impl From<(i32, i32)> for Point2 {
    fn from(tuple: (i32, i32)) -> Self {
        Self {
            x: tuple.0,
            y: tuple.1,
        }
    }
}

impl From<(u32, u32)> for Point2 {
    fn from(tuple: (u32, u32)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

#[cfg(test)]
mod tests {
    use super::Point2;
    use winit::dpi::PhysicalSize;

    #[test]
    fn out_of_range_values_fall_back_to_zero() {
        assert_eq!(Point2::new(u32::MAX, 5), Point2 { x: 0, y: 5 });
        assert_eq!(Point2::new(f32::NAN, 3.9), Point2 { x: 0, y: 3 });
    }

    #[test]
    fn physical_size_round_trips() {
        let p = Point2::from(PhysicalSize::new(640u32, 480u32));
        assert_eq!(p, Point2::new(640, 480));

        let s: PhysicalSize<u32> = Point2::new(-4, 10).into();
        assert_eq!(s, PhysicalSize::new(0, 10));
    }

    #[test]
    fn empty_sizes() {
        assert!(Point2::ZERO.is_empty());
        assert!(Point2::new(10, 0).is_empty());
        assert!(!Point2::ONE.is_empty());
    }
}
