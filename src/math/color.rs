/// RGBA color with straight (non-premultiplied) components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Returns the color with every component clamped to `0.0..=1.0`.
    ///
    /// NaN components become `0.0`.
    pub fn clamped(&self) -> Self {
        fn clamp(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }

        Self {
            r: clamp(self.r),
            g: clamp(self.g),
            b: clamp(self.b),
            a: clamp(self.a),
        }
    }

    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    pub const BLACK: Color = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const BLUE: Color = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const CORNFLOWERBLUE: Color = Self::new(0.392, 0.584, 0.929, 1.0);
    pub const CYAN: Color = Self::new(0.0, 1.0, 1.0, 1.0);
    pub const DARKGRAY: Color = Self::new(0.663, 0.663, 0.663, 1.0);
    pub const GRAY: Color = Self::new(0.502, 0.502, 0.502, 1.0);
    pub const GREEN: Color = Self::new(0.0, 0.502, 0.0, 1.0);
    pub const LIGHTGRAY: Color = Self::new(0.827, 0.827, 0.827, 1.0);
    pub const MAGENTA: Color = Self::new(1.0, 0.0, 1.0, 1.0);
    pub const ORANGE: Color = Self::new(1.0, 0.647, 0.0, 1.0);
    pub const RED: Color = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const YELLOW: Color = Self::new(1.0, 1.0, 0.0, 1.0);
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b && self.a == other.a
    }
}

impl From<Color> for tiny_skia::Color {
    fn from(color: Color) -> Self {
        let c = color.clamped();

        // Components are clamped, so this never hits the fallback.
        tiny_skia::Color::from_rgba(c.r, c.g, c.b, c.a).unwrap_or(tiny_skia::Color::BLACK)
    }
}

impl From<(f32, f32, f32)> for Color {
    fn from(tuple: (f32, f32, f32)) -> Self {
        Self::rgb(tuple.0, tuple.1, tuple.2)
    }
}

impl From<(f32, f32, f32, f32)> for Color {
    fn from(tuple: (f32, f32, f32, f32)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2, tuple.3)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn clamps_out_of_range_components() {
        // Callers coming from cairo habitually pass 0..255 values.
        let c = Color::rgb(0.0, 0.0, 255.0).clamped();
        assert_eq!(c, Color::BLUE);

        let c = Color::new(-1.0, f32::NAN, 0.5, 2.0).clamped();
        assert_eq!(c, Color::new(0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn to_bytes_rounds() {
        assert_eq!(Color::new(0.5, 1.0, 0.0, 1.0).to_bytes(), [128, 255, 0, 255]);
        assert_eq!(Color::from_rgba(10, 20, 30, 40).to_bytes(), [10, 20, 30, 40]);
    }

    #[test]
    fn converts_to_tiny_skia() {
        let c: tiny_skia::Color = Color::rgb(2.0, 0.25, -3.0).into();
        assert_eq!(c.red(), 1.0);
        assert_eq!(c.green(), 0.25);
        assert_eq!(c.blue(), 0.0);
        assert_eq!(c.alpha(), 1.0);
    }
}
