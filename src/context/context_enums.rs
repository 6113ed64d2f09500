#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    Winding,
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::Winding => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Measurements of a piece of text in user space, relative to the
/// baseline origin. `y_bearing` is negative for glyphs above the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
    pub x_advance: f32,
    pub y_advance: f32,
}

#[derive(Debug)]
pub enum ContextError {
    /// A relative path operation was used without a current point.
    NoCurrentPoint,
    /// `restore` was called without a matching `save`.
    InvalidRestore,
    /// A coordinate, radius or angle was NaN or infinite.
    NonFiniteValue,
    /// The transformation matrix cannot be inverted.
    InvalidMatrix,
    /// The crate was built without the `font` feature.
    FontSupportDisabled,
    #[cfg(feature = "font")]
    Font(crate::font::FontError),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::NoCurrentPoint => write!(f, "No current point"),
            ContextError::InvalidRestore => write!(f, "restore() without matching save()"),
            ContextError::NonFiniteValue => write!(f, "Non-finite value passed to context"),
            ContextError::InvalidMatrix => write!(f, "Transformation matrix is not invertible"),
            ContextError::FontSupportDisabled => {
                write!(f, "Text drawing requires the 'font' feature")
            }
            #[cfg(feature = "font")]
            ContextError::Font(e) => write!(f, "Font error: {}", e),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "font")]
            ContextError::Font(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "font")]
impl From<crate::font::FontError> for ContextError {
    fn from(e: crate::font::FontError) -> Self {
        ContextError::Font(e)
    }
}
