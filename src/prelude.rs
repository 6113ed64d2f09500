pub use super::context::*;
pub use super::math::*;
pub use super::runner::{DrawOutcome, QuickDrawError, RunnerError};
pub use super::software::PixelBufferError;
pub use super::window::*;
pub use super::{quickdraw, run};

#[cfg(feature = "font")]
pub use super::font::{FontError, FontFace, FontManager, FontStyle};
