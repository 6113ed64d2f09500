//! Open a window and draw on it with a single callback.
//!
//! [quickdraw] creates a window, calls the draw callback whenever the window
//! needs to be redrawn, and blocks until the user closes it:
//!
//! ```no_run
//! use quickdraw::prelude::*;
//!
//! quickdraw::run("Hello", |_window: &Window, ctx: &mut Context| {
//!     ctx.set_source_rgb(0.0, 0.0, 1.0);
//!     ctx.set_font_size(20.0);
//!     ctx.move_to(20.0, 20.0);
//!     ctx.show_text("Hello, World!")
//! })
//! .expect("window failed");
//! ```
//!
//! Windowing is done by winit, presentation by softbuffer and rasterization
//! by tiny-skia. Text needs the `font` feature (enabled by default).

/// Cairo-style drawing context handed to draw callbacks
pub mod context;
/// Font discovery and glyph rasterization
#[cfg(feature = "font")]
pub mod font;
/// Mathematical utilities and types
pub mod math;
/// Predefined types and traits for easy access
pub mod prelude;
/// Event loop driving the window
pub mod runner;
/// Presentation of the drawing surface through softbuffer
pub mod software;
/// Utility functions and types for common tasks
pub mod utils;
/// Window configuration and the window handed to callbacks
pub mod window;

use context::Context;
use runner::{DrawOutcome, QuickDrawError};
use window::{QuickDraw, Window};

/// Creates a [QuickDraw] configuration for a window titled `title`.
///
/// Call [QuickDraw::run] on the result to open the window.
pub fn quickdraw(title: &str) -> QuickDraw {
    QuickDraw::new(title)
}

/// Opens a window with default settings and draws it with `draw` until it
/// is closed.
///
/// Shorthand for `quickdraw(title).run(draw)`.
pub fn run<F, R>(title: &str, draw: F) -> Result<(), QuickDrawError>
where
    F: FnMut(&Window, &mut Context<'_>) -> R,
    R: DrawOutcome,
{
    quickdraw(title).run(draw)
}
