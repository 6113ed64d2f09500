use std::{cell::Cell, sync::Arc};

use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    window::{Window as WinitWindow, WindowAttributes, WindowId},
};

use crate::{
    context::Context,
    math::{Color, Point2},
    runner::{DrawOutcome, QuickDrawError},
};

pub const DEFAULT_TITLE: &str = "Quick Context";
pub const DEFAULT_SIZE: Point2 = Point2 { x: 400, y: 300 };

/// Configuration of the window opened by [QuickDraw::run].
#[derive(Clone, Debug, PartialEq)]
pub struct QuickDraw {
    title: String,
    size: Point2,
    pos: Option<Point2>,
    resizable: bool,
    background: Color,
}

impl QuickDraw {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            size: DEFAULT_SIZE,
            pos: None,
            resizable: true,
            background: Color::WHITE,
        }
    }

    /// Sets the title of the window.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the initial inner size of the window, in physical pixels.
    pub fn with_size(mut self, size: Point2) -> Self {
        self.size = size;
        self
    }

    /// Sets the initial position of the window on screen.
    pub fn with_position(mut self, pos: Point2) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Sets the color the surface is cleared to before every redraw.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color.clamped();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> Point2 {
        self.size
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Opens the window and calls `draw` every time it needs to be redrawn.
    ///
    /// Blocks the calling thread until the window is closed, either by the
    /// user or by [Window::close]. Returns the first error produced by the
    /// windowing system or by `draw`.
    pub fn run<F, R>(self, draw: F) -> Result<(), QuickDrawError>
    where
        F: FnMut(&Window, &mut Context<'_>) -> R,
        R: DrawOutcome,
    {
        crate::runner::run(self, draw)
    }

    pub(crate) fn window_attributes(&self) -> WindowAttributes {
        let size = if self.size.is_empty() {
            DEFAULT_SIZE
        } else {
            self.size
        };

        let mut attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_visible(true)
            .with_inner_size(PhysicalSize::<u32>::from(size))
            .with_resizable(self.resizable);

        if let Some(pos) = self.pos {
            attributes = attributes.with_position(PhysicalPosition::<i32>::from(pos));
        }

        attributes
    }
}

impl Default for QuickDraw {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

/// The window handed to draw callbacks.
pub struct Window {
    handle: Arc<WinitWindow>,
    close_requested: Cell<bool>,
}

impl Window {
    pub(crate) fn new(handle: Arc<WinitWindow>) -> Self {
        Self {
            handle,
            close_requested: Cell::new(false),
        }
    }

    pub fn id(&self) -> WindowId {
        self.handle.id()
    }

    pub fn title(&self) -> String {
        self.handle.title()
    }

    pub fn set_title(&self, title: &str) {
        self.handle.set_title(title);
    }

    /// Inner size of the window in physical pixels, which is also the size
    /// of the drawing surface.
    pub fn size(&self) -> Point2 {
        Point2::from(self.handle.inner_size())
    }

    pub fn scale_factor(&self) -> f64 {
        self.handle.scale_factor()
    }

    /// Asks for another call of the draw callback.
    pub fn request_redraw(&self) {
        self.handle.request_redraw();
    }

    /// Closes the window once the current draw callback returns.
    pub fn close(&self) {
        self.close_requested.set(true);
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested.get()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.handle.id())
            .field("close_requested", &self.close_requested.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{Position, Size};

    #[test]
    fn defaults() {
        let config = QuickDraw::default();

        assert_eq!(config.title(), "Quick Context");
        assert_eq!(config.size(), DEFAULT_SIZE);
        assert_eq!(config.background(), Color::WHITE);
    }

    #[test]
    fn builder_sets_attributes() {
        let attributes = QuickDraw::new("Shapes")
            .with_size(Point2::new(800, 600))
            .with_position(Point2::new(10, 20))
            .with_resizable(false)
            .window_attributes();

        assert_eq!(attributes.title, "Shapes");
        assert!(!attributes.resizable);
        assert_eq!(
            attributes.inner_size,
            Some(Size::Physical(PhysicalSize::new(800, 600)))
        );
        assert_eq!(
            attributes.position,
            Some(Position::Physical(PhysicalPosition::new(10, 20)))
        );
    }

    #[test]
    fn empty_size_falls_back_to_default() {
        let attributes = QuickDraw::default()
            .with_size(Point2::new(0, 100))
            .window_attributes();

        assert_eq!(
            attributes.inner_size,
            Some(Size::Physical(PhysicalSize::new(
                DEFAULT_SIZE.x as u32,
                DEFAULT_SIZE.y as u32
            )))
        );
    }

    #[test]
    fn background_is_clamped() {
        let config = QuickDraw::default().with_background(Color::rgb(0.0, 2.0, 0.5));
        assert_eq!(config.background(), Color::rgb(0.0, 1.0, 0.5));
    }
}
