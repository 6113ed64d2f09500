//! Immediate-mode 2D drawing context handed to draw callbacks.
//!
//! The API follows the familiar cairo model: build a path with `move_to`,
//! `line_to`, `arc`... then `fill` or `stroke` it with the current source
//! color. Rasterization is done by tiny-skia on the window's pixmap.
//!
//! Path coordinates are converted to device space when they are added, so
//! changing the transformation matrix in the middle of a path only affects
//! the points added afterwards.

use tiny_skia::{Paint, PixmapMut, Rect, Stroke, Transform};

use crate::math::{Color, Vector2};

#[cfg(feature = "font")]
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, PremultipliedColorU8};

#[cfg(feature = "font")]
use crate::font::{FontFace, FontManager, FontStyle};

mod context_enums;
mod path;

pub use context_enums::*;

use path::{PathData, arc_to_cubics, normalize_negative_sweep, normalize_positive_sweep};

#[derive(Clone, Debug)]
struct GraphicsState {
    source: Color,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f32,
    fill_rule: FillRule,
    transform: Transform,
    font_family: String,
    font_slant: FontSlant,
    font_weight: FontWeight,
    font_size: f32,

    #[cfg(feature = "font")]
    font_face: Option<FontFace>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            source: Color::BLACK,
            line_width: 2.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            fill_rule: FillRule::Winding,
            transform: Transform::identity(),
            font_family: "sans-serif".to_string(),
            font_slant: FontSlant::Normal,
            font_weight: FontWeight::Normal,
            font_size: 10.0,

            #[cfg(feature = "font")]
            font_face: None,
        }
    }
}

/// Drawing context bound to a pixmap for the duration of one redraw.
///
/// Operations that cannot return an error record the first failure, which
/// can be queried with [Context::status].
pub struct Context<'a> {
    pixmap: PixmapMut<'a>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    path: PathData,
    status: Option<ContextError>,

    #[cfg(feature = "font")]
    fonts: &'a mut FontManager,
}

impl<'a> Context<'a> {
    /// Creates a context drawing on `pixmap`.
    ///
    /// This is what the runner does on every redraw, but it also works for
    /// offscreen pixmaps.
    pub fn new(
        pixmap: PixmapMut<'a>,
        #[cfg(feature = "font")] fonts: &'a mut FontManager,
    ) -> Self {
        Self {
            pixmap,
            state: GraphicsState::default(),
            saved: Vec::new(),
            path: PathData::default(),
            status: None,

            #[cfg(feature = "font")]
            fonts,
        }
    }

    /// Width of the drawing surface in device pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height of the drawing surface in device pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the first error recorded by an operation without a return value.
    pub fn status(&self) -> Result<(), &ContextError> {
        match &self.status {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn set_error(&mut self, error: ContextError) {
        if self.status.is_none() {
            self.status = Some(error);
        }
    }

    fn check_finite(&mut self, values: &[f32]) -> bool {
        if values.iter().all(|v| v.is_finite()) {
            true
        } else {
            self.set_error(ContextError::NonFiniteValue);
            false
        }
    }

    // State

    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => self.set_error(ContextError::InvalidRestore),
        }
    }

    pub fn set_source_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.state.source = Color::rgb(r, g, b).clamped();
    }

    pub fn set_source_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.source = Color::new(r, g, b, a).clamped();
    }

    pub fn set_source_color(&mut self, color: Color) {
        self.state.source = color.clamped();
    }

    pub fn source(&self) -> Color {
        self.state.source
    }

    pub fn set_line_width(&mut self, width: f32) {
        if self.check_finite(&[width]) {
            self.state.line_width = width.max(0.0);
        }
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        if self.check_finite(&[limit]) {
            self.state.miter_limit = limit;
        }
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    // Transformations

    pub fn translate(&mut self, tx: f32, ty: f32) {
        if self.check_finite(&[tx, ty]) {
            self.state.transform = self.state.transform.pre_concat(Transform::from_translate(tx, ty));
        }
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        if self.check_finite(&[sx, sy]) {
            self.state.transform = self.state.transform.pre_concat(Transform::from_scale(sx, sy));
        }
    }

    /// Rotates the user space by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        if self.check_finite(&[angle]) {
            self.state.transform = self
                .state
                .transform
                .pre_concat(Transform::from_rotate(angle.to_degrees()));
        }
    }

    pub fn identity_matrix(&mut self) {
        self.state.transform = Transform::identity();
    }

    pub fn set_matrix(&mut self, transform: Transform) {
        self.state.transform = transform;
    }

    /// Applies `matrix` on top of the current transformation, like
    /// [Context::translate] does for a translation.
    pub fn transform(&mut self, matrix: Transform) {
        let Transform { sx, kx, ky, sy, tx, ty } = matrix;
        if self.check_finite(&[sx, kx, ky, sy, tx, ty]) {
            self.state.transform = self.state.transform.pre_concat(matrix);
        }
    }

    pub fn matrix(&self) -> Transform {
        self.state.transform
    }

    pub fn user_to_device(&self, x: f32, y: f32) -> Vector2 {
        map_point(&self.state.transform, x, y)
    }

    pub fn user_to_device_distance(&self, dx: f32, dy: f32) -> Vector2 {
        let ts = &self.state.transform;
        Vector2::new(ts.sx * dx + ts.kx * dy, ts.ky * dx + ts.sy * dy)
    }

    pub fn device_to_user(&self, x: f32, y: f32) -> Option<Vector2> {
        self.state
            .transform
            .invert()
            .map(|inverse| map_point(&inverse, x, y))
    }

    // Paths

    pub fn new_path(&mut self) {
        self.path.clear();
    }

    pub fn has_current_point(&self) -> bool {
        self.path.current_point().is_some()
    }

    /// Current point in user space.
    pub fn current_point(&self) -> Option<Vector2> {
        let p = self.path.current_point()?;
        self.device_to_user(p.x, p.y)
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if self.check_finite(&[x, y]) {
            let p = self.user_to_device(x, y);
            self.path.move_to(p);
        }
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.check_finite(&[x, y]) {
            let p = self.user_to_device(x, y);
            self.path.line_to(p);
        }
    }

    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        if self.check_finite(&[x1, y1, x2, y2, x3, y3]) {
            let c1 = self.user_to_device(x1, y1);
            let c2 = self.user_to_device(x2, y2);
            let p = self.user_to_device(x3, y3);
            self.path.cubic_to(c1, c2, p);
        }
    }

    fn relative(&mut self, dx: f32, dy: f32) -> Option<Vector2> {
        let Some(current) = self.path.current_point() else {
            self.set_error(ContextError::NoCurrentPoint);
            return None;
        };

        if !self.check_finite(&[dx, dy]) {
            return None;
        }

        Some(current + self.user_to_device_distance(dx, dy))
    }

    pub fn rel_move_to(&mut self, dx: f32, dy: f32) {
        if let Some(p) = self.relative(dx, dy) {
            self.path.move_to(p);
        }
    }

    pub fn rel_line_to(&mut self, dx: f32, dy: f32) {
        if let Some(p) = self.relative(dx, dy) {
            self.path.line_to(p);
        }
    }

    pub fn rel_curve_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32) {
        let (Some(c1), Some(c2), Some(p)) = (
            self.relative(dx1, dy1),
            self.relative(dx2, dy2),
            self.relative(dx3, dy3),
        ) else {
            return;
        };

        self.path.cubic_to(c1, c2, p);
    }

    /// Adds a closed rectangle subpath.
    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !self.check_finite(&[x, y, width, height]) {
            return;
        }

        self.move_to(x, y);
        self.rel_line_to(width, 0.0);
        self.rel_line_to(0.0, height);
        self.rel_line_to(-width, 0.0);
        self.close_path();
    }

    /// Adds a circular arc of `radius` around `(xc, yc)` going from `angle1`
    /// to `angle2` in the direction of increasing angles.
    ///
    /// A line connects the current point, if any, to the start of the arc.
    pub fn arc(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32) {
        if !self.check_finite(&[xc, yc, radius, angle1, angle2]) {
            return;
        }

        let angle2 = normalize_positive_sweep(angle1, angle2);
        self.add_arc(xc, yc, radius, angle1, angle2);
    }

    /// Like [Context::arc] but in the direction of decreasing angles.
    pub fn arc_negative(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32) {
        if !self.check_finite(&[xc, yc, radius, angle1, angle2]) {
            return;
        }

        let angle2 = normalize_negative_sweep(angle1, angle2);
        self.add_arc(xc, yc, radius, angle1, angle2);
    }

    fn add_arc(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32) {
        if radius <= 0.0 {
            self.line_to(xc, yc);
            return;
        }

        let (first, curves) = arc_to_cubics(Vector2::new(xc, yc), radius, angle1, angle2);

        self.line_to(first.x, first.y);
        for (c1, c2, p) in curves {
            self.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
        }
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    // Drawing

    fn paint_for(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.into());
        paint.anti_alias = true;
        paint
    }

    /// Fills the current path and clears it.
    pub fn fill(&mut self) {
        self.fill_preserve();
        self.new_path();
    }

    /// Fills the current path, keeping it for further operations.
    pub fn fill_preserve(&mut self) {
        let Some(path) = self.path.to_path() else {
            return;
        };

        let paint = self.paint_for(self.state.source);
        self.pixmap.fill_path(
            &path,
            &paint,
            self.state.fill_rule.into(),
            Transform::identity(),
            None,
        );
    }

    /// Strokes the current path and clears it.
    pub fn stroke(&mut self) {
        self.stroke_preserve();
        self.new_path();
    }

    /// Strokes the current path with the current line settings.
    ///
    /// The pen shape follows the transformation matrix active at this call.
    ///
    /// A line width of zero draws nothing.
    pub fn stroke_preserve(&mut self) {
        if self.state.line_width == 0.0 {
            return;
        }

        let Some(path) = self.path.to_path() else {
            return;
        };

        let transform = self.state.transform;
        let Some(inverse) = transform.invert() else {
            self.set_error(ContextError::InvalidMatrix);
            return;
        };

        let Some(user_path) = path.transform(inverse) else {
            return;
        };

        let stroke = Stroke {
            width: self.state.line_width,
            miter_limit: self.state.miter_limit,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            ..Stroke::default()
        };

        let paint = self.paint_for(self.state.source);
        self.pixmap
            .stroke_path(&user_path, &paint, &stroke, transform, None);
    }

    /// Fills the whole surface with the current source.
    pub fn paint(&mut self) {
        self.paint_with_alpha(1.0);
    }

    pub fn paint_with_alpha(&mut self, alpha: f32) {
        if !self.check_finite(&[alpha]) {
            return;
        }

        let color = self.state.source;
        let color = color.with_alpha(color.a * alpha.clamp(0.0, 1.0));

        let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32)
        else {
            return;
        };

        let paint = self.paint_for(color);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    // Text

    pub fn select_font_face(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        self.state.font_family = family.to_string();
        self.state.font_slant = slant;
        self.state.font_weight = weight;

        #[cfg(feature = "font")]
        {
            self.state.font_face = None;
        }
    }

    pub fn set_font_size(&mut self, size: f32) {
        if self.check_finite(&[size]) {
            self.state.font_size = size.max(0.0);
        }
    }

    pub fn font_size(&self) -> f32 {
        self.state.font_size
    }

    /// Uses a font loaded from raw TrueType/OpenType data instead of a
    /// system font.
    #[cfg(feature = "font")]
    pub fn set_font_face_from_bytes(&mut self, data: Vec<u8>) -> Result<(), ContextError> {
        let face = self.fonts.load_bytes(data)?;
        self.set_font_face(face);
        Ok(())
    }

    #[cfg(feature = "font")]
    pub fn set_font_face(&mut self, face: FontFace) {
        self.state.font_face = Some(face);
    }

    #[cfg(feature = "font")]
    fn current_face(&mut self) -> Result<FontFace, ContextError> {
        if let Some(face) = &self.state.font_face {
            return Ok(face.clone());
        }

        let style = FontStyle::from_face(self.state.font_slant, self.state.font_weight);
        let face = self.fonts.select(&self.state.font_family, style)?;
        self.state.font_face = Some(face.clone());

        Ok(face)
    }

    /// Measures `text` with the current font.
    #[cfg(feature = "font")]
    pub fn text_extents(&mut self, text: &str) -> Result<TextExtents, ContextError> {
        let face = self.current_face()?;
        Ok(self.fonts.text_extents(&face, text, self.state.font_size))
    }

    #[cfg(not(feature = "font"))]
    pub fn text_extents(&mut self, _text: &str) -> Result<TextExtents, ContextError> {
        Err(ContextError::FontSupportDisabled)
    }

    /// Draws `text` with its baseline starting at the current point, then
    /// moves the current point to the end of the text.
    ///
    /// Without a current point the text starts at the user space origin.
    #[cfg(feature = "font")]
    pub fn show_text(&mut self, text: &str) -> Result<(), ContextError> {
        let face = self.current_face()?;
        let size = self.state.font_size;
        let transform = self.state.transform;

        let mut pen = match self.current_point() {
            Some(p) => p,
            None if self.has_current_point() => return Err(ContextError::InvalidMatrix),
            None => Vector2::ZERO,
        };

        let color = self.state.source.to_bytes();
        let translate_only =
            transform.sx == 1.0 && transform.sy == 1.0 && transform.kx == 0.0 && transform.ky == 0.0;

        for c in text.chars() {
            let glyph = self.fonts.glyph(&face, c, size);
            let metrics = glyph.metrics;

            if metrics.width > 0 && metrics.height > 0 {
                if let Some(bitmap) = glyph_pixmap(
                    metrics.width as u32,
                    metrics.height as u32,
                    &glyph.coverage,
                    color,
                ) {
                    let (x0, y0, _, _) = crate::font::glyph_box(pen.x, &metrics);
                    let y0 = pen.y + y0;

                    let (placement, quality) = if translate_only {
                        let origin = map_point(&transform, x0, y0);
                        (
                            Transform::from_translate(origin.x.round(), origin.y.round()),
                            FilterQuality::Nearest,
                        )
                    } else {
                        (
                            transform.pre_concat(Transform::from_translate(x0, y0)),
                            FilterQuality::Bilinear,
                        )
                    };

                    let paint = PixmapPaint {
                        quality,
                        ..PixmapPaint::default()
                    };

                    self.pixmap
                        .draw_pixmap(0, 0, bitmap.as_ref(), &paint, placement, None);
                }
            }

            pen.x += metrics.advance_width;
        }

        self.move_to(pen.x, pen.y);

        Ok(())
    }

    #[cfg(not(feature = "font"))]
    pub fn show_text(&mut self, _text: &str) -> Result<(), ContextError> {
        Err(ContextError::FontSupportDisabled)
    }
}

fn map_point(ts: &Transform, x: f32, y: f32) -> Vector2 {
    Vector2::new(
        ts.sx * x + ts.kx * y + ts.tx,
        ts.ky * x + ts.sy * y + ts.ty,
    )
}

/// Turns a coverage bitmap into a premultiplied pixmap of `color`.
#[cfg(feature = "font")]
fn glyph_pixmap(width: u32, height: u32, coverage: &[u8], color: [u8; 4]) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    let [r, g, b, a] = color.map(u32::from);

    for (pixel, &cov) in pixmap.pixels_mut().iter_mut().zip(coverage) {
        let alpha = a * cov as u32 / 255;

        *pixel = PremultipliedColorU8::from_rgba(
            (r * alpha / 255) as u8,
            (g * alpha / 255) as u8,
            (b * alpha / 255) as u8,
            alpha as u8,
        )
        .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }

    Some(pixmap)
}
