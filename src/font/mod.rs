//! Font discovery, loading and glyph rasterization for [crate::context::Context::show_text].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::context::{FontSlant, FontWeight, TextExtents};

mod system;

pub use system::{get_font_info, search_system_font};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontStyle(u8);

bitflags::bitflags! {
    impl FontStyle: u8 {
        /// The font is bold.
        const BOLD = 0b00000001;
        /// The font is italic or oblique.
        const ITALIC = 0b00000010;
    }
}

impl FontStyle {
    pub fn from_face(slant: FontSlant, weight: FontWeight) -> Self {
        let mut style = FontStyle::empty();

        if slant != FontSlant::Normal {
            style |= FontStyle::ITALIC;
        }

        if weight == FontWeight::Bold {
            style |= FontStyle::BOLD;
        }

        style
    }
}

#[derive(Clone, Debug)]
pub struct FontInfo {
    pub name: String,
    pub path: PathBuf,
    pub style: FontStyle,
}

#[derive(Debug)]
pub enum FontError {
    NoFontAvailable,
    InvalidFontData(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::NoFontAvailable => write!(f, "No font available on this system"),
            FontError::InvalidFontData(e) => write!(f, "Invalid font data: {}", e),
            FontError::IoError(e) => write!(f, "Failed to read font: {}", e),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FontError {
    fn from(e: std::io::Error) -> Self {
        FontError::IoError(e)
    }
}

/// A loaded font face, cheap to clone.
#[derive(Clone)]
pub struct FontFace {
    key: usize,
    font: Arc<fontdue::Font>,
}

impl FontFace {
    /// Ascent and descent (negative, below the baseline) at `size`.
    pub fn line_metrics(&self, size: f32) -> (f32, f32) {
        self.font
            .horizontal_line_metrics(size)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((size, 0.0))
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace").field("key", &self.key).finish()
    }
}

/// A glyph coverage bitmap, one byte per pixel, rows top to bottom.
#[derive(Clone, Debug)]
pub struct RasterizedGlyph {
    pub metrics: fontdue::Metrics,
    pub coverage: Vec<u8>,
}

/// Loads font faces and caches rasterized glyphs.
///
/// One manager lives for the whole lifetime of a window so glyphs are
/// rasterized once and reused on every redraw.
#[derive(Default)]
pub struct FontManager {
    by_path: HashMap<PathBuf, FontFace>,
    by_selection: HashMap<(String, FontStyle), FontFace>,
    by_data: HashMap<u64, FontFace>,
    glyphs: HashMap<(usize, char, u32), RasterizedGlyph>,
    next_key: usize,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a family name and style to a system font.
    ///
    /// Falls back to the closest match when the family is not installed:
    /// same family any style, then any family with the style, then any font.
    pub fn select(&mut self, family: &str, style: FontStyle) -> Result<FontFace, FontError> {
        let selection = (family.to_lowercase(), style);
        if let Some(face) = self.by_selection.get(&selection) {
            return Ok(face.clone());
        }

        let fonts = search_system_font();
        let info = resolve_font(&fonts, family, style).ok_or(FontError::NoFontAvailable)?;

        if !info.name.eq_ignore_ascii_case(family) {
            crate::dbg_log!("Font '{}' not found, using '{}'", family, info.name);
        }

        let path = info.path.clone();
        let face = self.load_file(&path)?;
        self.by_selection.insert(selection, face.clone());

        Ok(face)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<FontFace, FontError> {
        if let Some(face) = self.by_path.get(path) {
            return Ok(face.clone());
        }

        let data = std::fs::read(path)?;
        let face = self.load_bytes(data)?;
        self.by_path.insert(path.to_path_buf(), face.clone());

        Ok(face)
    }

    /// Parses a font from memory. Identical data maps to the same face, so
    /// its glyph cache is shared.
    pub fn load_bytes(&mut self, data: Vec<u8>) -> Result<FontFace, FontError> {
        let fingerprint = fxhash::hash64(&data);
        if let Some(face) = self.by_data.get(&fingerprint) {
            return Ok(face.clone());
        }

        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| FontError::InvalidFontData(e.to_string()))?;

        let face = FontFace {
            key: self.next_key,
            font: Arc::new(font),
        };
        self.next_key += 1;
        self.by_data.insert(fingerprint, face.clone());

        Ok(face)
    }

    /// Returns the glyph for `c` at `size` pixels, rasterizing it on first use.
    pub fn glyph(&mut self, face: &FontFace, c: char, size: f32) -> &RasterizedGlyph {
        self.glyphs
            .entry((face.key, c, size.to_bits()))
            .or_insert_with(|| {
                let (metrics, coverage) = face.font.rasterize(c, size);
                RasterizedGlyph { metrics, coverage }
            })
    }

    pub fn text_extents(&mut self, face: &FontFace, text: &str, size: f32) -> TextExtents {
        let mut pen_x = 0.0f32;

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for c in text.chars() {
            let metrics = self.glyph(face, c, size).metrics;

            if metrics.width > 0 && metrics.height > 0 {
                let (x0, y0, x1, y1) = glyph_box(pen_x, &metrics);

                min_x = min_x.min(x0);
                min_y = min_y.min(y0);
                max_x = max_x.max(x1);
                max_y = max_y.max(y1);
            }

            pen_x += metrics.advance_width;
        }

        if min_x == f32::MAX {
            return TextExtents {
                x_advance: pen_x,
                ..Default::default()
            };
        }

        TextExtents {
            x_bearing: min_x,
            y_bearing: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
            x_advance: pen_x,
            y_advance: 0.0,
        }
    }
}

/// Bounding box of a glyph drawn with its origin at `(pen_x, 0)` on the
/// baseline, with y growing downwards.
pub(crate) fn glyph_box(pen_x: f32, metrics: &fontdue::Metrics) -> (f32, f32, f32, f32) {
    let x0 = pen_x + metrics.xmin as f32;
    let y0 = -(metrics.height as f32 + metrics.ymin as f32);

    (x0, y0, x0 + metrics.width as f32, y0 + metrics.height as f32)
}

/// Picks the best installed font for a family and style.
pub(crate) fn resolve_font<'a>(
    fonts: &'a [FontInfo],
    family: &str,
    style: FontStyle,
) -> Option<&'a FontInfo> {
    let same_family = |info: &&FontInfo| info.name.eq_ignore_ascii_case(family);

    fonts
        .iter()
        .find(|info| same_family(info) && info.style == style)
        .or_else(|| fonts.iter().find(same_family))
        .or_else(|| fonts.iter().find(|info| info.style == style))
        .or_else(|| fonts.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(name: &str, style: FontStyle) -> FontInfo {
        FontInfo {
            name: name.to_string(),
            path: PathBuf::from(format!("/fonts/{}-{}.ttf", name, style.bits())),
            style,
        }
    }

    fn installed() -> Vec<FontInfo> {
        vec![
            font("DejaVu Sans", FontStyle::empty()),
            font("DejaVu Sans", FontStyle::BOLD),
            font("Liberation Serif", FontStyle::BOLD | FontStyle::ITALIC),
            font("Space Age", FontStyle::empty()),
        ]
    }

    #[test]
    fn face_options_map_to_style() {
        assert_eq!(
            FontStyle::from_face(FontSlant::Italic, FontWeight::Bold),
            FontStyle::BOLD | FontStyle::ITALIC
        );
        assert_eq!(
            FontStyle::from_face(FontSlant::Oblique, FontWeight::Normal),
            FontStyle::ITALIC
        );
        assert_eq!(
            FontStyle::from_face(FontSlant::Normal, FontWeight::Normal),
            FontStyle::empty()
        );
    }

    #[test]
    fn exact_family_and_style_wins() {
        let fonts = installed();
        let found = resolve_font(&fonts, "dejavu sans", FontStyle::BOLD).unwrap();

        assert_eq!(found.name, "DejaVu Sans");
        assert_eq!(found.style, FontStyle::BOLD);
    }

    #[test]
    fn family_beats_style() {
        let fonts = installed();
        let found =
            resolve_font(&fonts, "Space Age", FontStyle::BOLD | FontStyle::ITALIC).unwrap();

        assert_eq!(found.name, "Space Age");
    }

    #[test]
    fn unknown_family_falls_back_to_style_then_anything() {
        let fonts = installed();

        let found = resolve_font(&fonts, "sans-serif", FontStyle::BOLD | FontStyle::ITALIC).unwrap();
        assert_eq!(found.name, "Liberation Serif");

        let only_regular = vec![font("Mono", FontStyle::empty())];
        let found = resolve_font(&only_regular, "sans-serif", FontStyle::BOLD).unwrap();
        assert_eq!(found.name, "Mono");
    }

    #[test]
    fn nothing_installed() {
        assert!(resolve_font(&[], "sans-serif", FontStyle::empty()).is_none());
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let mut manager = FontManager::new();
        let err = manager.load_bytes(b"not a font".to_vec()).unwrap_err();

        assert!(matches!(err, FontError::InvalidFontData(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut manager = FontManager::new();
        let err = manager
            .load_file(Path::new("/nonexistent/quickdraw.ttf"))
            .unwrap_err();

        assert!(matches!(err, FontError::IoError(_)));
    }

    fn installed_font_bytes() -> Option<Vec<u8>> {
        let fonts = search_system_font();
        fonts.iter().find_map(|info| std::fs::read(&info.path).ok())
    }

    #[test]
    fn same_bytes_share_a_face_and_its_glyphs() {
        let Some(data) = installed_font_bytes() else {
            return;
        };

        let mut manager = FontManager::new();
        let first = manager.load_bytes(data.clone()).unwrap();
        manager.glyph(&first, 'A', 12.0);
        let cached = manager.glyphs.len();

        let second = manager.load_bytes(data).unwrap();
        manager.glyph(&second, 'A', 12.0);

        assert_eq!(first.key, second.key);
        assert_eq!(manager.glyphs.len(), cached);
    }

    #[test]
    fn text_extents_walk_the_pen() {
        let Some(data) = installed_font_bytes() else {
            return;
        };

        let mut manager = FontManager::new();
        let face = manager.load_bytes(data).unwrap();

        let empty = manager.text_extents(&face, "", 20.0);
        assert_eq!(empty.x_advance, 0.0);
        assert_eq!(empty.width, 0.0);

        let one = manager.text_extents(&face, "H", 20.0);
        let two = manager.text_extents(&face, "HH", 20.0);

        assert!(one.width > 0.0);
        assert!(one.height > 0.0);
        // Glyphs sit above the baseline.
        assert!(one.y_bearing < 0.0);
        assert!((two.x_advance - 2.0 * one.x_advance).abs() < 1e-3);
        assert!(two.width > one.width);
    }

    #[test]
    fn glyph_box_is_relative_to_baseline() {
        let metrics = fontdue::Metrics {
            xmin: 1,
            ymin: -2,
            width: 5,
            height: 10,
            advance_width: 7.0,
            ..Default::default()
        };

        // 8 pixels above the baseline, 2 below.
        assert_eq!(glyph_box(3.0, &metrics), (4.0, -8.0, 9.0, 2.0));
    }
}
