use std::path::{Path, PathBuf};

use crate::utils::ArcMut;

use super::{FontInfo, FontStyle};

lazy_static::lazy_static! {
    static ref SYSTEM_FONTS: ArcMut<Option<Vec<FontInfo>>> = ArcMut::new(None);
}

// Font directories are usually nested per vendor, but never deeply.
const MAX_SEARCH_DEPTH: usize = 4;

/// Returns every `.ttf`/`.otf` font found in the platform font directories.
///
/// The directories are only scanned once per process.
pub fn search_system_font() -> Vec<FontInfo> {
    let mut cache = SYSTEM_FONTS.lock();
    if let Some(fonts) = cache.as_ref() {
        return fonts.clone();
    }

    crate::dbg_log!("Searching system fonts...");

    let mut fonts = Vec::new();
    for font_dir in system_font_dirs() {
        collect_fonts(&font_dir, 0, &mut fonts);
    }

    if fonts.is_empty() {
        crate::warn_log!(
            "No system fonts found, show_text will fail until a font is loaded from bytes"
        );
    } else {
        crate::dbg_log!("Found {} system fonts.", fonts.len());
    }

    *cache = Some(fonts.clone());

    fonts
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut font_dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
        font_dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home".to_string());
        font_dirs.push(PathBuf::from(&home).join(".fonts"));
        font_dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
        font_dirs.push(PathBuf::from("/usr/share/fonts"));
        font_dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }
    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/Users".to_string());
        font_dirs.push(PathBuf::from(home).join("Library/Fonts"));
        font_dirs.push(PathBuf::from("/Library/Fonts"));
        font_dirs.push(PathBuf::from("/System/Library/Fonts"));
    }

    font_dirs
}

fn collect_fonts(dir: &Path, depth: usize, fonts: &mut Vec<FontInfo>) {
    if depth > MAX_SEARCH_DEPTH {
        return;
    }

    let Ok(entries) = dir.read_dir() else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        let path = entry.path();
        if file_type.is_dir() {
            collect_fonts(&path, depth + 1, fonts);
        } else if file_type.is_file() && is_font_file(&path) {
            if let Some(font_info) = get_font_info(&path) {
                fonts.push(font_info);
            }
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            ext == "ttf" || ext == "otf"
        })
        .unwrap_or(false)
}

pub fn get_font_info(path: &Path) -> Option<FontInfo> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            crate::dbg_log!("Failed to read font file at path: {}, {}", path.display(), e);
            return None;
        }
    };

    let mut info = parse_font_info(&data)?;
    info.path = path.to_path_buf();

    Some(info)
}

/// Reads the family name and style out of raw font data.
pub(crate) fn parse_font_info(data: &[u8]) -> Option<FontInfo> {
    let face = match ttf_parser::Face::parse(data, 0) {
        Ok(face) => face,
        Err(e) => {
            crate::dbg_log!("Failed to parse font data: {}", e);
            return None;
        }
    };

    let family = face
        .names()
        .into_iter()
        .filter(|name| {
            name.name_id == ttf_parser::name_id::TYPOGRAPHIC_FAMILY
                || name.name_id == ttf_parser::name_id::FAMILY
        })
        .find_map(|name| name.to_string())?;

    let mut style = FontStyle::empty();

    if face.is_bold() {
        style |= FontStyle::BOLD;
    }

    if face.is_italic() || face.is_oblique() {
        style |= FontStyle::ITALIC;
    }

    Some(FontInfo {
        name: family,
        path: PathBuf::new(),
        style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_font_extensions() {
        assert!(is_font_file(Path::new("/fonts/DejaVuSans.ttf")));
        assert!(is_font_file(Path::new("/fonts/SpaceAge.OTF")));
        assert!(!is_font_file(Path::new("/fonts/fonts.dir")));
        assert!(!is_font_file(Path::new("/fonts/README")));
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(parse_font_info(b"definitely not a font").is_none());
        assert!(parse_font_info(&[]).is_none());
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let mut fonts = Vec::new();
        collect_fonts(Path::new("/nonexistent/quickdraw/fonts"), 0, &mut fonts);
        assert!(fonts.is_empty());
    }
}
