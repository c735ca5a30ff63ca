//! Font loading with an ordered fallback chain, text measurement and drawing
//!
//! Outline fonts are measured with `ab_glyph` and drawn with `imageproc`.
//! When no font file can be loaded, the 8x8 bitmap glyphs from `font8x8` are
//! used instead, so a [`FontHandle`] can always be produced.

use ab_glyph::{Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// System font names tried for the participant name, in order
pub const NAME_FONT_FALLBACKS: &[&str] = &[
    "Poppins-Bold.ttf",
    "DejaVuSans-Bold.ttf",
    "Arial-Bold.ttf",
    "Arial.ttf",
];

/// System font names tried for the security code, in order
pub const CODE_FONT_FALLBACKS: &[&str] = &["Arial.ttf", "DejaVuSans.ttf"];

/// Directories searched for fonts given by file name only
const SYSTEM_FONT_DIRS: &[&str] = &[
    // Linux
    "/usr/share/fonts",
    "/usr/share/fonts/truetype",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
    "/usr/local/share/fonts",
    // macOS
    "/Library/Fonts",
    "/System/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    // Windows
    "C:\\Windows\\Fonts",
];

/// Bitmap glyph cell size in pixels
const BITMAP_CELL: u32 = 8;

#[derive(Error, Debug)]
pub enum FontLoadError {
    #[error("font not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data: {0}")]
    Invalid(#[from] ab_glyph::InvalidFont),
}

/// Where a font may come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// An explicit font file
    File(PathBuf),
    /// A font file name looked up in the working directory and system font folders
    System(&'static str),
    /// The built-in bitmap font (always available)
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "{}", path.display()),
            FontSource::System(name) => write!(f, "system font {name}"),
            FontSource::Builtin => write!(f, "built-in bitmap font"),
        }
    }
}

/// Fallback chain for the participant name
pub fn name_font_chain(user_path: Option<&Path>) -> Vec<FontSource> {
    font_chain(user_path, NAME_FONT_FALLBACKS)
}

/// Fallback chain for the security code
pub fn code_font_chain(user_path: Option<&Path>) -> Vec<FontSource> {
    font_chain(user_path, CODE_FONT_FALLBACKS)
}

fn font_chain(user_path: Option<&Path>, system: &[&'static str]) -> Vec<FontSource> {
    let mut chain = Vec::with_capacity(system.len() + 2);
    if let Some(path) = user_path {
        chain.push(FontSource::File(path.to_path_buf()));
    }
    chain.extend(system.iter().copied().map(FontSource::System));
    chain.push(FontSource::Builtin);
    chain
}

/// Resolve a bare font file name against the working directory and system folders
pub fn find_system_font(file_name: &str) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![PathBuf::from(".")];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }
    dirs.extend(SYSTEM_FONT_DIRS.iter().map(PathBuf::from));

    dirs.into_iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

/// Ink bounding box of a piece of text, relative to the drawing origin
/// (the top-left corner of the line box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TextBounds {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }

    fn union(self, other: TextBounds) -> TextBounds {
        TextBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[derive(Clone)]
enum Face {
    Outline(FontArc),
    Bitmap,
}

/// A renderable font. Cheap to clone.
#[derive(Clone)]
pub struct FontHandle {
    face: Face,
    origin: String,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("origin", &self.origin)
            .finish()
    }
}

impl FontHandle {
    /// Try each source in order and return the first that loads.
    ///
    /// Failures are logged and skipped; the built-in bitmap font is used when
    /// every source fails, so this never errors.
    pub fn load(sources: &[FontSource]) -> Self {
        for source in sources {
            match Self::try_load(source) {
                Ok(handle) => {
                    log::debug!("Loaded font from {source}");
                    return handle;
                }
                Err(e) => log::debug!("Skipping font {source}: {e}"),
            }
        }
        log::warn!("No font file could be loaded, falling back to the built-in bitmap font");
        Self::builtin()
    }

    pub fn try_load(source: &FontSource) -> Result<Self, FontLoadError> {
        match source {
            FontSource::File(path) => Self::from_file(path),
            FontSource::System(name) => {
                let path = find_system_font(name)
                    .ok_or_else(|| FontLoadError::NotFound((*name).to_string()))?;
                Self::from_file(&path)
            }
            FontSource::Builtin => Ok(Self::builtin()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, FontLoadError> {
        if !path.is_file() {
            return Err(FontLoadError::NotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(data, path.display().to_string())
    }

    pub fn from_bytes(data: Vec<u8>, origin: impl Into<String>) -> Result<Self, FontLoadError> {
        let font = FontArc::try_from_vec(data)?;
        Ok(Self {
            face: Face::Outline(font),
            origin: origin.into(),
        })
    }

    pub fn builtin() -> Self {
        Self {
            face: Face::Bitmap,
            origin: FontSource::Builtin.to_string(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Face::Bitmap)
    }

    /// Human readable description of where this font came from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Ink bounding box of `text` rendered at `size` pixels per em
    pub fn measure(&self, text: &str, size: u32) -> TextBounds {
        match &self.face {
            Face::Outline(font) => measure_outline(font, text, size),
            Face::Bitmap => measure_bitmap(text, size),
        }
    }

    /// Draw `text` with its line box's top-left corner at `origin`
    pub fn draw(
        &self,
        image: &mut RgbImage,
        text: &str,
        size: u32,
        origin: (i32, i32),
        color: Rgb<u8>,
    ) {
        match &self.face {
            Face::Outline(font) => draw_outline(font, image, text, size, origin, color),
            Face::Bitmap => draw_bitmap(image, text, size, origin, color),
        }
    }
}

// =============================================================================
// Outline fonts
// =============================================================================

/// Scale so that one em equals `size` pixels
fn px_scale(font: &FontArc, size: u32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size as f32 * font.height_unscaled() / units_per_em)
}

fn layout_glyphs(font: &FontArc, text: &str, size: u32) -> Vec<Glyph> {
    let scale = px_scale(font, size);
    let scaled = font.as_scaled(scale);
    let mut caret = point(0.0, scaled.ascent());
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::new();

    for c in text.chars() {
        let id = font.glyph_id(c);
        if let Some(prev) = previous {
            caret.x += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, caret));
        caret.x += scaled.h_advance(id);
        previous = Some(id);
    }

    glyphs
}

fn measure_outline(font: &FontArc, text: &str, size: u32) -> TextBounds {
    layout_glyphs(font, text, size)
        .into_iter()
        .filter_map(|glyph| font.outline_glyph(glyph))
        .map(|outlined| {
            let rect = outlined.px_bounds();
            TextBounds {
                min_x: rect.min.x.floor() as i32,
                min_y: rect.min.y.floor() as i32,
                max_x: rect.max.x.ceil() as i32,
                max_y: rect.max.y.ceil() as i32,
            }
        })
        .reduce(TextBounds::union)
        .unwrap_or_default()
}

fn draw_outline(
    font: &FontArc,
    image: &mut RgbImage,
    text: &str,
    size: u32,
    origin: (i32, i32),
    color: Rgb<u8>,
) {
    // imageproc hangs glyphs from the ascent line below `origin`, matching `layout_glyphs`
    draw_text_mut(
        image,
        color,
        origin.0,
        origin.1,
        px_scale(font, size),
        font,
        text,
    );
}

// =============================================================================
// Built-in bitmap font
// =============================================================================

fn bitmap_scale(size: u32) -> u32 {
    (size / BITMAP_CELL).max(1)
}

fn measure_bitmap(text: &str, size: u32) -> TextBounds {
    let count = text.chars().count() as i32;
    if count == 0 {
        return TextBounds::default();
    }
    let cell = (BITMAP_CELL * bitmap_scale(size)) as i32;
    TextBounds {
        min_x: 0,
        min_y: 0,
        max_x: count * cell,
        max_y: cell,
    }
}

fn draw_bitmap(image: &mut RgbImage, text: &str, size: u32, origin: (i32, i32), color: Rgb<u8>) {
    let scale = bitmap_scale(size) as i32;
    let cell = BITMAP_CELL as i32 * scale;

    for (index, c) in text.chars().enumerate() {
        let Some(rows) = BASIC_FONTS.get(c).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let cell_left = origin.0 + index as i32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for column in 0..BITMAP_CELL as i32 {
                if bits & (1 << column) == 0 {
                    continue;
                }
                let x0 = cell_left + column * scale;
                let y0 = origin.1 + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        blend(image, x0 + dx, y0 + dy, color, 1.0);
                    }
                }
            }
        }
    }
}

// =============================================================================
// Pixel blending
// =============================================================================

fn blend(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let pixel = image.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        *dst = (src as f32 * alpha + *dst as f32 * (1.0 - alpha)).round() as u8;
    }
}
