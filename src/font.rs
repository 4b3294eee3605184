//! Font selection for the card.
//!
//! TrueType fonts are looked up from a short list of paths. When none of
//! them can be read the card is still drawn, using the 8x8 bitmap glyphs
//! from `font8x8` scaled up by an integer factor.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use font8x8::legacy::BASIC_LEGACY;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{debug, warn};

/// Searched after any user-supplied fonts. The first entry exists on the
/// Ubuntu CI runners.
pub const SYSTEM_FONT_PATHS: [&str; 2] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

const GLYPH_PX: u32 = 8;

pub enum CardFont {
    TrueType(FontVec),
    Builtin,
}

impl CardFont {
    /// Load the first readable font from `preferred`, then the system list.
    /// Never fails: falls back to [`CardFont::Builtin`].
    pub fn load(preferred: &[PathBuf]) -> Self {
        Self::load_from(
            preferred
                .iter()
                .map(PathBuf::as_path)
                .chain(SYSTEM_FONT_PATHS.iter().map(Path::new)),
        )
    }

    /// Load the first readable font among `candidates`, in order.
    pub fn load_from<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Self {
        for path in candidates {
            match Self::from_file(path) {
                Ok(font) => {
                    debug!(path = %path.display(), "loaded font");
                    return font;
                }
                Err(e) => debug!(path = %path.display(), "skipping font: {e:#}"),
            }
        }

        warn!("no usable TrueType font found, falling back to built-in bitmap font");
        CardFont::Builtin
    }

    fn from_file(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .with_context(|| format!("Invalid font data in {}", path.display()))?;
        Ok(CardFont::TrueType(font))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CardFont::Builtin)
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Out-of-bounds
    /// pixels are clipped.
    pub fn draw(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: f32, text: &str) {
        match self {
            CardFont::TrueType(font) => {
                draw_text_mut(image, color, x, y, PxScale::from(size), font, text)
            }
            CardFont::Builtin => draw_bitmap_text(image, color, x, y, bitmap_scale(size), text),
        }
    }

    /// Width and height in pixels of `text` at `size`.
    pub fn measure(&self, size: f32, text: &str) -> (u32, u32) {
        match self {
            CardFont::TrueType(font) => text_size(PxScale::from(size), font, text),
            CardFont::Builtin => {
                let scale = bitmap_scale(size);
                let chars = text.chars().count() as u32;
                (chars * GLYPH_PX * scale, GLYPH_PX * scale)
            }
        }
    }
}

/// Integer magnification of the 8px glyphs for a nominal point size.
fn bitmap_scale(size: f32) -> u32 {
    ((size / GLYPH_PX as f32) as u32).max(1)
}

fn glyph(c: char) -> &'static [u8; 8] {
    let index = if c.is_ascii() { c as usize } else { '?' as usize };
    &BASIC_LEGACY[index]
}

fn draw_bitmap_text(image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, scale: u32, text: &str) {
    let step = (GLYPH_PX * scale) as i32;

    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as i32 * step;
        for (row, bits) in glyph(c).iter().enumerate() {
            // bit 0 is the leftmost pixel
            for col in 0..GLYPH_PX {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = origin_x + (col * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn unusable_candidates_fall_back_to_builtin() {
        let garbage = tempfile::NamedTempFile::new().unwrap();
        fs::write(garbage.path(), b"not a font").unwrap();

        let font = CardFont::load_from([Path::new("/nonexistent/font.ttf"), garbage.path()]);
        assert!(font.is_builtin());
    }

    #[test]
    fn empty_candidate_list_falls_back_to_builtin() {
        assert!(CardFont::load_from(std::iter::empty()).is_builtin());
    }

    #[test]
    fn garbage_font_file_is_skipped() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), b"not a font").unwrap();
        assert!(CardFont::from_file(file.path()).is_err());
    }

    #[test]
    fn bitmap_scale_is_at_least_one() {
        assert_eq!(bitmap_scale(4.0), 1);
        assert_eq!(bitmap_scale(14.0), 1);
        assert_eq!(bitmap_scale(18.0), 2);
        assert_eq!(bitmap_scale(36.0), 4);
    }

    #[test]
    fn builtin_measure_scales_with_size() {
        let font = CardFont::Builtin;
        assert_eq!(font.measure(14.0, "24%"), (24, 8));
        assert_eq!(font.measure(36.0, "A++"), (96, 32));
        assert_eq!(font.measure(36.0, ""), (0, 32));
    }

    #[test]
    fn builtin_draw_sets_pixels_inside_measured_box() {
        let mut image = RgbImage::from_pixel(40, 20, BLACK);
        let font = CardFont::Builtin;
        font.draw(&mut image, WHITE, 2, 2, 16.0, "H");

        let (w, h) = font.measure(16.0, "H");
        let mut lit = 0;
        for (x, y, p) in image.enumerate_pixels() {
            if *p == WHITE {
                lit += 1;
                assert!(x >= 2 && x < 2 + w && y >= 2 && y < 2 + h);
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn builtin_draw_clips_at_edges() {
        let mut image = RgbImage::from_pixel(10, 10, BLACK);
        CardFont::Builtin.draw(&mut image, WHITE, -5, 6, 36.0, "overflowing ünïcode");
        assert_eq!(image.dimensions(), (10, 10));
    }
}
