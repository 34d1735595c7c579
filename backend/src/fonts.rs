//! Font resolution and text drawing for certificate composition.
//!
//! Tries a TrueType face from the configured fonts directory first (Arial by
//! preference), then the Liberation and DejaVu faces commonly present on
//! Linux hosts. When nothing resolves the
//! drawing falls back to a minimal built-in 8x8 bitmap face so generation
//! still succeeds; text size is best-effort cosmetic, not a layout contract.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pixel multiplier for the 8x8 fallback glyphs. The fallback ignores the
/// requested size entirely.
const BUILTIN_SCALE: u32 = 2;

pub enum FontLibrary {
    /// A resolved TrueType face, drawn at the requested pixel sizes.
    Truetype(FontVec),
    /// 8x8 bitmap fallback with no fixed size guarantee.
    Builtin,
}

impl FontLibrary {
    pub fn load(fonts_dir: &Path) -> Self {
        let candidates = [
            fonts_dir.join("arial.ttf"),
            fonts_dir.join("Arial.ttf"),
            fonts_dir.join("LiberationSans-Regular.ttf"),
            PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        ];
        for path in candidates {
            if let Ok(bytes) = fs::read(&path) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    log::info!("using certificate font {}", path.display());
                    return FontLibrary::Truetype(font);
                }
            }
        }
        log::warn!("no TrueType font found, using the built-in bitmap face");
        FontLibrary::Builtin
    }

    /// Draw `text` horizontally centered, with the string's vertical center
    /// at `cy`.
    pub fn draw_centered(&self, canvas: &mut RgbaImage, text: &str, size: f32, cy: i32) {
        if text.is_empty() {
            return;
        }
        match self {
            FontLibrary::Truetype(font) => {
                let scale = PxScale::from(size);
                let (text_w, text_h) = text_size(scale, font, text);
                let x = (canvas.width() as i32 - text_w as i32) / 2;
                let y = cy - text_h as i32 / 2;
                draw_text_mut(canvas, TEXT_COLOR, x, y, scale, font, text);
            }
            FontLibrary::Builtin => draw_builtin_centered(canvas, text, cy),
        }
    }
}

fn draw_builtin_centered(canvas: &mut RgbaImage, text: &str, cy: i32) {
    let glyph_px = (8 * BUILTIN_SCALE) as i32;
    let text_w = text.chars().count() as i32 * glyph_px;
    let mut x = (canvas.width() as i32 - text_w) / 2;
    let y = cy - glyph_px / 2;
    for ch in text.chars() {
        draw_builtin_glyph(canvas, ch, x, y);
        x += glyph_px;
    }
}

/// Blit one 8x8 glyph, `BUILTIN_SCALE`x enlarged, clipped to the canvas.
fn draw_builtin_glyph(canvas: &mut RgbaImage, ch: char, x0: i32, y0: i32) {
    let index = ch as usize;
    if index >= font8x8::legacy::BASIC_LEGACY.len() {
        return;
    }
    let glyph = font8x8::legacy::BASIC_LEGACY[index];
    let scale = BUILTIN_SCALE as i32;
    for (row, &bits) in glyph.iter().enumerate() {
        for col in 0..8i32 {
            if bits & (1u8 << col) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x0 + col * scale + dx;
                    let py = y0 + row as i32 * scale + dy;
                    if px >= 0
                        && py >= 0
                        && (px as u32) < canvas.width()
                        && (py as u32) < canvas.height()
                    {
                        canvas.put_pixel(px as u32, py as u32, TEXT_COLOR);
                    }
                }
            }
        }
    }
}
