//! Per-row image composition: QR overlay plus centered text.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Luma, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use crate::error::ApiError;
use crate::fonts::FontLibrary;

/// Side of the QR square pasted onto the certificate.
const QR_SIZE: u32 = 150;
/// Inset of the QR square from the bottom-right corner.
const QR_INSET: u32 = 50;

const NAME_SIZE: f32 = 60.0;
const DETAIL_SIZE: f32 = 40.0;

pub(super) struct CertificateText<'a> {
    pub name: &'a str,
    pub event: &'a str,
    pub date: &'a str,
}

/// Composite one certificate: QR at the bottom-right corner, the three text
/// lines centered at 40/50/60% of the template height. Returns encoded PNG
/// bytes; `canvas` is this row's own copy of the template.
pub(super) fn compose_certificate(
    mut canvas: RgbaImage,
    fonts: &FontLibrary,
    text: &CertificateText<'_>,
    verification_url: &str,
) -> Result<Vec<u8>, ApiError> {
    let qr = qr_square(verification_url)?;
    let (width, height) = canvas.dimensions();
    // Insets clamp to the origin on templates smaller than the QR block.
    let x = width.saturating_sub(QR_SIZE + QR_INSET);
    let y = height.saturating_sub(QR_SIZE + QR_INSET);
    imageops::overlay(&mut canvas, &qr, x as i64, y as i64);

    let h = height as f32;
    fonts.draw_centered(&mut canvas, text.name, NAME_SIZE, (h * 0.4) as i32);
    fonts.draw_centered(&mut canvas, text.event, DETAIL_SIZE, (h * 0.5) as i32);
    fonts.draw_centered(&mut canvas, text.date, DETAIL_SIZE, (h * 0.6) as i32);

    encode_png(&canvas)
}

/// QR code for `data` at error-correction level L (tolerant of ~7% damage),
/// rendered at its natural module size and then scaled to a fixed square.
/// Nearest-neighbor keeps the module edges crisp.
fn qr_square(data: &str) -> Result<RgbaImage, ApiError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::L)
        .map_err(|e| ApiError::Internal(format!("QR encoding failed: {e}")))?;
    let modules = code.render::<Luma<u8>>().build();
    let scaled = imageops::resize(&modules, QR_SIZE, QR_SIZE, FilterType::Nearest);
    Ok(DynamicImage::ImageLuma8(scaled).to_rgba8())
}

/// Flatten alpha over white and encode as 8-bit RGB PNG.
fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, ApiError> {
    let (width, height) = canvas.dimensions();
    let mut background = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut background, canvas, 0, 0);
    let rgb = DynamicImage::ImageRgba8(background).to_rgb8();
    let raw = rgb.into_raw();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ApiError::Internal(format!("PNG encoding failed: {e}")))?;
        writer
            .write_image_data(&raw)
            .map_err(|e| ApiError::Internal(format!("PNG encoding failed: {e}")))?;
    }
    Ok(out)
}
