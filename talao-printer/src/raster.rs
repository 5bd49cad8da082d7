//! Raster image pipeline
//!
//! Decodes base64 images, scales them onto an opaque white canvas,
//! converts to 1-bit monochrome with Floyd-Steinberg error diffusion and
//! packs the result into `GS v 0` raster frames. Tall images are sliced
//! into segments so one command never exceeds the printer's onboard
//! raster buffer.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STD;
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

/// Raster widths the supported printheads accept, in dots.
pub const SUPPORTED_WIDTH_DOTS: [u32; 4] = [384, 512, 576, 640];

/// Minimum height of one raster segment, in dot rows.
pub const SEGMENT_HEIGHT_MIN: u32 = 420;

/// Maximum height of one raster segment, in dot rows.
pub const SEGMENT_HEIGHT_MAX: u32 = 2200;

/// Logo box on the receipt header, in dots.
const LOGO_MAX_WIDTH: u32 = 176;
const LOGO_MAX_HEIGHT: u32 = 68;

/// Luma cutoff between black and white (0-255 scale).
const DITHER_THRESHOLD: f64 = 162.0;

/// Strip an optional `data:image/...;base64,` prefix and decode.
///
/// Returns `None` on empty input or malformed base64; the caller decides
/// whether that is fatal.
pub fn decode_base64_image(raw: &str) -> Option<Vec<u8>> {
    let mut value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if value.get(..10).is_some_and(|p| p.eq_ignore_ascii_case("data:image")) {
        if let Some(comma) = value.find(',') {
            if comma + 1 < value.len() {
                value = &value[comma + 1..];
            }
        }
    }
    match BASE64_STD.decode(value) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "base64 image decode failed");
            None
        }
    }
}

/// Snap a requested raster width to the supported printhead widths.
///
/// Non-positive values select the fallback; anything else snaps to the
/// nearest supported width, first candidate winning ties.
pub fn normalize_paper_width_dots(value: i64, fallback: u32) -> u32 {
    let target = if value > 0 { value } else { i64::from(fallback) };
    if SUPPORTED_WIDTH_DOTS.iter().any(|&w| i64::from(w) == target) {
        return target as u32;
    }

    let mut nearest = fallback;
    let mut best_delta = i64::MAX;
    for candidate in SUPPORTED_WIDTH_DOTS {
        let delta = (i64::from(candidate) - target).abs();
        if delta < best_delta {
            best_delta = delta;
            nearest = candidate;
        }
    }
    nearest
}

/// Clamp a segment height to the printable range.
pub fn clamp_segment_height(value: i64) -> u32 {
    value.clamp(i64::from(SEGMENT_HEIGHT_MIN), i64::from(SEGMENT_HEIGHT_MAX)) as u32
}

/// Rasterize a base64 logo into a single raster frame.
///
/// The logo is constrained to 176x68 dots (never upscaled) and resampled
/// with a bilinear filter. Returns `None` when the image cannot be
/// decoded; a missing logo never fails the enclosing document.
pub fn logo_raster(raw_base64: &str) -> Option<Vec<u8>> {
    let bytes = decode_base64_image(raw_base64)?;
    let src = load_bitmap(&bytes)?;

    let scale = fit_scale(src.width(), src.height(), LOGO_MAX_WIDTH, Some(LOGO_MAX_HEIGHT));
    let width = scaled_dim(src.width(), scale);
    let height = scaled_dim(src.height(), scale);

    let mut luma = scaled_luma(&src, width, height, FilterType::Triangle);
    dither(&mut luma, width as usize, height as usize);
    let frame = raster_frame(&luma, width as usize, height as usize);
    if frame.is_empty() { None } else { Some(frame) }
}

/// Rasterize one fiscal page into buffer-bounded raster frames.
///
/// The page is scaled to fit `max_width` dots (snapped to the supported
/// set, never upscaled), then cut into vertical slices of at most
/// `segment_height` rows; each slice is dithered and framed
/// independently. Decode failures yield an empty list.
pub fn page_raster_chunks(raw_base64: &str, max_width: u32, segment_height: u32) -> Vec<Vec<u8>> {
    let Some(bytes) = decode_base64_image(raw_base64) else {
        return Vec::new();
    };
    let Some(src) = load_bitmap(&bytes) else {
        warn!("fiscal page image could not be decoded");
        return Vec::new();
    };

    let width_limit = normalize_paper_width_dots(i64::from(max_width), SUPPORTED_WIDTH_DOTS[0]);
    let segment = clamp_segment_height(i64::from(segment_height)) as usize;

    let scale = fit_scale(src.width(), src.height(), width_limit, None);
    let width = scaled_dim(src.width(), scale) as usize;
    let height = scaled_dim(src.height(), scale) as usize;
    debug!(width, height, segment, "rasterizing fiscal page");

    let luma = scaled_luma(&src, width as u32, height as u32, FilterType::CatmullRom);

    let mut chunks = Vec::new();
    let mut y = 0usize;
    while y < height {
        let rows = segment.min(height - y);
        let mut slice = luma[y * width..(y + rows) * width].to_vec();
        dither(&mut slice, width, rows);
        let frame = raster_frame(&slice, width, rows);
        if !frame.is_empty() {
            chunks.push(frame);
        }
        y += rows;
    }
    chunks
}

fn load_bitmap(bytes: &[u8]) -> Option<DynamicImage> {
    match image::load_from_memory(bytes) {
        Ok(img) if img.width() > 0 && img.height() > 0 => Some(img),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "image decode failed");
            None
        }
    }
}

/// Uniform scale factor so `(w, h)` fits the given box; never above 1.
fn fit_scale(w: u32, h: u32, max_w: u32, max_h: Option<u32>) -> f64 {
    let mut scale = f64::from(max_w) / f64::from(w.max(1));
    if let Some(mh) = max_h {
        scale = scale.min(f64::from(mh) / f64::from(h.max(1)));
    }
    scale.min(1.0)
}

fn scaled_dim(dim: u32, scale: f64) -> u32 {
    ((f64::from(dim) * scale).round() as u32).max(1)
}

/// Resample onto an opaque white canvas and return the luma buffer.
///
/// Transparent source pixels must render white, never black, so each
/// pixel is alpha-composited over white before the luma conversion.
fn scaled_luma(img: &DynamicImage, width: u32, height: u32, filter: FilterType) -> Vec<f64> {
    let resized = img.resize_exact(width, height, filter).to_rgba8();
    let mut luma = Vec::with_capacity((width as usize) * (height as usize));
    for pixel in resized.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = f64::from(a) / 255.0;
        let r = f64::from(r) * alpha + 255.0 * (1.0 - alpha);
        let g = f64::from(g) * alpha + 255.0 * (1.0 - alpha);
        let b = f64::from(b) * alpha + 255.0 * (1.0 - alpha);
        luma.push((r * 299.0 + g * 587.0 + b * 114.0) / 1000.0);
    }
    luma
}

/// Floyd-Steinberg error diffusion, in place.
///
/// Each entry ends at exactly 0.0 or 255.0; quantization error flows to
/// the unprocessed neighbors with weights 7/16 (right), 3/16
/// (below-left), 5/16 (below) and 1/16 (below-right), skipping
/// out-of-bounds positions.
fn dither(luma: &mut [f64], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = luma[idx].clamp(0.0, 255.0);
            let new = if old < DITHER_THRESHOLD { 0.0 } else { 255.0 };
            luma[idx] = new;
            let err = old - new;

            if x + 1 < width {
                luma[idx + 1] += err * (7.0 / 16.0);
            }
            if y + 1 < height {
                if x > 0 {
                    luma[idx + width - 1] += err * (3.0 / 16.0);
                }
                luma[idx + width] += err * (5.0 / 16.0);
                if x + 1 < width {
                    luma[idx + width + 1] += err * (1.0 / 16.0);
                }
            }
        }
    }
}

/// Pack a dithered luma buffer into one `GS v 0` raster frame.
///
/// Header: mode 0, width in bytes (LE16), height (LE16). Rows are packed
/// 8 pixels per byte, MSB first, the final byte of each row zero-padded.
fn raster_frame(luma: &[f64], width: usize, height: usize) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let width_bytes = width.div_ceil(8);
    let mut out = Vec::with_capacity(8 + width_bytes * height);
    out.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    out.push((width_bytes & 0xFF) as u8);
    out.push(((width_bytes >> 8) & 0xFF) as u8);
    out.push((height & 0xFF) as u8);
    out.push(((height >> 8) & 0xFF) as u8);

    for y in 0..height {
        for xb in 0..width_bytes {
            let mut slice = 0u8;
            for bit in 0..8 {
                let x = xb * 8 + bit;
                if x >= width {
                    continue;
                }
                if luma[y * width + x] < 128.0 {
                    slice |= 0x80 >> bit;
                }
            }
            out.push(slice);
        }
    }
    out
}
