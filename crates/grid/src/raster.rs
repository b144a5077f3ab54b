//! Pixel-level operations on the composite canvas.

use image::{Rgba, RgbaImage};

use crate::layout::{Axis, LineSegment};

/// Replace R, G and B of every pixel with their mean; alpha is untouched.
///
/// Applying this to an already gray image is a no-op, but it is never
/// reversible, so callers must redraw from the source to get colour back.
pub fn apply_grayscale(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let mean = ((u16::from(r) + u16::from(g) + u16::from(b)) as f32 / 3.0).round() as u8;
        pixel.0[0] = mean;
        pixel.0[1] = mean;
        pixel.0[2] = mean;
    }
}

/// Source-over blend of an opaque colour at `alpha` onto `dst`.
pub fn blend_pixel(dst: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = f32::from(dst.0[3]) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let src = f32::from(rgb[c]);
        let under = f32::from(dst.0[c]);
        let value = (src * alpha + under * dst_alpha * (1.0 - alpha)) / out_alpha;
        dst.0[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Length of the overlap between pixel `[p, p + 1)` and `[lo, hi)`.
fn coverage(p: u32, lo: f32, hi: f32) -> f32 {
    let start = (p as f32).max(lo);
    let end = (p as f32 + 1.0).min(hi);
    (end - start).max(0.0)
}

/// Stroke `segment` as a band `width` pixels wide centred on its position.
///
/// Edge pixels receive fractional coverage, so thin lines at fractional
/// positions are anti-aliased rather than snapped.
pub fn stroke_line(
    image: &mut RgbaImage,
    segment: &LineSegment,
    width: f32,
    rgb: [u8; 3],
    opacity: f32,
) {
    let (img_w, img_h) = image.dimensions();
    let half = width.max(0.0) / 2.0;
    let lo = segment.position - half;
    let hi = segment.position + half;

    let (across_len, along_len) = match segment.axis {
        Axis::Vertical => (img_w, img_h),
        Axis::Horizontal => (img_h, img_w),
    };
    if across_len == 0 || along_len == 0 || hi <= 0.0 {
        return;
    }

    let first = lo.floor().max(0.0) as u32;
    let last = (hi.ceil().max(0.0) as u32).min(across_len);
    let along_start = segment.start.max(0.0).floor() as u32;
    let along_end = (segment.end.max(0.0).ceil() as u32).min(along_len);

    for across in first..last {
        let alpha = opacity * coverage(across, lo, hi);
        if alpha <= 0.0 {
            continue;
        }
        for along in along_start..along_end {
            let (x, y) = match segment.axis {
                Axis::Vertical => (across, along),
                Axis::Horizontal => (along, across),
            };
            blend_pixel(image.get_pixel_mut(x, y), rgb, alpha);
        }
    }
}
