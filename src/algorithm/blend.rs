//! Equal-weight blending of canvas channels for visual inspection

use image::GrayImage;
use ndarray::Array2;

use crate::algorithm::compositor::Canvas;
use crate::io::configuration::MAX_INTENSITY;
use crate::spatial::grid::SampleKind;

/// Average all channels with weight `1 / N`; undefined samples contribute 0
///
/// Intensity canvases truncate every weighted term before summing, matching an
/// 8-bit accumulator.
pub fn blend(canvas: &Canvas) -> Array2<f32> {
    let (height, width, channels) = canvas.dim();
    if channels == 0 {
        return Array2::zeros((height, width));
    }
    let weight = 1.0 / channels as f32;

    Array2::from_shape_fn((height, width), |(row, col)| {
        canvas
            .samples_at(row, col)
            .into_iter()
            .map(|sample| {
                let term = weight * sample.unwrap_or(0.0);
                match canvas.kind() {
                    SampleKind::Intensity => term.trunc(),
                    SampleKind::Height => term,
                }
            })
            .sum()
    })
}

/// Convert a blended preview to an 8-bit grayscale image
///
/// Intensity previews are clamped to 0-255. Height previews are min-max
/// normalised; a flat preview maps to black.
pub fn to_preview_image(blended: &Array2<f32>, kind: SampleKind) -> GrayImage {
    let (height, width) = blended.dim();
    let (lo, hi) = blended
        .iter()
        .filter(|value| value.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let value = blended
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(0.0);
        let level = match kind {
            SampleKind::Intensity => value,
            SampleKind::Height if span > 0.0 => (value - lo) / span * MAX_INTENSITY,
            SampleKind::Height => 0.0,
        };
        image::Luma([level.clamp(0.0, MAX_INTENSITY) as u8])
    })
}
