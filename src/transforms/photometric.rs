use crate::batch::TargetShape;
use crate::transforms::fit_to;
use anyhow::Result;
use image::{imageops, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// Brightness
// ============================================================================

/// Shifts every channel up by a value drawn uniformly from [0, 40],
/// saturating at 255.
pub(crate) fn brightness(
    image: &RgbImage,
    target: TargetShape,
    rng: &mut StdRng,
) -> Result<RgbImage> {
    let delta = rng.random_range(0..=40i32);
    Ok(fit_to(imageops::brighten(image, delta), target))
}

// ============================================================================
// Contrast
// ============================================================================

/// Linearly rescales intensities between two randomly drawn percentiles:
/// the low cut uniform in [0, 40], the high cut uniform in [60, 100].
/// Values at or below the low percentile map to 0, values at or above the
/// high percentile map to 255.
pub(crate) fn contrast(
    image: &RgbImage,
    target: TargetShape,
    rng: &mut StdRng,
) -> Result<RgbImage> {
    let low_pct = rng.random_range(0.0..40.0f64);
    let high_pct = rng.random_range(60.0..100.0f64);

    let mut histogram = [0u64; 256];
    for value in image.as_raw() {
        histogram[*value as usize] += 1;
    }
    let total = image.as_raw().len() as u64;

    let v_min = percentile_value(&histogram, total, low_pct);
    let v_max = percentile_value(&histogram, total, high_pct);
    if v_max <= v_min {
        // Flat window; rescaling would divide by zero.
        return Ok(fit_to(image.clone(), target));
    }

    let range = f64::from(v_max - v_min);
    let rescaled = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Rgb([
            rescale_channel(p[0], v_min, range),
            rescale_channel(p[1], v_min, range),
            rescale_channel(p[2], v_min, range),
        ])
    });
    Ok(fit_to(rescaled, target))
}

/// Smallest sample value whose cumulative histogram count reaches the
/// requested percentile.
fn percentile_value(histogram: &[u64; 256], total: u64, percentile: f64) -> u8 {
    let threshold = (total as f64 * percentile / 100.0).ceil() as u64;
    let mut cumulative = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        cumulative += count;
        if cumulative >= threshold {
            return value as u8;
        }
    }
    255
}

fn rescale_channel(value: u8, v_min: u8, range: f64) -> u8 {
    let scaled = (f64::from(value) - f64::from(v_min)) * 255.0 / range;
    scaled.clamp(0.0, 255.0) as u8
}
