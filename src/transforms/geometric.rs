use crate::batch::TargetShape;
use crate::transforms::fit_to;
use anyhow::{anyhow, ensure, Result};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate, warp, Interpolation, Projection};
use rand::rngs::StdRng;
use rand::Rng;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Padding applied on each side before a random crop.
const CROP_PAD: u32 = 40;

// ============================================================================
// Rotation
// ============================================================================

/// Rotates the image about a point drawn within a small radius of the
/// center, with an angle uniform in [-180, 180] degrees.
pub(crate) fn rotation(
    image: &RgbImage,
    target: TargetShape,
    rng: &mut StdRng,
) -> Result<RgbImage> {
    let (width, height) = image.dimensions();

    // Keep the rotation center inside the image for small inputs.
    let max_radius = (width.min(height) / 2).min(30);
    let radius = rng.random_range(0..=max_radius) as f32;

    let mid_x = width as f32 / 2.0;
    let mid_y = height as f32 / 2.0;
    let center = (
        rng.random_range(mid_x - radius..=mid_x + radius),
        rng.random_range(mid_y - radius..=mid_y + radius),
    );

    let angle: f32 = rng.random_range(-180.0..180.0);
    let rotated = rotate(image, center, angle.to_radians(), Interpolation::Bilinear, BLACK);
    Ok(fit_to(rotated, target))
}

// ============================================================================
// Affine
// ============================================================================

/// Translation-dominant affine warp: the corner triangle is mapped to fixed
/// fractional offsets, each jittered per call.
pub(crate) fn affine(image: &RgbImage, target: TargetShape, rng: &mut StdRng) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    ensure!(
        width > 1 && height > 1,
        "Affine warp requires an image of at least 2x2 (got {}x{})",
        width,
        height
    );

    let w = (width - 1) as f32;
    let h = (height - 1) as f32;

    let mut jitter = |base: f32| base + rng.random_range(-0.05..0.05f32);

    // Source corner triangle (0,0) (w,0) (0,h) mapped to offset fractions.
    let dst = [
        (0.0, jitter(0.2) * h),
        (jitter(0.9) * w, jitter(0.3) * h),
        (jitter(0.15) * w, jitter(0.7) * h),
    ];

    // Closed-form affine coefficients for that corner correspondence.
    let matrix = [
        (dst[1].0 - dst[0].0) / w,
        (dst[2].0 - dst[0].0) / h,
        dst[0].0,
        (dst[1].1 - dst[0].1) / w,
        (dst[2].1 - dst[0].1) / h,
        dst[0].1,
        0.0,
        0.0,
        1.0,
    ];

    let projection = Projection::from_matrix(matrix)
        .ok_or_else(|| anyhow!("Degenerate affine mapping for {}x{} image", width, height))?;
    let warped = warp(image, &projection, Interpolation::Bilinear, BLACK);
    Ok(fit_to(warped, target))
}

// ============================================================================
// Crop
// ============================================================================

#[derive(Clone, Copy)]
enum PadMode {
    Constant,
    Edge,
    Reflect,
}

const PAD_MODES: [PadMode; 3] = [PadMode::Constant, PadMode::Edge, PadMode::Reflect];

/// Pads the image by [`CROP_PAD`] pixels on each side with a randomly chosen
/// pad mode, then takes a random crop of the original size.
pub(crate) fn crop(image: &RgbImage, target: TargetShape, rng: &mut StdRng) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let mode = PAD_MODES[rng.random_range(0..PAD_MODES.len())];
    let padded = pad_image(image, CROP_PAD, mode);

    let offset_x = rng.random_range(0..=2 * CROP_PAD);
    let offset_y = rng.random_range(0..=2 * CROP_PAD);
    let cropped = imageops::crop_imm(&padded, offset_x, offset_y, width, height).to_image();
    Ok(fit_to(cropped, target))
}

fn pad_image(image: &RgbImage, pad: u32, mode: PadMode) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
        let src_x = x as i64 - pad as i64;
        let src_y = y as i64 - pad as i64;
        let inside =
            src_x >= 0 && src_y >= 0 && (src_x as u32) < width && (src_y as u32) < height;
        match mode {
            PadMode::Constant if !inside => BLACK,
            PadMode::Constant => *image.get_pixel(src_x as u32, src_y as u32),
            PadMode::Edge => *image.get_pixel(clamp_index(src_x, width), clamp_index(src_y, height)),
            PadMode::Reflect => {
                *image.get_pixel(reflect_index(src_x, width), reflect_index(src_y, height))
            }
        }
    })
}

fn clamp_index(index: i64, len: u32) -> u32 {
    index.clamp(0, len as i64 - 1) as u32
}

/// Mirrors an out-of-range coordinate back into `[0, len)` without
/// duplicating the border sample. Loops because the padding may exceed the
/// image extent for small inputs.
fn reflect_index(index: i64, len: u32) -> u32 {
    let len = len as i64;
    let mut index = index;
    loop {
        if index < 0 {
            index = -index - 1;
        } else if index >= len {
            index = 2 * len - index - 1;
        } else {
            return index as u32;
        }
    }
}

// ============================================================================
// Scaling
// ============================================================================

/// Channel-wise downscale to a quarter of the linear size, then resize back
/// to the target shape. The round trip discards high-frequency detail.
pub(crate) fn scaling(
    image: &RgbImage,
    target: TargetShape,
    _rng: &mut StdRng,
) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let quarter_w = (width / 4).max(1);
    let quarter_h = (height / 4).max(1);

    let channels: Vec<GrayImage> = (0..3)
        .map(|channel| {
            let plane: GrayImage = ImageBuffer::from_fn(width, height, |x, y| {
                Luma([image.get_pixel(x, y)[channel]])
            });
            imageops::resize(&plane, quarter_w, quarter_h, FilterType::Triangle)
        })
        .collect();

    let stacked = RgbImage::from_fn(quarter_w, quarter_h, |x, y| {
        Rgb([
            channels[0].get_pixel(x, y)[0],
            channels[1].get_pixel(x, y)[0],
            channels[2].get_pixel(x, y)[0],
        ])
    });
    Ok(fit_to(stacked, target))
}

// ============================================================================
// Geometrical (projective warp)
// ============================================================================

/// Projective warp estimated from the image corners mapped to a randomly
/// inward-jittered quad. Jitter only moves corners inward, so the
/// destination quad stays convex and the projection stays invertible.
pub(crate) fn geometrical(
    image: &RgbImage,
    target: TargetShape,
    rng: &mut StdRng,
) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    ensure!(
        width > 1 && height > 1,
        "Projective warp requires an image of at least 2x2 (got {}x{})",
        width,
        height
    );

    let w = (width - 1) as f32;
    let h = (height - 1) as f32;
    let mut pull = |max_fraction: f32| rng.random_range(0.0..max_fraction);

    let from = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let to = [
        (pull(0.25) * w, pull(0.25) * h),
        (w - pull(0.25) * w, pull(0.25) * h),
        (w - pull(0.25) * w, h - pull(0.25) * h),
        (pull(0.25) * w, h - pull(0.25) * h),
    ];

    let projection = Projection::from_control_points(from, to)
        .ok_or_else(|| anyhow!("Degenerate projective control points for {}x{} image", width, height))?;
    let warped = warp(image, &projection, Interpolation::Bilinear, BLACK);
    Ok(fit_to(warped, target))
}

// ============================================================================
// Flips
// ============================================================================

pub(crate) fn horizontal_flip(
    image: &RgbImage,
    target: TargetShape,
    _rng: &mut StdRng,
) -> Result<RgbImage> {
    Ok(fit_to(imageops::flip_horizontal(image), target))
}

pub(crate) fn vertical_flip(
    image: &RgbImage,
    target: TargetShape,
    _rng: &mut StdRng,
) -> Result<RgbImage> {
    Ok(fit_to(imageops::flip_vertical(image), target))
}
