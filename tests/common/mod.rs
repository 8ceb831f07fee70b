//! Shared fixtures for the integration tests.

use batch_augmentation::ImageBatch;
use image::{Rgb, RgbImage};

/// A gradient image so flips and warps produce observable pixel changes.
/// `offset` shifts the blue channel to make each batch member distinct.
pub fn gradient_image(width: u32, height: u32, offset: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            offset,
        ])
    })
}

/// A batch of `len` distinct gradient images sharing one shape.
pub fn gradient_batch(len: usize, width: u32, height: u32) -> ImageBatch {
    let images = (0..len)
        .map(|i| gradient_image(width, height, i as u8))
        .collect();
    ImageBatch::new(images).expect("fixture batch is well-formed")
}
