//! src/transforms/mod.rs
//!
//! The transformation capabilities behind each [`crate::Technique`].
//!
//! # Module Organization
//!
//! ```text
//! transforms/
//! ├── geometric.rs     → Spatial transformations (rotation, affine, crop,
//! │                      scaling, projective warp, flips)
//! ├── photometric.rs   → Color and appearance (brightness, contrast)
//! └── noise.rs         → Additive noise families
//! ```
//!
//! Every capability has the same contract: it takes one image, draws its own
//! random parameters from the caller's RNG, and returns a new image resized
//! to the batch's [`TargetShape`](crate::TargetShape). That final resize is
//! what keeps the batch shape invariant intact no matter which chain of
//! transformations ran.

pub mod geometric;
pub mod noise;
pub mod photometric;

use crate::batch::TargetShape;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Resizes an image back to the batch's reference shape. No-op when the
/// image already matches.
pub(crate) fn fit_to(image: RgbImage, target: TargetShape) -> RgbImage {
    if target.matches(&image) {
        image
    } else {
        imageops::resize(&image, target.width, target.height, FilterType::Triangle)
    }
}
