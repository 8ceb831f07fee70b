use anyhow::{ensure, Result};
use image::RgbImage;

/// The reference spatial shape every image in a batch must share.
///
/// Captured from the first image of a batch and threaded explicitly through
/// every transformation call, so independent batches can be augmented
/// concurrently without shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetShape {
    pub width: u32,
    pub height: u32,
}

impl TargetShape {
    /// Reads the shape of an image.
    pub fn of(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// Checks whether an image already has this shape.
    pub fn matches(&self, image: &RgbImage) -> bool {
        image.dimensions() == (self.width, self.height)
    }
}

impl std::fmt::Display for TargetShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An ordered, fixed-length collection of equally-shaped RGB images.
///
/// The first image defines the reference shape; construction rejects empty
/// input, zero-dimension images, and any member whose shape disagrees with
/// the reference. The augmentation engine mutates slots in place via
/// [`ImageBatch::replace`], which re-asserts the shape invariant.
#[derive(Debug, Clone)]
pub struct ImageBatch {
    images: Vec<RgbImage>,
    shape: TargetShape,
}

impl ImageBatch {
    /// Creates a batch from decoded images, validating the shape invariant.
    pub fn new(images: Vec<RgbImage>) -> Result<Self> {
        ensure!(!images.is_empty(), "Batch must contain at least one image");

        let shape = TargetShape::of(&images[0]);
        ensure!(
            shape.width > 0 && shape.height > 0,
            "Batch images must have positive dimensions (got {})",
            shape
        );

        for (index, image) in images.iter().enumerate() {
            ensure!(
                shape.matches(image),
                "Image {} has shape {}, but the batch reference shape is {}",
                index,
                TargetShape::of(image),
                shape
            );
        }

        Ok(Self { images, shape })
    }

    /// Number of images in the batch. Fixed for the batch's lifetime.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The shape shared by every image in the batch.
    pub fn reference_shape(&self) -> TargetShape {
        self.shape
    }

    /// Random-access lookup; `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<&RgbImage> {
        self.images.get(index)
    }

    /// All images, in batch order.
    pub fn images(&self) -> &[RgbImage] {
        &self.images
    }

    /// Overwrites the slot at `index` with a transformed image.
    ///
    /// The replacement must carry the reference shape; the engine resizes
    /// every transformation output before committing it here.
    pub fn replace(&mut self, index: usize, image: RgbImage) -> Result<()> {
        ensure!(
            index < self.images.len(),
            "Index {} out of bounds for batch of length {}",
            index,
            self.images.len()
        );
        ensure!(
            self.shape.matches(&image),
            "Replacement image has shape {}, but the batch reference shape is {}",
            TargetShape::of(&image),
            self.shape
        );
        self.images[index] = image;
        Ok(())
    }

    /// Consumes the batch, yielding the images for downstream use.
    pub fn into_images(self) -> Vec<RgbImage> {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_batch_rejects_empty_input() {
        assert!(ImageBatch::new(vec![]).is_err());
    }

    #[test]
    fn test_batch_rejects_shape_mismatch() {
        let images = vec![RgbImage::new(8, 8), RgbImage::new(8, 9)];
        let err = ImageBatch::new(images).unwrap_err();
        assert!(err.to_string().contains("reference shape"));
    }

    #[test]
    fn test_batch_reference_shape_from_first_image() -> Result<()> {
        let batch = ImageBatch::new(vec![RgbImage::new(12, 7); 3])?;
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.reference_shape(),
            TargetShape {
                width: 12,
                height: 7
            }
        );
        Ok(())
    }

    #[test]
    fn test_replace_enforces_reference_shape() -> Result<()> {
        let mut batch = ImageBatch::new(vec![RgbImage::new(4, 4); 2])?;
        assert!(batch.replace(0, RgbImage::new(4, 4)).is_ok());
        assert!(batch.replace(1, RgbImage::new(5, 4)).is_err());
        assert!(batch.replace(2, RgbImage::new(4, 4)).is_err());
        Ok(())
    }
}
