use crate::batch::TargetShape;
use crate::transforms::{geometric, noise, photometric};
use anyhow::Result;
use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// The closed catalog of transformation capabilities.
///
/// Each variant maps one image to one transformed image resized to the
/// batch's reference shape, drawing its own random parameters per call
/// (angle, offsets, noise family, crop window, brightness delta, contrast
/// percentile window). A variant holds no state; randomness comes entirely
/// from the RNG the engine threads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    Rotation,
    Affine,
    Noise,
    Brightness,
    Crop,
    Contrast,
    HorizontalFlip,
    VerticalFlip,
    Scaling,
    Geometrical,
}

impl Technique {
    /// Every technique, in catalog order. Used for introspection and as the
    /// default active set.
    pub const ALL: [Technique; 10] = [
        Technique::Rotation,
        Technique::Affine,
        Technique::Noise,
        Technique::Brightness,
        Technique::Crop,
        Technique::Contrast,
        Technique::HorizontalFlip,
        Technique::VerticalFlip,
        Technique::Scaling,
        Technique::Geometrical,
    ];

    /// Stable catalog name, matching the names accepted by
    /// [`TechniqueSet::from_names`].
    pub fn name(&self) -> &'static str {
        match self {
            Technique::Rotation => "Rotation",
            Technique::Affine => "Affine",
            Technique::Noise => "Noise",
            Technique::Brightness => "Brightness",
            Technique::Crop => "Crop",
            Technique::Contrast => "Contrast",
            Technique::HorizontalFlip => "Horizontal_flip",
            Technique::VerticalFlip => "Vertical_flip",
            Technique::Scaling => "Scaling",
            Technique::Geometrical => "Geometrical",
        }
    }

    /// Looks a technique up by catalog name. `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Technique> {
        Technique::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Applies this technique to one image, returning a new image resized
    /// to `target`.
    pub fn apply(&self, image: &RgbImage, target: TargetShape, rng: &mut StdRng) -> Result<RgbImage> {
        match self {
            Technique::Rotation => geometric::rotation(image, target, rng),
            Technique::Affine => geometric::affine(image, target, rng),
            Technique::Noise => noise::noise(image, target, rng),
            Technique::Brightness => photometric::brightness(image, target, rng),
            Technique::Crop => geometric::crop(image, target, rng),
            Technique::Contrast => photometric::contrast(image, target, rng),
            Technique::HorizontalFlip => geometric::horizontal_flip(image, target, rng),
            Technique::VerticalFlip => geometric::vertical_flip(image, target, rng),
            Technique::Scaling => geometric::scaling(image, target, rng),
            Technique::Geometrical => geometric::geometrical(image, target, rng),
        }
    }
}

/// Catalog names in catalog order, for introspection and help output.
pub fn list_available() -> impl Iterator<Item = &'static str> {
    Technique::ALL.iter().map(Technique::name)
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The active subset of the catalog an augmentation run draws from.
///
/// Construction never fails; an empty set is representable but rejected
/// when an [`Augmenter`](crate::Augmenter) is built from it, so the
/// emptiness check happens once, before any work.
#[derive(Debug, Clone)]
pub struct TechniqueSet {
    active: Vec<Technique>,
}

impl TechniqueSet {
    /// The full catalog.
    pub fn all() -> Self {
        Self {
            active: Technique::ALL.to_vec(),
        }
    }

    /// An explicit subset. Duplicates are collapsed; first occurrence wins
    /// the ordering.
    pub fn only(techniques: impl IntoIterator<Item = Technique>) -> Self {
        let mut active = Vec::new();
        for technique in techniques {
            if !active.contains(&technique) {
                active.push(technique);
            }
        }
        Self { active }
    }

    /// Builds a set from catalog names. Unrecognized names are silently
    /// ignored, mirroring the historical behaviour of the string-keyed
    /// registry; an all-unknown list therefore yields an empty set, which
    /// fails at engine construction.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::only(names.into_iter().filter_map(Technique::from_name))
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, technique: Technique) -> bool {
        self.active.contains(&technique)
    }

    /// Draws one technique uniformly at random from the active set.
    pub(crate) fn choose(&self, rng: &mut StdRng) -> Technique {
        *self
            .active
            .choose(rng)
            .expect("technique set validated non-empty at engine construction")
    }
}

impl Default for TechniqueSet {
    fn default() -> Self {
        Self::all()
    }
}
