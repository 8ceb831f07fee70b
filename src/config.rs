//! Configuration for augmentation runs.
//!
//! `AugmentConfig` stores the policy parameters that control how a batch is
//! augmented. Validation happens once, when an
//! [`Augmenter`](crate::Augmenter) is built from the config.
//!
//! Example:
//! ```ignore
//! let config = AugmentConfig::builder()
//!     .size_of_aug(AugmentSize::Fraction(0.25))
//!     .techniques(TechniqueSet::from_names(["Rotation", "Noise"]))
//!     .num_of_trans(3)
//!     .repeat(false)
//!     .seed(42)
//!     .build();
//! ```

use crate::technique::TechniqueSet;
use anyhow::{bail, ensure, Result};
use std::str::FromStr;

/// How many images of a batch to augment.
///
/// A tagged union instead of a runtime-inspected value: a `Fraction` is
/// resolved against the batch length (rounded down), a `Count` is taken as
/// an absolute number of images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AugmentSize {
    /// Fraction of the batch length, in [0, 1].
    Fraction(f64),
    /// Absolute number of images; must not exceed the batch length.
    Count(usize),
}

impl AugmentSize {
    /// Resolves to a concrete image count for a batch of `batch_len`
    /// images. An oversized count is an error, never a clamp, so selection
    /// always terminates.
    pub(crate) fn resolve(&self, batch_len: usize) -> Result<usize> {
        match *self {
            AugmentSize::Fraction(fraction) => {
                ensure!(
                    (0.0..=1.0).contains(&fraction),
                    "Fractional augmentation size must be in [0.0, 1.0] (got {})",
                    fraction
                );
                Ok((batch_len as f64 * fraction) as usize)
            }
            AugmentSize::Count(count) => {
                ensure!(
                    count <= batch_len,
                    "Augmentation count ({}) exceeds batch length ({})",
                    count,
                    batch_len
                );
                Ok(count)
            }
        }
    }
}

impl Default for AugmentSize {
    /// 40% of the batch, the historical default.
    fn default() -> Self {
        AugmentSize::Fraction(0.4)
    }
}

impl FromStr for AugmentSize {
    type Err = anyhow::Error;

    /// Parses `"12"` as a count and `"0.25"` as a fraction. Anything
    /// non-numeric (e.g. `"half"`) is a configuration error.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(count) = trimmed.parse::<usize>() {
            return Ok(AugmentSize::Count(count));
        }
        if let Ok(fraction) = trimmed.parse::<f64>() {
            ensure!(
                (0.0..=1.0).contains(&fraction),
                "Fractional augmentation size must be in [0.0, 1.0] (got {})",
                fraction
            );
            return Ok(AugmentSize::Fraction(fraction));
        }
        bail!("Augmentation size must be a count or a fraction, got {:?}", s)
    }
}

/// Policy parameters for one augmentation run.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    /// How many images to augment (defaults to 40% of the batch).
    pub size_of_aug: AugmentSize,
    /// The active transformation subset (defaults to the full catalog).
    pub techniques: TechniqueSet,
    /// Number of transformations composed per selected image (default 5).
    pub num_of_trans: usize,
    /// Whether one image's chain may apply the same technique twice.
    pub repeat: bool,
    /// Seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            size_of_aug: AugmentSize::default(),
            techniques: TechniqueSet::all(),
            num_of_trans: 5,
            repeat: true,
            seed: None,
        }
    }
}

impl AugmentConfig {
    pub fn builder() -> AugmentConfigBuilder {
        AugmentConfigBuilder::default()
    }
}

/// Builder for `AugmentConfig` with method chaining.
#[derive(Default)]
pub struct AugmentConfigBuilder {
    config: AugmentConfig,
}

impl AugmentConfigBuilder {
    /// Set how many images to augment.
    pub fn size_of_aug(mut self, size: AugmentSize) -> Self {
        self.config.size_of_aug = size;
        self
    }

    /// Restrict the active technique set.
    pub fn techniques(mut self, techniques: TechniqueSet) -> Self {
        self.config.techniques = techniques;
        self
    }

    /// Set the number of transformations composed per selected image.
    pub fn num_of_trans(mut self, count: usize) -> Self {
        self.config.num_of_trans = count;
        self
    }

    /// Allow or disallow repeating a technique within one image's chain.
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.config.repeat = repeat;
        self
    }

    /// Seed the engine RNG for reproducible selection and parameters.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> AugmentConfig {
        self.config
    }
}
