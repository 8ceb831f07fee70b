//! The augmentation engine: given a batch, decide how many and which images
//! to augment, compose a chain of randomly drawn techniques per selected
//! image, and commit each result back into its batch slot.

use crate::batch::ImageBatch;
use crate::config::AugmentConfig;
use crate::technique::Technique;
use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// The ordered chain of techniques applied to one batch slot.
#[derive(Debug, Clone)]
pub struct AppliedChain {
    /// Batch index that was overwritten.
    pub index: usize,
    /// Techniques applied, in composition order.
    pub chain: Vec<Technique>,
}

/// Audit record of one augmentation run: which slots were modified and what
/// ran on each.
#[derive(Debug, Clone)]
pub struct AugmentSummary {
    pub applied: Vec<AppliedChain>,
}

impl AugmentSummary {
    /// Indices that were overwritten, in selection order.
    pub fn augmented_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.applied.iter().map(|record| record.index)
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Applies randomized transformation chains to a subset of a batch.
///
/// Selection, composition, and application run strictly sequentially on the
/// caller's thread. The engine holds no shared state; the batch's reference
/// shape is captured per call and passed into every technique application,
/// so independent batches can be augmented concurrently.
///
/// Configuration errors (zero chain length, empty technique set, infeasible
/// no-repeat combination, out-of-range fraction, oversized count) surface
/// before any slot is touched, leaving the batch unmodified.
#[derive(Debug, Clone)]
pub struct Augmenter {
    config: AugmentConfig,
}

impl Augmenter {
    /// Validates the policy and builds the engine.
    pub fn new(config: AugmentConfig) -> Result<Self> {
        ensure!(
            config.num_of_trans >= 1,
            "Number of transformations per image must be at least 1"
        );
        ensure!(
            !config.techniques.is_empty(),
            "Technique set must contain at least one technique"
        );
        if let crate::config::AugmentSize::Fraction(fraction) = config.size_of_aug {
            ensure!(
                (0.0..=1.0).contains(&fraction),
                "Fractional augmentation size must be in [0.0, 1.0] (got {})",
                fraction
            );
        }
        if !config.repeat {
            ensure!(
                config.num_of_trans <= config.techniques.len(),
                "Cannot compose {} distinct transformations from {} active techniques when repetition is disallowed",
                config.num_of_trans,
                config.techniques.len()
            );
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Augments `batch` in place and returns the audit record.
    ///
    /// Exactly `T` distinct slots are overwritten, where `T` is
    /// the resolved `size_of_aug`; every overwritten image carries the
    /// batch's reference shape; every other slot is left bit-identical.
    pub fn augment(&self, batch: &mut ImageBatch) -> Result<AugmentSummary> {
        let target_count = self.config.size_of_aug.resolve(batch.len())?;
        let shape = batch.reference_shape();
        let mut rng = self.rng();

        // Sampling without replacement: shuffle the full index pool and
        // truncate. Terminates even when target_count == batch.len().
        let mut pool: Vec<usize> = (0..batch.len()).collect();
        pool.shuffle(&mut rng);
        pool.truncate(target_count);

        let mut applied = Vec::with_capacity(target_count);
        for &index in &pool {
            let chain = self.compose_chain(&mut rng);

            let mut working = batch
                .get(index)
                .expect("selected index is within the batch")
                .clone();
            for technique in &chain {
                working = technique.apply(&working, shape, &mut rng)?;
            }

            batch.replace(index, working)?;
            applied.push(AppliedChain { index, chain });
        }

        Ok(AugmentSummary { applied })
    }

    /// Draws `num_of_trans` techniques uniformly from the active set.
    /// When repetition is disallowed, duplicates are redrawn; the loop is
    /// bounded because feasibility was validated at construction.
    fn compose_chain(&self, rng: &mut StdRng) -> Vec<Technique> {
        let mut chain = Vec::with_capacity(self.config.num_of_trans);
        while chain.len() < self.config.num_of_trans {
            let technique = self.config.techniques.choose(rng);
            if !self.config.repeat && chain.contains(&technique) {
                continue;
            }
            chain.push(technique);
        }
        chain
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
