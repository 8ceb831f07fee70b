//! End-to-end augmentation behaviour.
//!
//! Tests cover:
//! - Default sizing (40% of the batch, rounded down)
//! - Shape invariant across arbitrary transformation chains
//! - Involutive flip composition through the real capability
//! - Seeded reproducibility

mod common;
use common::{gradient_batch, gradient_image};

use anyhow::Result;
use batch_augmentation::{
    AugmentConfig, AugmentSize, Augmenter, ImageBatch, Technique, TechniqueSet,
};
use image::imageops;

#[test]
fn test_default_size_augments_forty_percent() -> Result<()> {
    let engine = Augmenter::new(AugmentConfig::builder().seed(42).build())?;

    let mut batch = gradient_batch(10, 24, 24);
    let summary = engine.augment(&mut batch)?;

    let mut indices: Vec<_> = summary.augmented_indices().collect();
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len(), 4); // floor(0.4 * 10)
    Ok(())
}

#[test]
fn test_default_size_rounds_down_on_odd_lengths() -> Result<()> {
    let engine = Augmenter::new(AugmentConfig::builder().seed(42).build())?;

    let mut batch = gradient_batch(7, 16, 16);
    let summary = engine.augment(&mut batch)?;
    assert_eq!(summary.len(), 2); // floor(0.4 * 7)
    Ok(())
}

#[test]
fn test_unselected_slots_are_bit_identical() -> Result<()> {
    let engine = Augmenter::new(
        AugmentConfig::builder()
            .size_of_aug(AugmentSize::Count(3))
            .seed(9)
            .build(),
    )?;

    let mut batch = gradient_batch(8, 20, 20);
    let before: Vec<_> = batch.images().to_vec();
    let summary = engine.augment(&mut batch)?;

    let selected: Vec<_> = summary.augmented_indices().collect();
    for (index, original) in before.iter().enumerate() {
        if !selected.contains(&index) {
            assert_eq!(
                original.as_raw(),
                batch.get(index).unwrap().as_raw(),
                "unselected slot {} was modified",
                index
            );
        }
    }
    Ok(())
}

#[test]
fn test_all_outputs_keep_reference_shape() -> Result<()> {
    // Full catalog, long chains: whatever geometry ran, every image must
    // come back at the reference shape.
    let engine = Augmenter::new(
        AugmentConfig::builder()
            .size_of_aug(AugmentSize::Fraction(1.0))
            .num_of_trans(4)
            .seed(1234)
            .build(),
    )?;

    let mut batch = gradient_batch(6, 33, 21);
    let shape = batch.reference_shape();
    engine.augment(&mut batch)?;

    for image in batch.images() {
        assert_eq!(image.dimensions(), (shape.width, shape.height));
    }
    Ok(())
}

#[test]
fn test_triple_horizontal_flip_equals_single_flip() -> Result<()> {
    // Exercises the real capability three times; the flip is involutive at
    // full size, so three applications equal one.
    let engine = Augmenter::new(
        AugmentConfig::builder()
            .size_of_aug(AugmentSize::Count(1))
            .techniques(TechniqueSet::only([Technique::HorizontalFlip]))
            .num_of_trans(3)
            .seed(5)
            .build(),
    )?;

    let image = gradient_image(12, 8, 0);
    let mut batch = ImageBatch::new(vec![image.clone()])?;
    let summary = engine.augment(&mut batch)?;

    assert_eq!(summary.len(), 1);
    assert_eq!(summary.applied[0].chain, vec![Technique::HorizontalFlip; 3]);

    let expected = imageops::flip_horizontal(&image);
    assert_eq!(batch.get(0).unwrap().as_raw(), expected.as_raw());
    Ok(())
}

#[test]
fn test_seeded_runs_are_reproducible() -> Result<()> {
    let build = || {
        Augmenter::new(
            AugmentConfig::builder()
                .size_of_aug(AugmentSize::Count(4))
                .num_of_trans(3)
                .seed(777)
                .build(),
        )
    };

    let mut first = gradient_batch(9, 18, 18);
    let mut second = gradient_batch(9, 18, 18);
    let summary_a = build()?.augment(&mut first)?;
    let summary_b = build()?.augment(&mut second)?;

    let indices_a: Vec<_> = summary_a.augmented_indices().collect();
    let indices_b: Vec<_> = summary_b.augmented_indices().collect();
    assert_eq!(indices_a, indices_b);

    for (a, b) in first.images().iter().zip(second.images()) {
        assert_eq!(a.as_raw(), b.as_raw());
    }
    Ok(())
}
