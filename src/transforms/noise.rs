use crate::batch::TargetShape;
use crate::transforms::fit_to;
use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// The noise families a single `Noise` application can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoiseFamily {
    Gaussian,
    Salt,
    Pepper,
    SaltAndPepper,
    Speckle,
}

const FAMILIES: [NoiseFamily; 5] = [
    NoiseFamily::Gaussian,
    NoiseFamily::Salt,
    NoiseFamily::Pepper,
    NoiseFamily::SaltAndPepper,
    NoiseFamily::Speckle,
];

/// Applies additive noise of a randomly chosen family. Each call picks its
/// own family and strength.
pub(crate) fn noise(image: &RgbImage, target: TargetShape, rng: &mut StdRng) -> Result<RgbImage> {
    let family = FAMILIES[rng.random_range(0..FAMILIES.len())];
    let noisy = match family {
        NoiseFamily::Gaussian => gaussian(image, rng)?,
        NoiseFamily::Salt => impulse(image, rng, Some(Rgb([255; 3]))),
        NoiseFamily::Pepper => impulse(image, rng, Some(Rgb([0; 3]))),
        NoiseFamily::SaltAndPepper => impulse(image, rng, None),
        NoiseFamily::Speckle => speckle(image, rng)?,
    };
    Ok(fit_to(noisy, target))
}

/// Per-channel additive gaussian noise, sigma uniform in [5, 25].
fn gaussian(image: &RgbImage, rng: &mut StdRng) -> Result<RgbImage> {
    let sigma = rng.random_range(5.0..25.0f32);
    let normal = Normal::new(0.0f32, sigma)
        .map_err(|e| anyhow!("Invalid gaussian noise parameters (sigma {}): {}", sigma, e))?;

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let sample = f32::from(*channel) + normal.sample(rng);
            *channel = sample.clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

/// Impulse noise: each pixel is replaced with probability drawn from
/// [0.01, 0.05]. A fixed `value` gives salt or pepper; `None` flips a coin
/// per corrupted pixel (salt-and-pepper).
fn impulse(image: &RgbImage, rng: &mut StdRng, value: Option<Rgb<u8>>) -> RgbImage {
    let amount = rng.random_range(0.01..0.05f64);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        if !rng.random_bool(amount) {
            continue;
        }
        *pixel = value.unwrap_or_else(|| {
            if rng.random_bool(0.5) {
                Rgb([255; 3])
            } else {
                Rgb([0; 3])
            }
        });
    }
    out
}

/// Multiplicative speckle noise: `pixel * (1 + n)` with `n ~ N(0, sigma)`,
/// sigma uniform in [0.05, 0.3].
fn speckle(image: &RgbImage, rng: &mut StdRng) -> Result<RgbImage> {
    let sigma = rng.random_range(0.05..0.3f32);
    let normal = Normal::new(0.0f32, sigma)
        .map_err(|e| anyhow!("Invalid speckle noise parameters (sigma {}): {}", sigma, e))?;

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let sample = f32::from(*channel) * (1.0 + normal.sample(rng));
            *channel = sample.clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}
