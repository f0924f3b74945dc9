//! Global min-max normalization of detector images.
//!
//! Statistics are taken over every pixel of every image at once, never per
//! image, and each pixel `x` is mapped to `(x - mean) / (max - min)`.

use crate::error::{Error, Result};
use ndarray::{Array, ArrayBase, Data, Dimension, Ix3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel statistics of a whole image set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageStats {
    /// Smallest pixel value.
    pub min: f64,
    /// Largest pixel value.
    pub max: f64,
    /// Mean over all pixels.
    pub mean: f64,
}

impl ImageStats {
    /// Computes min, max and mean over all elements of `images`.
    ///
    /// NaN pixels propagate into all three values.
    ///
    /// # Errors
    /// Returns [`Error::EmptyImageSet`] if `images` has no elements.
    pub fn compute<S, D>(images: &ArrayBase<S, D>) -> Result<Self>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let mean = images.mean().ok_or(Error::EmptyImageSet)?;
        let (min, max) = images.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &x| {
                if x.is_nan() || lo.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (lo.min(x), hi.max(x))
                }
            },
        );
        Ok(Self { min, max, mean })
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Rescales `images` with these statistics.
    ///
    /// The statistics are not recomputed, so applying the same stats to an
    /// already normalized set shifts it again.
    ///
    /// # Errors
    /// Returns [`Error::DegenerateRange`] unless `max - min` is strictly
    /// positive and finite and `mean` is finite.
    pub fn apply<S, D>(&self, images: &ArrayBase<S, D>) -> Result<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let range = self.range();
        if !range.is_finite() || range <= 0.0 || !self.mean.is_finite() {
            return Err(Error::DegenerateRange {
                min: self.min,
                max: self.max,
            });
        }
        let mean = self.mean;
        Ok(images.mapv(|x| (x - mean) / range))
    }
}

/// Normalized images together with the statistics that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImages<D: Dimension = Ix3> {
    /// Rescaled pixels, same shape as the input.
    pub images: Array<f64, D>,
    /// Statistics of the input set.
    pub stats: ImageStats,
}

/// Normalizes an image set using its own global statistics.
///
/// # Errors
/// Returns [`Error::EmptyImageSet`] for an empty set and
/// [`Error::DegenerateRange`] when every pixel has the same value or the
/// statistics are not finite.
pub fn normalize<S, D>(images: &ArrayBase<S, D>) -> Result<NormalizedImages<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let stats = ImageStats::compute(images)?;
    let images = stats.apply(images)?;
    Ok(NormalizedImages { images, stats })
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array3};

    #[test]
    fn test_two_by_two_scenario() {
        let images = array![[0.0, 0.0], [10.0, 10.0]];
        let normalized = normalize(&images).unwrap();
        assert_eq!(normalized.stats.mean, 5.0);
        assert_eq!(normalized.stats.max, 10.0);
        assert_eq!(normalized.stats.min, 0.0);
        assert_eq!(normalized.images, array![[-0.5, -0.5], [0.5, 0.5]]);
    }

    #[test]
    fn test_stats_are_global_not_per_image() {
        let mut images = Array3::<f64>::zeros((2, 16, 16));
        images.index_axis_mut(ndarray::Axis(0), 1).fill(4.0);
        let normalized = normalize(&images).unwrap();

        assert_eq!(normalized.stats.mean, 2.0);
        assert_eq!(normalized.stats.range(), 4.0);
        assert_eq!(normalized.images.dim(), (2, 16, 16));
        assert_abs_diff_eq!(normalized.images[[0, 3, 3]], -0.5);
        assert_abs_diff_eq!(normalized.images[[1, 15, 0]], 0.5);
    }

    #[test]
    fn test_constant_images_are_degenerate() {
        let images = Array3::<f64>::from_elem((3, 16, 16), 7.0);
        assert_eq!(
            normalize(&images).unwrap_err(),
            Error::DegenerateRange { min: 7.0, max: 7.0 }
        );
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let images = Array3::<f64>::zeros((0, 16, 16));
        assert_eq!(
            ImageStats::compute(&images).unwrap_err(),
            Error::EmptyImageSet
        );
    }

    #[test]
    fn test_nan_pixel_is_degenerate() {
        let images = array![[0.0, f64::NAN], [1.0, 2.0]];
        let stats = ImageStats::compute(&images).unwrap();
        assert!(stats.min.is_nan() && stats.max.is_nan());
        assert!(matches!(
            stats.apply(&images),
            Err(Error::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_infinite_pixel_is_degenerate() {
        let images = array![[0.0, f64::INFINITY], [1.0, 2.0]];
        assert_eq!(
            normalize(&images).unwrap_err(),
            Error::DegenerateRange {
                min: 0.0,
                max: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_overflowing_range_is_degenerate() {
        let images = array![[-1e308, 1e308], [0.0, 0.0]];
        let stats = ImageStats::compute(&images).unwrap();
        assert!(stats.range().is_infinite());
        assert!(matches!(
            normalize(&images),
            Err(Error::DegenerateRange { .. })
        ));
    }

    #[test]
    #[allow(overflowing_literals)]
    fn test_overflowing_mean_is_degenerate() {
        let images = array![[1.5e308, 1.6e308], [1.7e308, 1.8e308]];
        let stats = ImageStats::compute(&images).unwrap();
        assert!(stats.range().is_finite());
        assert!(stats.mean.is_infinite());
        assert!(matches!(
            stats.apply(&images),
            Err(Error::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_reapplying_original_stats_is_not_idempotent() {
        let images = array![[1.0, 3.0], [5.0, 11.0]];
        let first = normalize(&images).unwrap();
        let twice = first.stats.apply(&first.images).unwrap();
        assert!(twice
            .iter()
            .zip(first.images.iter())
            .any(|(a, b)| (a - b).abs() > 1e-6));
    }

    #[test]
    fn test_recomputed_stats_are_a_fixed_point() {
        let images = array![[1.0, 3.0], [5.0, 11.0]];
        let first = normalize(&images).unwrap();
        let second = normalize(&first.images).unwrap();

        assert_abs_diff_eq!(second.stats.mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(second.stats.range(), 1.0, epsilon = 1e-12);
        for (a, b) in second.images.iter().zip(first.images.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}
