//! Structure of Arrays (`SoA`) dataset of decoded events.
//!
//! A [`Dataset`] stores the four per-event outputs in parallel `ndarray`
//! containers. Row `i` of every array describes the same event. Datasets are
//! only created through [`DatasetBuilder::build`] or [`Dataset::from_parts`],
//! both of which check that the arrays agree on the event count.

use crate::error::{Error, Result};
use crate::layout::{IMAGE_LEN, IMAGE_SIDE};
use crate::record::{EventLabel, Record};
use ndarray::{Array1, Array2, Array3, ArrayView2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded events in `SoA` layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset {
    images: Array3<f64>,
    energies: Array2<f64>,
    positions: Array2<f64>,
    labels: Array1<u8>,
}

impl Dataset {
    /// Assembles a dataset from existing arrays.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the arrays do not have the shapes
    /// `(n, 16, 16)`, `(n, 2)`, `(n, 4)` and `(n)` for a common `n`.
    pub fn from_parts(
        images: Array3<f64>,
        energies: Array2<f64>,
        positions: Array2<f64>,
        labels: Array1<u8>,
    ) -> Result<Self> {
        let n = labels.len();
        if images.dim() != (n, IMAGE_SIDE, IMAGE_SIDE) {
            return Err(Error::ShapeMismatch(format!(
                "images have shape {:?}, expected ({n}, {IMAGE_SIDE}, {IMAGE_SIDE})",
                images.shape()
            )));
        }
        if energies.dim() != (n, 2) {
            return Err(Error::ShapeMismatch(format!(
                "energies have shape {:?}, expected ({n}, 2)",
                energies.shape()
            )));
        }
        if positions.dim() != (n, 4) {
            return Err(Error::ShapeMismatch(format!(
                "positions have shape {:?}, expected ({n}, 4)",
                positions.shape()
            )));
        }
        Ok(Self {
            images,
            energies,
            positions,
            labels,
        })
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the dataset holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Detector images, shape `(n, 16, 16)`.
    #[must_use]
    pub fn images(&self) -> &Array3<f64> {
        &self.images
    }

    /// `(energy1, energy2)` per event, shape `(n, 2)`.
    #[must_use]
    pub fn energies(&self) -> &Array2<f64> {
        &self.energies
    }

    /// `(x1, y1, x2, y2)` per event, shape `(n, 4)`.
    #[must_use]
    pub fn positions(&self) -> &Array2<f64> {
        &self.positions
    }

    /// Integer labels per event, 0 for singles and 1 for doubles.
    #[must_use]
    pub fn labels(&self) -> &Array1<u8> {
        &self.labels
    }

    /// Returns the image of event `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn image(&self, index: usize) -> ArrayView2<'_, f64> {
        self.images.index_axis(ndarray::Axis(0), index)
    }

    /// Counts the events carrying `label`.
    #[must_use]
    pub fn count_label(&self, label: EventLabel) -> usize {
        let target = label.as_u8();
        self.labels.iter().filter(|&&l| l == target).count()
    }

    /// Consumes the dataset, returning `(images, energies, positions, labels)`.
    #[must_use]
    pub fn into_parts(self) -> (Array3<f64>, Array2<f64>, Array2<f64>, Array1<u8>) {
        (self.images, self.energies, self.positions, self.labels)
    }
}

/// Accumulates records into flat buffers, then freezes them into a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    pixels: Vec<f64>,
    energies: Vec<f64>,
    positions: Vec<f64>,
    labels: Vec<u8>,
}

impl DatasetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with room for `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pixels: Vec::with_capacity(capacity * IMAGE_LEN),
            energies: Vec::with_capacity(capacity * 2),
            positions: Vec::with_capacity(capacity * 4),
            labels: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of events pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no events were pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Appends one event.
    pub fn push(&mut self, record: &Record) {
        self.pixels.extend_from_slice(&record.image);
        self.energies.extend_from_slice(&record.energy);
        self.positions.extend_from_slice(&record.position);
        self.labels.push(record.label.as_u8());
    }

    /// Reshapes the accumulated buffers into the final arrays.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the buffers are inconsistent, which
    /// cannot happen when every event went through [`DatasetBuilder::push`].
    pub fn build(self) -> Result<Dataset> {
        let n = self.labels.len();
        let images = Array3::from_shape_vec((n, IMAGE_SIDE, IMAGE_SIDE), self.pixels)
            .map_err(|e| Error::ShapeMismatch(format!("images: {e}")))?;
        let energies = Array2::from_shape_vec((n, 2), self.energies)
            .map_err(|e| Error::ShapeMismatch(format!("energies: {e}")))?;
        let positions = Array2::from_shape_vec((n, 4), self.positions)
            .map_err(|e| Error::ShapeMismatch(format!("positions: {e}")))?;
        Ok(Dataset {
            images,
            energies,
            positions,
            labels: Array1::from_vec(self.labels),
        })
    }
}

impl<'a> Extend<&'a Record> for DatasetBuilder {
    fn extend<I: IntoIterator<Item = &'a Record>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Reshapes a 256-value pixel vector into a 16x16 row-major grid.
///
/// # Errors
/// Returns [`Error::ShapeMismatch`] if `pixels` does not hold exactly 256 values.
pub fn reshape_image(pixels: &[f64]) -> Result<Array2<f64>> {
    Array2::from_shape_vec((IMAGE_SIDE, IMAGE_SIDE), pixels.to_vec())
        .map_err(|e| Error::ShapeMismatch(format!("image of {} values: {e}", pixels.len())))
}

/// Flattens a grid back into row-major order.
#[must_use]
pub fn flatten_image(image: &ArrayView2<'_, f64>) -> Vec<f64> {
    image.iter().copied().collect()
}
