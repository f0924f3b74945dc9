//! scintpix-core: Core types for scintillator event data.
//!
//! This crate provides the fixed record layout, the per-event [`Record`],
//! the structure-of-arrays [`Dataset`] with its builder, label-balanced
//! subsampling, and global min-max image normalization.
//!

pub mod dataset;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod record;
pub mod sampling;

pub use dataset::{flatten_image, reshape_image, Dataset, DatasetBuilder};
pub use error::{Error, Result};
pub use normalize::{normalize, ImageStats, NormalizedImages};
pub use record::{EventLabel, Record};
pub use sampling::BalancedSampler;
