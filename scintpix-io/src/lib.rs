//! scintpix-io: File I/O for scintpix.
//!
//! This crate decodes whitespace-separated scintillator record files into
//! [`scintpix_core::Dataset`] values and loads the training histories
//! produced by the downstream classifier.
//!

mod error;
pub mod history;
mod reader;

pub use error::{Error, Result};
pub use history::TrainingHistory;
pub use reader::{import_data, DecoderConfig, RecordDecoder};
