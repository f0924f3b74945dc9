//! Line-oriented decoder for scintillator record files.
//!

use crate::{Error, Result};
use log::{debug, info};
use scintpix_core::{BalancedSampler, Dataset, DatasetBuilder, EventLabel, Record};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Configuration for [`RecordDecoder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Keep a random, label-balanced selection of this many events instead
    /// of the whole file.
    pub num_samples: Option<usize>,
    /// Seed for the sampling generator (entropy when unset).
    pub seed: Option<u64>,
}

impl DecoderConfig {
    /// Creates a configuration that keeps every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balanced sample size.
    #[must_use]
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    /// Sets the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    /// Returns a configuration error if `num_samples` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == Some(0) {
            return Err(scintpix_core::Error::ConfigError(
                "num_samples must be at least 1".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Decodes whitespace-separated record files into a [`Dataset`].
///
/// Every line, blank ones included, must hold exactly 262 numbers. A final
/// newline does not start another line. Decoding stops at the first bad line;
/// no partial dataset is returned.
#[derive(Debug, Clone, Default)]
pub struct RecordDecoder {
    config: DecoderConfig,
}

impl RecordDecoder {
    /// Creates a decoder that keeps every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the decoder configuration.
    #[must_use]
    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the decoder configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes the file at `path`.
    ///
    /// # Errors
    /// Returns [`Error::FileAccess`] if the file cannot be opened,
    /// [`Error::Io`] if reading fails, and [`Error::Record`] for the first line
    /// that is not a valid record, including blank lines and lines that are
    /// not valid UTF-8.
    pub fn decode<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("decoding {}", path.display());
        self.decode_reader(BufReader::new(file))
    }

    /// Decodes records from any buffered reader.
    ///
    /// # Errors
    /// Same as [`RecordDecoder::decode`], minus the file access error.
    pub fn decode_reader<R: BufRead>(&self, reader: R) -> Result<Dataset> {
        self.config.validate()?;

        let mut sampler = match self.config.num_samples {
            Some(target) => Some(BalancedSampler::new(target, self.config.seed)?),
            None => None,
        };
        let mut builder = DatasetBuilder::new();
        let mut decoded = 0usize;

        for (index, line) in reader.split(b'\n').enumerate() {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let record = Record::parse_bytes(&line).map_err(|source| Error::Record {
                line: index + 1,
                source,
            })?;
            decoded += 1;

            match sampler.as_mut() {
                Some(sampler) => sampler.offer(record),
                None => builder.push(&record),
            }
        }

        if let Some(sampler) = sampler {
            builder.extend(sampler.finish().iter());
        }

        let dataset = builder.build()?;
        info!(
            "decoded {decoded} events, kept {} ({} single, {} double)",
            dataset.len(),
            dataset.count_label(EventLabel::Single),
            dataset.count_label(EventLabel::Double)
        );
        Ok(dataset)
    }
}

/// Decodes every event of the file at `path` with the default configuration.
///
/// # Errors
/// See [`RecordDecoder::decode`].
pub fn import_data<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    RecordDecoder::new().decode(path)
}
