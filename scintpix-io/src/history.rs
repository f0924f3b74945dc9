//! Training history produced by the downstream classifier.
//!
//! A history is a JSON object with four equal-length numeric sequences keyed
//! `loss`, `val_loss`, `accuracy` and `val_accuracy`, one entry per epoch.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Per-epoch training metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
    pub accuracy: Vec<f64>,
    pub val_accuracy: Vec<f64>,
}

impl TrainingHistory {
    /// Loads and validates a history from a JSON file.
    ///
    /// # Errors
    /// Returns [`Error::FileAccess`] if the file cannot be opened,
    /// [`Error::Json`] on malformed JSON and [`Error::InvalidHistory`] if the
    /// sequences differ in length.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Loads and validates a history from any reader.
    ///
    /// # Errors
    /// See [`TrainingHistory::from_json_file`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let history: Self = serde_json::from_reader(reader)?;
        history.validate()?;
        Ok(history)
    }

    /// Checks that all four sequences have the same length.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHistory`] naming the first mismatched key.
    pub fn validate(&self) -> Result<()> {
        let epochs = self.loss.len();
        for (name, values) in [
            ("val_loss", &self.val_loss),
            ("accuracy", &self.accuracy),
            ("val_accuracy", &self.val_accuracy),
        ] {
            if values.len() != epochs {
                return Err(Error::InvalidHistory(format!(
                    "`{name}` has {} entries but `loss` has {epochs}",
                    values.len()
                )));
            }
        }
        Ok(())
    }

    /// Number of recorded epochs.
    #[must_use]
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    /// Returns the 0-based epoch with the highest validation accuracy.
    ///
    /// NaN entries are ignored. Ties resolve to the earliest epoch.
    #[must_use]
    pub fn best_val_accuracy(&self) -> Option<(usize, f64)> {
        self.val_accuracy
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, acc)| !acc.is_nan())
            .fold(None, |best, (epoch, acc)| match best {
                Some((_, top)) if top >= acc => best,
                _ => Some((epoch, acc)),
            })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HISTORY: &str = r#"{
        "loss": [0.9, 0.5, 0.3],
        "val_loss": [1.0, 0.6, 0.7],
        "accuracy": [0.6, 0.8, 0.9],
        "val_accuracy": [0.55, 0.75, 0.75]
    }"#;

    #[test]
    fn test_load_history() {
        let history = TrainingHistory::from_json_reader(HISTORY.as_bytes()).unwrap();
        assert_eq!(history.epochs(), 3);
        assert_eq!(history.best_val_accuracy(), Some((1, 0.75)));
    }

    #[test]
    fn test_unequal_lengths_are_rejected() {
        let json = r#"{"loss": [1, 2], "val_loss": [1, 2], "accuracy": [0.5], "val_accuracy": [0.5, 0.6]}"#;
        let err = TrainingHistory::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidHistory(msg) if msg.contains("accuracy")));
    }

    #[test]
    fn test_missing_key_is_json_error() {
        let json = r#"{"loss": [1], "val_loss": [1], "accuracy": [1]}"#;
        let err = TrainingHistory::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_empty_history_has_no_best_epoch() {
        let history = TrainingHistory::default();
        assert!(history.validate().is_ok());
        assert_eq!(history.best_val_accuracy(), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HISTORY.as_bytes()).unwrap();
        file.flush().unwrap();
        let history = TrainingHistory::from_json_file(file.path()).unwrap();
        assert_eq!(history.val_loss, vec![1.0, 0.6, 0.7]);
    }
}
