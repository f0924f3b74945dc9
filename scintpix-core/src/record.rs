//! Single-event records and their derived labels.

use crate::error::{Error, Result};
use crate::layout::{ENERGY2, ENERGY_FIELDS, IMAGE_LEN, POSITION_FIELDS, RECORD_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification target of an event.
///
/// Events without a second energy deposit are singles, everything else is a
/// double. The discriminants are the integer labels fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum EventLabel {
    /// One interaction in the detector (`energy2 == 0`).
    Single = 0,
    /// Two interactions in the detector.
    Double = 1,
}

impl EventLabel {
    /// Derives the label from the second energy value.
    ///
    /// Both `0.0` and `-0.0` are singles. NaN compares unequal to zero and is
    /// therefore a double.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_energy2(energy2: f64) -> Self {
        if energy2 == 0.0 {
            Self::Single
        } else {
            Self::Double
        }
    }

    /// Returns the integer label.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Detector pixels in row-major order.
    pub image: [f64; IMAGE_LEN],
    /// `(energy1, energy2)`.
    pub energy: [f64; 2],
    /// `(x1, y1, x2, y2)`.
    pub position: [f64; 4],
    /// Label derived from `energy[1]`.
    pub label: EventLabel,
}

impl Record {
    /// Splits a raw field vector into image, energies and positions.
    ///
    /// # Errors
    /// Returns [`Error::MalformedRecord`] unless exactly [`RECORD_LEN`] fields
    /// are given.
    pub fn from_fields(fields: &[f64]) -> Result<Self> {
        if fields.len() != RECORD_LEN {
            return Err(Error::MalformedRecord {
                expected: RECORD_LEN,
                found: fields.len(),
            });
        }

        let mut image = [0.0; IMAGE_LEN];
        image.copy_from_slice(&fields[..IMAGE_LEN]);

        Ok(Self {
            image,
            energy: ENERGY_FIELDS.map(|i| fields[i]),
            position: POSITION_FIELDS.map(|i| fields[i]),
            label: EventLabel::from_energy2(fields[ENERGY2]),
        })
    }

    /// Parses a whitespace-separated line of decimal numbers.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] for the first token that is not a number, and
    /// [`Error::MalformedRecord`] if every token parsed but the count is wrong.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| Error::Parse {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::from_fields(&fields)
    }

    /// Parses a raw line that has not been checked for valid UTF-8.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] naming the first token that is not valid UTF-8
    /// (lossily decoded), otherwise the same errors as [`Record::parse_line`].
    pub fn parse_bytes(line: &[u8]) -> Result<Self> {
        match std::str::from_utf8(line) {
            Ok(text) => Self::parse_line(text),
            Err(_) => {
                let token = line
                    .split(u8::is_ascii_whitespace)
                    .find(|token| std::str::from_utf8(token).is_err())
                    .unwrap_or(line);
                Err(Error::Parse {
                    token: String::from_utf8_lossy(token).into_owned(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn line_with_tail(tail: &str) -> String {
        let mut line = vec!["0"; IMAGE_LEN].join(" ");
        line.push(' ');
        line.push_str(tail);
        line
    }

    #[test]
    fn test_decode_single_event() {
        let record = Record::parse_line(&line_with_tail("1.0 2.0 3.0 0.0 5.0 6.0")).unwrap();
        assert!(record.image.iter().all(|&p| p == 0.0));
        assert_eq!(record.energy, [1.0, 0.0]);
        assert_eq!(record.position, [2.0, 3.0, 5.0, 6.0]);
        assert_eq!(record.label, EventLabel::Single);
        assert_eq!(record.label.as_u8(), 0);
    }

    #[test]
    fn test_decode_double_event() {
        let record = Record::parse_line(&line_with_tail("1 2 3 5.0 5 6")).unwrap();
        assert_eq!(record.energy, [1.0, 5.0]);
        assert_eq!(record.label, EventLabel::Double);
    }

    #[test]
    fn test_image_is_row_major() {
        let fields: Vec<f64> = (0..RECORD_LEN).map(|i| i as f64).collect();
        let record = Record::from_fields(&fields).unwrap();
        let grid = crate::reshape_image(&record.image).unwrap();
        assert_eq!(grid[[0, 0]], 0.0);
        assert_eq!(grid[[0, 15]], 15.0);
        assert_eq!(grid[[1, 0]], 16.0);
        assert_eq!(grid[[15, 15]], 255.0);
        assert_eq!(record.energy, [256.0, 259.0]);
        assert_eq!(record.position, [257.0, 258.0, 260.0, 261.0]);
    }

    #[test]
    fn test_short_line_is_malformed() {
        let fields = vec![0.0; RECORD_LEN - 1];
        let err = Record::from_fields(&fields).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedRecord {
                expected: 262,
                found: 261
            }
        );
    }

    #[test]
    fn test_long_line_is_malformed() {
        let line = line_with_tail("1 2 3 0 5 6 7");
        assert!(matches!(
            Record::parse_line(&line),
            Err(Error::MalformedRecord { found: 263, .. })
        ));
    }

    #[test]
    fn test_non_numeric_token_is_parse_error() {
        let line = line_with_tail("1 2 abc 0 5 6");
        assert_eq!(
            Record::parse_line(&line).unwrap_err(),
            Error::Parse {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_tabs_and_exponents_are_accepted() {
        let mut line = vec!["0"; IMAGE_LEN].join("\t");
        line.push_str("\t1e2\t2\t3\t-0.0\t5\t6\n");
        let record = Record::parse_line(&line).unwrap();
        assert_eq!(record.energy[0], 100.0);
        assert_eq!(record.label, EventLabel::Single);
    }

    #[test]
    fn test_parse_bytes_matches_parse_line() {
        let line = line_with_tail("1 2 3 5 5 6");
        assert_eq!(
            Record::parse_bytes(line.as_bytes()).unwrap(),
            Record::parse_line(&line).unwrap()
        );
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let mut line = line_with_tail("1 2 3 0 5 6").into_bytes();
        line.extend_from_slice(b" 7\xff8");
        assert_eq!(
            Record::parse_bytes(&line).unwrap_err(),
            Error::Parse {
                token: "7\u{fffd}8".to_string()
            }
        );
    }

    #[test]
    fn test_label_from_energy2() {
        assert_eq!(EventLabel::from_energy2(0.0), EventLabel::Single);
        assert_eq!(EventLabel::from_energy2(-0.0), EventLabel::Single);
        assert_eq!(EventLabel::from_energy2(5.0), EventLabel::Double);
        assert_eq!(EventLabel::from_energy2(-1e-9), EventLabel::Double);
        assert_eq!(EventLabel::from_energy2(f64::NAN), EventLabel::Double);
    }
}
