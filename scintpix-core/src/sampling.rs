//! Random, label-balanced subsampling of a record stream.
//!
//! The sampler holds one reservoir per label (Algorithm R), each bounded by the
//! requested sample size, so a file of any length can be subsampled while at
//! most `2 * target` records are resident.

use crate::error::{Error, Result};
use crate::record::{EventLabel, Record};
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
struct Reservoir {
    capacity: usize,
    seen: usize,
    items: Vec<(usize, Record)>,
}

impl Reservoir {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: 0,
            items: Vec::new(),
        }
    }

    fn offer<R: Rng>(&mut self, index: usize, record: Record, rng: &mut R) {
        self.seen += 1;
        if self.items.len() < self.capacity {
            self.items.push((index, record));
        } else {
            let slot = rng.gen_range(0..self.seen);
            if slot < self.capacity {
                self.items[slot] = (index, record);
            }
        }
    }

    /// Keeps a uniform random subset of `amount` held items.
    fn take<R: Rng>(mut self, amount: usize, rng: &mut R) -> Vec<(usize, Record)> {
        self.items.shuffle(rng);
        self.items.truncate(amount);
        self.items
    }
}

/// Streaming sampler that selects up to `target` records, half singles and
/// half doubles where the input allows it.
#[derive(Debug)]
pub struct BalancedSampler {
    target: usize,
    offered: usize,
    rng: StdRng,
    singles: Reservoir,
    doubles: Reservoir,
}

impl BalancedSampler {
    /// Creates a sampler for `target` records.
    ///
    /// With `seed` the selection is reproducible; without it the generator is
    /// seeded from system entropy.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `target` is zero.
    pub fn new(target: usize, seed: Option<u64>) -> Result<Self> {
        if target == 0 {
            return Err(Error::ConfigError(
                "sample size must be at least 1".to_string(),
            ));
        }
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self {
            target,
            offered: 0,
            rng,
            singles: Reservoir::new(target),
            doubles: Reservoir::new(target),
        })
    }

    /// Requested sample size.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Number of records offered so far.
    #[must_use]
    pub fn offered(&self) -> usize {
        self.offered
    }

    /// Offers the next record of the stream.
    pub fn offer(&mut self, record: Record) {
        let index = self.offered;
        self.offered += 1;
        match record.label {
            EventLabel::Single => self.singles.offer(index, record, &mut self.rng),
            EventLabel::Double => self.doubles.offer(index, record, &mut self.rng),
        }
    }

    /// Finishes sampling and returns the selection in stream order.
    ///
    /// The split is `target / 2` singles and the rest doubles. If one label is
    /// short, the other fills the gap; if both are short every record is kept.
    #[must_use]
    pub fn finish(self) -> Vec<Record> {
        let Self {
            target,
            mut rng,
            singles,
            doubles,
            ..
        } = self;

        let want_singles = target / 2;
        let want_doubles = target - want_singles;

        let mut n_singles = want_singles.min(singles.items.len());
        let n_doubles = (target - n_singles).min(doubles.items.len());
        n_singles = (target - n_doubles).min(singles.items.len());

        if n_singles != want_singles || n_doubles != want_doubles {
            warn!(
                "balanced sample of {target} not reachable: {} singles and {} doubles available, \
                 keeping {n_singles} + {n_doubles}",
                singles.seen, doubles.seen
            );
        }

        let mut picked = singles.take(n_singles, &mut rng);
        picked.extend(doubles.take(n_doubles, &mut rng));
        picked.sort_unstable_by_key(|(index, _)| *index);
        picked.into_iter().map(|(_, record)| record).collect()
    }
}
