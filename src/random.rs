use std::{collections::VecDeque, ops::RangeInclusive, sync::Mutex};

use rand::Rng;

/// Source of bounded random numbers used by the simulated remote balance call.
pub trait RandomSource: Send + Sync {
    fn random(&self, range: RangeInclusive<u32>) -> u32;
}

/// Production source, backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random(&self, range: RangeInclusive<u32>) -> u32 {
        rand::thread_rng().gen_range(range)
    }
}

/// Replays a fixed sequence of values, ignoring the requested range.
/// Once exhausted, the lower bound of the range is returned.
#[derive(Debug, Default)]
pub struct FixedSequence {
    values: Mutex<VecDeque<u32>>,
}

impl FixedSequence {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }

    /// Appends more values to replay, in order.
    pub fn push(&self, values: impl IntoIterator<Item = u32>) {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(values);
    }
}

impl RandomSource for FixedSequence {
    fn random(&self, range: RangeInclusive<u32>) -> u32 {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(*range.start())
    }
}
