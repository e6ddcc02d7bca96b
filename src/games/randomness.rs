//! Non-verifiable randomness sources

use crate::common::traits::RandomnessSource;
use crate::errors::RandomnessError;
use parking_lot::Mutex;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Operating-system entropy
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomness;

impl RandomnessSource for OsRandomness {
    fn draw(&self, upper: u64) -> Result<u64, RandomnessError> {
        if upper == 0 {
            return Err(RandomnessError::EmptyRange);
        }
        Ok(OsRng.gen_range(0..upper))
    }
}

/// Reproducible stream for simulations
pub struct SeededRandomness {
    rng: Mutex<StdRng>,
}

impl SeededRandomness {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomnessSource for SeededRandomness {
    fn draw(&self, upper: u64) -> Result<u64, RandomnessError> {
        if upper == 0 {
            return Err(RandomnessError::EmptyRange);
        }
        Ok(self.rng.lock().gen_range(0..upper))
    }
}

/// Replays a fixed list of outcomes, then reports exhaustion
#[derive(Default)]
pub struct ScriptedRandomness {
    outcomes: Mutex<VecDeque<u64>>,
}

impl ScriptedRandomness {
    pub fn new(outcomes: impl IntoIterator<Item = u64>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    pub fn push(&self, outcome: u64) {
        self.outcomes.lock().push_back(outcome);
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.lock().len()
    }
}

impl RandomnessSource for ScriptedRandomness {
    fn draw(&self, upper: u64) -> Result<u64, RandomnessError> {
        if upper == 0 {
            return Err(RandomnessError::EmptyRange);
        }
        let outcome = self
            .outcomes
            .lock()
            .pop_front()
            .ok_or(RandomnessError::Exhausted)?;
        // Scripted values are taken modulo the range so one script can
        // drive both games.
        Ok(outcome % upper)
    }
}
