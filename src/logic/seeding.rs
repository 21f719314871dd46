//! Seeding: the order entrants enter the bracket builder in.

use crate::models::Entrant;
use rand::seq::SliceRandom;
use rand::Rng;

/// Orders entrants before the bracket is built. The first entries receive byes.
pub trait Seeder {
    fn seed(&mut self, entrants: &mut [Entrant]);
}

/// Uniform random permutation drawn from `R`.
#[derive(Clone, Debug)]
pub struct RandomSeeder<R>(pub R);

impl RandomSeeder<rand::rngs::ThreadRng> {
    pub fn thread_rng() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> Seeder for RandomSeeder<R> {
    fn seed(&mut self, entrants: &mut [Entrant]) {
        entrants.shuffle(&mut self.0);
    }
}

/// Keeps the given order (tests, replays of a recorded draw).
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSeeder;

impl Seeder for FixedSeeder {
    fn seed(&mut self, _entrants: &mut [Entrant]) {}
}
