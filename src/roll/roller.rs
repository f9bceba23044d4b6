use crate::common::Int;
use rand::Rng;

/// Source of die faces. Blanket-implemented for every [`rand::Rng`], so
/// `thread_rng()` works out of the box and tests can inject a seeded or
/// deterministic generator.
pub trait Roller {
    /// One uniform draw in `[1, faces]`.
    fn roll(&mut self, faces: Int) -> Int;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, faces: Int) -> Int {
        self.gen_range(1..=faces)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;
