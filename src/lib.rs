//! A dice-notation interpreter.
//!
//! Expressions combine dice terms (`2d6`, `d%`, `4d20kh1`) with the usual
//! arithmetic operators. Advanced mode adds modifier suffixes: keep/drop
//! (`kh`/`kl`/`dh`/`dl` and the `k`/`h`/`l` shorthands), reroll-once
//! (`r1`, `r<3`), exploding dice (`x`, `x>=19`), and success counting via
//! a trailing comparison (`5d10>=8`).
//!
//! ```
//! let summary = dice_notation::roll_dice_short("2d6+3", false).unwrap();
//! assert!(summary.contains("2d6"));
//!
//! let outcome = dice_notation::roll_dice("4d20kh1", true).unwrap();
//! assert!((1..=20).contains(&outcome.total));
//! ```
//!
//! Evaluation draws from a fresh thread-local generator per call; pass
//! your own source for reproducible rolls:
//!
//! ```
//! use rand::SeedableRng;
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let outcome = dice_notation::roll_dice_with("8d6", false, rng).unwrap();
//! assert_eq!(outcome.breakdown.len(), 1);
//! ```

pub mod common;
mod error;
pub mod parse;
pub mod roll;

pub use error::Error;
pub use parse::parse;
pub use roll::{
    Contribution, EvalOutcome, MarkdownStringifier, Roll, RollContext, RollResult, Roller,
    SimpleStringifier,
};

use roll::Stringify;

/// Rolls `input` and returns the one-line summary, e.g.
/// `12 (2d6 [4, 5] + 3)`. On failure the error's `Display` is the message
/// to show the user.
pub fn roll_dice_short(input: &str, advanced: bool) -> Result<String, Error> {
    roll_dice_short_with(input, advanced, rand::thread_rng())
}

/// [`roll_dice_short`] with an injected entropy source.
pub fn roll_dice_short_with<R: Roller>(
    input: &str,
    advanced: bool,
    roller: R,
) -> Result<String, Error> {
    let expr = parse(input, advanced)?;
    let roll = roll::eval(input, &expr, roller)?;
    Ok(SimpleStringifier::new().str_roll(&roll)?)
}

/// Rolls `input` and returns the full structured outcome: the input echo,
/// the total, and one breakdown entry per dice term and literal.
pub fn roll_dice(input: &str, advanced: bool) -> Result<EvalOutcome, Error> {
    roll_dice_with(input, advanced, rand::thread_rng())
}

/// [`roll_dice`] with an injected entropy source.
pub fn roll_dice_with<R: Roller>(
    input: &str,
    advanced: bool,
    roller: R,
) -> Result<EvalOutcome, Error> {
    let expr = parse(input, advanced)?;
    let roll = roll::eval(input, &expr, roller)?;
    Ok(roll.outcome()?)
}

/// Rolls a classic six-line ability-score block (`4d6l` per score).
pub fn roll_stats() -> Result<String, Error> {
    let mut out = String::new();
    for _ in 0..6 {
        let outcome = roll_dice("4d6l", true)?;
        match outcome.breakdown.first() {
            Some(Contribution::Dice(result)) => {
                out.push_str(&format!("{:2}: {:?}\n", outcome.total, result.retained));
            }
            _ => unreachable!("a lone dice term yields a dice contribution"),
        }
    }
    Ok(out)
}
