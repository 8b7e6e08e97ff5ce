//! Exact-length lorem ipsum generation.
//!
//! A [`Lorem`] generator packs words from a Markov chain over a [`Corpus`]
//! into a character budget. [`generate_exact`] retries it until the text has
//! exactly the requested length and [`artifact::write`] stores the result.

pub mod artifact;
pub mod diag;
pub mod lorem;
pub mod retry;
pub mod unit;

pub use self::lorem::{Corpus, Generate, Lorem};
pub use self::retry::{GenerateError, MAX_ATTEMPTS, generate_exact};
pub use self::unit::{Request, Unit};
