//! Shared foundational types used across the crg clock/reset generator.
//!
//! This crate provides frequency and phase values, content hashing for plan
//! fingerprints, and the internal error type used to report planning bugs.

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;
pub mod phase;
pub mod result;

pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
pub use phase::Phase;
pub use result::{CrgResult, InternalError};
