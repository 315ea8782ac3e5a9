#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime interpreter for compiled dialplan matchers.
//!
//! Executes a verified matcher [`Program`](dialplan_bytecode::Program)
//! against a digit sequence and classifies it as matched, too short, too
//! long, or invalid.

mod matcher;


pub use matcher::{DigitMatcher, MatchResult};
