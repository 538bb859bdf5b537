//! This crate provides common funcionality around the regressors:
//! scoring, train / test splitting and synthetic source localisation data

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod metrics;
mod split;
pub mod synthetic;

pub use metrics::{mean_squared_error, r_squared, r_squared_per_output, score};
pub use split::{train_test_split, Split};
