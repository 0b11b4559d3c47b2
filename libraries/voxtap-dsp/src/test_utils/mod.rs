//! Test utilities for audio verification (feature-gated)
//!
//! Enabled with the `test-utils` feature. Not intended for production use.

mod signals;

pub use signals::{impulse, silence, sine, white_noise};
