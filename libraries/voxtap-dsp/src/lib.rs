//! VoxTap DSP
//!
//! The in-line audio effects stage: per-buffer processing that sits between
//! the host's decoder and its audio output.
//!
//! This crate provides:
//! - [`TapPipeline`]: the per-session orchestrator driven by the host's
//!   prepare/process/unprepare callbacks
//! - [`transform::SpectralTransform`]: a fixed-window DCT-II/DCT-III pair
//! - [`mask`]: piecewise-linear spectral mask curves (voice band-pass)
//! - [`silence::SilenceTracker`]: RMS-based silence detection with
//!   playback-rate feedback
//! - [`frequency`]: Hann-windowed magnitude spectra and dominant-frequency
//!   estimation
//!
//! # Example: voice boost
//!
//! ```rust
//! use voxtap_core::{PlaybackHost, StreamFormat};
//! use voxtap_dsp::{TapModes, TapPipeline};
//!
//! struct Host {
//!     rate: f32,
//! }
//!
//! impl PlaybackHost for Host {
//!     fn current_rate(&self) -> f32 {
//!         self.rate
//!     }
//!     fn set_rate(&mut self, rate: f32) {
//!         self.rate = rate;
//!     }
//!     fn supports_fast_forward(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # fn main() -> Result<(), voxtap_dsp::TapError> {
//! let mut pipeline = TapPipeline::new(TapModes::voice_boost());
//! pipeline.prepare(1024, StreamFormat::pcm_f32(44_100.0, 2))?;
//!
//! let mut host = Host { rate: 1.0 };
//! let mut buffer = vec![0.0f32; 2048]; // interleaved stereo
//! let output = pipeline.process(&mut buffer, 1024, 0, &mut host)?;
//! assert_eq!(output.frames_produced, 1024);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod frequency;
pub mod mask;
pub mod silence;
pub mod tap;
pub mod transform;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{Result, TapError};
pub use tap::{ProcessOutput, TapModes, TapPipeline, TapState};
