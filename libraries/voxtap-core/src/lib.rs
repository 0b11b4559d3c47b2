//! VoxTap Core
//!
//! Platform-agnostic types, traits, and error handling for VoxTap.
//!
//! VoxTap is an in-line audio effects stage that sits between a decoder and
//! a playback host. This crate provides the foundational building blocks
//! shared by the processing pipeline and any host integration:
//! - **Stream description**: [`StreamFormat`], captured once per playback
//!   session from the host's prepare notification
//! - **Host seam**: the [`PlaybackHost`] trait, through which the pipeline
//!   reads playback capabilities and writes a target rate
//! - **Events**: [`PlaybackEvent`] notifications for downstream observers
//! - **Error Handling**: unified [`VoxtapError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use voxtap_core::StreamFormat;
//!
//! // Describe a 44.1 kHz stereo float stream
//! let format = StreamFormat::pcm_f32(44_100.0, 2);
//! assert_eq!(format.frame_stride(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VoxtapError};
pub use events::PlaybackEvent;
pub use traits::PlaybackHost;
pub use types::StreamFormat;
