//! Playback events
//!
//! Event-based notifications for UI synchronization. The pipeline surfaces
//! session lifecycle changes and rate decisions as events; the host layer
//! forwards them to display-only observers (e.g. a rate label that animates
//! on change).

use serde::{Deserialize, Serialize};

/// Events emitted by the tap session for downstream observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// The applied playback rate changed
    RateChanged {
        /// The new playback rate (1.0 = normal speed)
        rate: f32,
    },

    /// A tap session was prepared with a fixed processing window
    TapPrepared {
        /// Number of samples processed per transform call
        window_size: usize,
        /// Sample rate of the prepared stream in Hz
        sample_rate: f64,
    },

    /// The tap session was torn down
    TapTornDown,
}
