//! Silence detection and adaptive playback-rate control
//!
//! Accumulates one channel's samples across a fixed number of sub-buffers,
//! converts the window's RMS energy to dB, and derives a target playback
//! rate from the distance to the loudest window seen recently: quiet
//! passages play faster, loud ones fall back toward normal speed. A
//! hysteresis threshold keeps the rate from churning on small deltas.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{Result, TapError};

/// Sub-buffers accumulated before a rate decision is made
pub const SUB_BUFFERS_PER_WINDOW: usize = 32;

/// Amplitudes below this are treated as exactly this floor when computing
/// the rate, so dead silence cannot push the rate arbitrarily high
pub const AMPLITUDE_FLOOR_DB: f32 = -30.0;

/// Finite stand-in for `20 * log10(0)`; never propagate -inf into the
/// running maximum
pub const SILENCE_FLOOR_DB: f32 = -120.0;

/// Rate increase per dB of distance below the running maximum
pub const RATE_STEP_PER_DB: f32 = 0.01;

/// Minimum rate delta before a new rate is emitted
pub const RATE_HYSTERESIS: f32 = 0.1;

/// Window amplitudes retained for the running maximum
const AMPLITUDE_HISTORY_LEN: usize = 1024;

/// Accumulating RMS loudness tracker that drives the playback rate.
///
/// Feed it one extracted channel per incoming buffer via
/// [`accumulate`](Self::accumulate); every [`SUB_BUFFERS_PER_WINDOW`]
/// sub-buffers it flushes, appends the window's dB amplitude to a bounded
/// history, and may emit a new target rate.
pub struct SilenceTracker {
    /// Samples gathered since the last flush
    accumulated: Vec<f32>,
    /// Sub-buffers gathered since the last flush, in [0, 32)
    sub_buffer_count: usize,
    /// Recent window amplitudes in dB; bounded ring, oldest evicted first
    amplitude_history: VecDeque<f32>,
    /// The rate currently applied to playback
    current_rate: f32,
}

impl SilenceTracker {
    /// Create a tracker at normal playback speed with empty history
    pub fn new() -> Self {
        Self {
            accumulated: Vec::new(),
            sub_buffer_count: 0,
            amplitude_history: VecDeque::with_capacity(AMPLITUDE_HISTORY_LEN),
            current_rate: 1.0,
        }
    }

    /// The rate most recently emitted (1.0 until the first decision)
    pub fn current_rate(&self) -> f32 {
        self.current_rate
    }

    /// Number of sub-buffers gathered since the last flush
    pub fn pending_sub_buffers(&self) -> usize {
        self.sub_buffer_count
    }

    /// Feed one sub-buffer of single-channel samples.
    ///
    /// Returns `Ok(None)` while accumulating and between emissions. On the
    /// 32nd sub-buffer the window is flushed: `Ok(Some(rate))` carries a
    /// new target rate when it differs from the current one by more than
    /// [`RATE_HYSTERESIS`]. When `supports_fast_forward` is false the
    /// candidate rate is pinned to 1.0.
    ///
    /// A zero `samples_per_sub_buffer` would poison the RMS divisor; it is
    /// fatal in debug builds and reported as
    /// [`TapError::InvalidBufferSize`] in release, with the window's
    /// computation skipped.
    pub fn accumulate(
        &mut self,
        samples: &[f32],
        samples_per_sub_buffer: usize,
        supports_fast_forward: bool,
    ) -> Result<Option<f32>> {
        if samples_per_sub_buffer == 0 {
            debug_assert!(samples_per_sub_buffer > 0, "zero-length sub-buffer");
            warn!("skipping silence window: zero-length sub-buffer");
            return Err(TapError::InvalidBufferSize(
                "samples per sub-buffer is zero".to_string(),
            ));
        }

        self.accumulated.extend_from_slice(samples);
        self.sub_buffer_count += 1;
        if self.sub_buffer_count < SUB_BUFFERS_PER_WINDOW {
            return Ok(None);
        }

        let energy: f32 = self.accumulated.iter().map(|s| s * s).sum();
        let rms = (energy / (samples_per_sub_buffer * SUB_BUFFERS_PER_WINDOW) as f32).sqrt();
        let amplitude_db = if rms > 0.0 {
            (20.0 * rms.log10()).max(SILENCE_FLOOR_DB)
        } else {
            SILENCE_FLOOR_DB
        };

        if self.amplitude_history.len() == AMPLITUDE_HISTORY_LEN {
            self.amplitude_history.pop_front();
        }
        self.amplitude_history.push_back(amplitude_db);
        let max_amp = self
            .amplitude_history
            .iter()
            .copied()
            .fold(f32::MIN, f32::max);

        // Any amplitude below the floor is treated as exactly the floor
        let amp = amplitude_db.max(AMPLITUDE_FLOOR_DB);
        let candidate = if supports_fast_forward {
            1.0 + (max_amp - amp) * RATE_STEP_PER_DB
        } else {
            1.0
        };

        self.accumulated.clear();
        self.sub_buffer_count = 0;

        if (self.current_rate - candidate).abs() > RATE_HYSTERESIS {
            debug!(amplitude_db, max_amp, candidate, "rate change");
            self.current_rate = candidate;
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }

    /// Drop all accumulated state and return to normal speed
    pub fn reset(&mut self) {
        self.accumulated.clear();
        self.sub_buffer_count = 0;
        self.amplitude_history.clear();
        self.current_rate = 1.0;
    }
}

impl Default for SilenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
