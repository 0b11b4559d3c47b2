//! Audio stream description types

use serde::{Deserialize, Serialize};

/// Description of the decoded audio stream delivered by the playback host.
///
/// Captured once per playback session when the host announces its prepare
/// event, and immutable for the lifetime of that session. A changed format
/// requires tearing the session down and preparing again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Four-char-code style format identifier, as reported by the host
    pub format_id: u32,

    /// Format flags, as reported by the host
    pub format_flags: u32,

    /// Bytes per packet
    pub bytes_per_packet: u32,

    /// Frames per packet
    pub frames_per_packet: u32,

    /// Bytes per frame
    pub bytes_per_frame: u32,

    /// Number of interleaved channels per frame
    pub channels_per_frame: u32,

    /// Bits per channel
    pub bits_per_channel: u32,
}

impl StreamFormat {
    /// Create a format describing interleaved 32-bit float PCM.
    ///
    /// This is the layout the pipeline actually processes; hosts delivering
    /// other layouts are expected to convert before the tap sees samples.
    pub fn pcm_f32(sample_rate: f64, channels: u32) -> Self {
        let bytes_per_frame = channels * 4;
        Self {
            sample_rate,
            format_id: u32::from_be_bytes(*b"lpcm"),
            format_flags: 0,
            bytes_per_packet: bytes_per_frame,
            frames_per_packet: 1,
            bytes_per_frame,
            channels_per_frame: channels,
            bits_per_channel: 32,
        }
    }

    /// Stride between two consecutive samples of the same channel in an
    /// interleaved buffer. Never zero, even for a degenerate format.
    pub fn frame_stride(&self) -> usize {
        self.channels_per_frame.max(1) as usize
    }
}
