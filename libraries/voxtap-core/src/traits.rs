//! Seams between the processing pipeline and its host
//!
//! The pipeline never talks to a concrete media player. Rate control goes
//! through [`PlaybackHost`], which the host implements over whatever player
//! object it owns.

/// Playback-rate control surface exposed by the media player host.
///
/// The pipeline only ever *writes* a target rate; it never reads the rate
/// back concurrently with other processing. All calls happen serially from
/// the host's buffer-callback context.
pub trait PlaybackHost {
    /// The rate currently applied to playback (1.0 = normal speed)
    fn current_rate(&self) -> f32;

    /// Apply a new playback rate
    fn set_rate(&mut self, rate: f32);

    /// Whether the player supports playing faster than 1.0.
    ///
    /// When this is false the silence controller pins the rate to 1.0
    /// instead of speeding through quiet passages.
    fn supports_fast_forward(&self) -> bool;
}
