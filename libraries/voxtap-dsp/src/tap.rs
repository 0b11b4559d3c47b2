//! Audio tap pipeline
//!
//! Per-buffer orchestration and session state machine. The host's media
//! engine drives one pipeline instance serially through
//! `prepare -> process* -> unprepare`, all from a single real-time
//! callback context. Depending on the active modes, each buffer either
//! feeds the silence/rate controller (mutating the host's playback rate as
//! a side effect) or runs through the spectral voice-boost path (mutating
//! the buffer samples in place).
//!
//! The pipeline is an explicit session object owned by the host; there is
//! no process-wide state. Dropping it (or calling
//! [`finalize`](TapPipeline::finalize), which consumes it) releases every
//! resource deterministically.

use tracing::{debug, warn};

use voxtap_core::{PlaybackEvent, PlaybackHost, StreamFormat};

use crate::error::{Result, TapError};
use crate::mask;
use crate::silence::SilenceTracker;
use crate::transform::SpectralTransform;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapState {
    /// Constructed, prepare not yet observed
    Uninitialized,
    /// Transform context allocated, format captured, no buffer seen yet
    Prepared,
    /// At least one buffer processed since prepare
    Processing,
    /// Torn down; a fresh prepare is required before processing again
    Unprepared,
}

/// Which transformations the tap applies.
///
/// The two modes are independent switches, but silence-skip takes
/// precedence: when both are set, a buffer only feeds the silence tracker
/// and the spectral path never runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapModes {
    /// Speed up quiet passages via playback-rate feedback
    pub skip_silences: bool,
    /// Band-pass the spectrum to boost voice intelligibility
    pub voice_boost: bool,
}

impl TapModes {
    /// Neither transformation active; buffers pass through untouched
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Only silence skipping
    pub fn skip_silences() -> Self {
        Self {
            skip_silences: true,
            voice_boost: false,
        }
    }

    /// Only voice boosting
    pub fn voice_boost() -> Self {
        Self {
            skip_silences: false,
            voice_boost: true,
        }
    }
}

/// Result of processing one buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOutput {
    /// Always the prepared window size: the pipeline's fixed processing
    /// granularity, not an echo of the host's request
    pub frames_produced: usize,
    /// Host flags, passed through unchanged
    pub flags: u32,
    /// New playback rate, when this buffer triggered a rate change
    pub rate_update: Option<f32>,
}

impl ProcessOutput {
    /// Observer event for a rate change, if one happened
    pub fn rate_event(&self) -> Option<PlaybackEvent> {
        self.rate_update.map(|rate| PlaybackEvent::RateChanged { rate })
    }
}

/// The in-line effects stage between decoder and playback.
///
/// Owns all per-session DSP state: the spectral transform pair, the
/// pre-built voice mask, channel/spectrum scratch, and the silence
/// tracker. Everything the buffer callback touches is allocated in
/// [`prepare`](Self::prepare); `process` itself never allocates.
pub struct TapPipeline {
    state: TapState,
    modes: TapModes,
    window_size: usize,
    format: Option<StreamFormat>,
    transform: Option<SpectralTransform>,
    /// Voice band-pass multipliers, one per spectrum bin
    voice_mask: Vec<f32>,
    /// One extracted channel, zero-padded to the window
    channel: Vec<f32>,
    /// Forward-transform output
    spectrum: Vec<f32>,
    /// Inverse-transform output
    filtered: Vec<f32>,
    silence: SilenceTracker,
}

impl TapPipeline {
    /// Create an unprepared session with the given modes
    pub fn new(modes: TapModes) -> Self {
        Self {
            state: TapState::Uninitialized,
            modes,
            window_size: 0,
            format: None,
            transform: None,
            voice_mask: Vec::new(),
            channel: Vec::new(),
            spectrum: Vec::new(),
            filtered: Vec::new(),
            silence: SilenceTracker::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TapState {
        self.state
    }

    /// Active modes
    pub fn modes(&self) -> TapModes {
        self.modes
    }

    /// Switch modes between buffers
    pub fn set_modes(&mut self, modes: TapModes) {
        self.modes = modes;
    }

    /// The stream format captured at prepare, if any
    pub fn format(&self) -> Option<&StreamFormat> {
        self.format.as_ref()
    }

    /// Allocate the transform context for a fixed window and capture the
    /// host's stream format.
    ///
    /// Returns the [`PlaybackEvent::TapPrepared`] notification for
    /// downstream observers. Fails with [`TapError::InvalidWindowSize`]
    /// for a zero window and with [`TapError::AlreadyPrepared`] if called
    /// twice without an intervening [`unprepare`](Self::unprepare); prior
    /// state is left intact in both cases.
    pub fn prepare(&mut self, window_size: usize, format: StreamFormat) -> Result<PlaybackEvent> {
        if matches!(self.state, TapState::Prepared | TapState::Processing) {
            return Err(TapError::AlreadyPrepared);
        }
        if window_size == 0 {
            return Err(TapError::InvalidWindowSize(window_size));
        }

        let transform = SpectralTransform::new(window_size)?;
        self.voice_mask = mask::voice_band(window_size).build(window_size);
        self.channel = vec![0.0; window_size];
        self.spectrum = vec![0.0; window_size];
        self.filtered = vec![0.0; window_size];
        self.transform = Some(transform);
        self.format = Some(format);
        self.window_size = window_size;
        self.state = TapState::Prepared;

        debug!(
            window_size,
            sample_rate = format.sample_rate,
            channels = format.channels_per_frame,
            "tap prepared"
        );
        Ok(PlaybackEvent::TapPrepared {
            window_size,
            sample_rate: format.sample_rate,
        })
    }

    /// Process one interleaved buffer in place.
    ///
    /// Extracts the first channel by striding the buffer and routes it:
    /// silence-skip feeds the rate controller (buffer untouched,
    /// voice-boost short-circuited even when both modes are set);
    /// voice-boost runs forward transform, voice mask, and normalized
    /// inverse, writing the result back into that channel's positions;
    /// with neither mode the buffer passes through.
    ///
    /// Called before any prepare it fails with
    /// [`TapError::MissingFormat`] and leaves the buffer bit-identical;
    /// callers in the real-time path should treat that as pass-through and
    /// keep going. Called after teardown it fails with
    /// [`TapError::NotPrepared`].
    pub fn process(
        &mut self,
        buffer: &mut [f32],
        frame_count: usize,
        flags: u32,
        host: &mut dyn PlaybackHost,
    ) -> Result<ProcessOutput> {
        match self.state {
            TapState::Uninitialized => {
                warn!("no stream format captured; passing buffer through");
                return Err(TapError::MissingFormat);
            }
            TapState::Unprepared => return Err(TapError::NotPrepared),
            TapState::Prepared | TapState::Processing => {}
        }
        let format = self.format.ok_or(TapError::MissingFormat)?;
        let transform = self.transform.as_mut().ok_or(TapError::NotPrepared)?;

        self.state = TapState::Processing;

        let stride = format.frame_stride();
        let frames = frame_count.min(buffer.len() / stride);
        // The tap processes at most one window per callback
        let n = frames.min(self.window_size);
        let mut rate_update = None;

        // Only the first audio channel is processed; multi-track mixing is
        // out of scope
        for (slot, frame) in self.channel[..n]
            .iter_mut()
            .zip(buffer.chunks_exact(stride))
        {
            *slot = frame[0];
        }

        if self.modes.skip_silences {
            match self
                .silence
                .accumulate(&self.channel[..n], n, host.supports_fast_forward())
            {
                Ok(Some(rate)) => {
                    host.set_rate(rate);
                    rate_update = Some(rate);
                }
                Ok(None) => {}
                // Degenerate sub-buffer: skip this window's computation
                Err(TapError::InvalidBufferSize(_)) => {}
                Err(err) => return Err(err),
            }
        } else if self.modes.voice_boost {
            self.channel[n..].fill(0.0);

            transform.forward(&self.channel, &mut self.spectrum)?;
            for (bin, gain) in self.spectrum.iter_mut().zip(self.voice_mask.iter()) {
                *bin *= gain;
            }
            transform.inverse(&self.spectrum, &mut self.filtered)?;

            for (frame, &sample) in buffer
                .chunks_exact_mut(stride)
                .zip(self.filtered[..n].iter())
            {
                frame[0] = sample;
            }
        }

        Ok(ProcessOutput {
            frames_produced: self.window_size,
            flags,
            rate_update,
        })
    }

    /// Release the transform context and captured format.
    ///
    /// Returns the [`PlaybackEvent::TapTornDown`] notification for
    /// downstream observers. The silence tracker's rate state survives
    /// teardown so a re-prepared session resumes from the applied rate.
    /// Fails with [`TapError::NotPrepared`] if there is nothing to tear
    /// down.
    pub fn unprepare(&mut self) -> Result<PlaybackEvent> {
        if !matches!(self.state, TapState::Prepared | TapState::Processing) {
            return Err(TapError::NotPrepared);
        }

        self.transform = None;
        self.format = None;
        self.voice_mask = Vec::new();
        self.channel = Vec::new();
        self.spectrum = Vec::new();
        self.filtered = Vec::new();
        self.window_size = 0;
        self.state = TapState::Unprepared;

        debug!("tap unprepared");
        Ok(PlaybackEvent::TapTornDown)
    }

    /// Consume the session, releasing everything it owns.
    ///
    /// Terminal by ownership: a finalized pipeline cannot be called again.
    pub fn finalize(mut self) {
        self.silence.reset();
        debug!("tap finalized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockHost {
        rate: f32,
        fast_forward: bool,
        set_rate_calls: usize,
    }

    impl MockHost {
        fn new(fast_forward: bool) -> Self {
            Self {
                rate: 1.0,
                fast_forward,
                set_rate_calls: 0,
            }
        }
    }

    impl PlaybackHost for MockHost {
        fn current_rate(&self) -> f32 {
            self.rate
        }

        fn set_rate(&mut self, rate: f32) {
            self.rate = rate;
            self.set_rate_calls += 1;
        }

        fn supports_fast_forward(&self) -> bool {
            self.fast_forward
        }
    }

    fn stereo_format() -> StreamFormat {
        StreamFormat::pcm_f32(44_100.0, 2)
    }

    #[test]
    fn process_before_prepare_is_missing_format_and_passthrough() {
        let mut pipeline = TapPipeline::new(TapModes::voice_boost());
        let mut host = MockHost::new(true);
        let mut buffer = vec![0.25f32; 128];
        let original = buffer.clone();

        let err = pipeline
            .process(&mut buffer, 64, 0, &mut host)
            .unwrap_err();
        assert_eq!(err, TapError::MissingFormat);
        assert_eq!(buffer, original);
    }

    #[test]
    fn prepare_twice_is_rejected_and_state_kept() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        pipeline.prepare(256, stereo_format()).unwrap();
        let err = pipeline.prepare(512, stereo_format()).unwrap_err();
        assert_eq!(err, TapError::AlreadyPrepared);
        assert_eq!(pipeline.state(), TapState::Prepared);
    }

    #[test]
    fn zero_window_rejected_without_transition() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        let err = pipeline.prepare(0, stereo_format()).unwrap_err();
        assert_eq!(err, TapError::InvalidWindowSize(0));
        assert_eq!(pipeline.state(), TapState::Uninitialized);
    }

    #[test]
    fn process_after_unprepare_is_not_prepared() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        pipeline.prepare(256, stereo_format()).unwrap();
        pipeline.unprepare().unwrap();

        let mut host = MockHost::new(true);
        let mut buffer = vec![0.0f32; 512];
        let err = pipeline
            .process(&mut buffer, 256, 0, &mut host)
            .unwrap_err();
        assert_eq!(err, TapError::NotPrepared);
    }

    #[test]
    fn reprepare_after_unprepare_is_allowed() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        pipeline.prepare(256, stereo_format()).unwrap();
        pipeline.unprepare().unwrap();
        pipeline.prepare(1024, stereo_format()).unwrap();
        assert_eq!(pipeline.state(), TapState::Prepared);
    }

    #[test]
    fn unprepare_without_prepare_is_rejected() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        assert_eq!(pipeline.unprepare().unwrap_err(), TapError::NotPrepared);
    }

    #[test]
    fn passthrough_leaves_buffer_untouched() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        pipeline.prepare(64, stereo_format()).unwrap();

        let mut host = MockHost::new(true);
        let mut buffer: Vec<f32> = (0..128).map(|i| i as f32 * 0.001).collect();
        let original = buffer.clone();

        let output = pipeline.process(&mut buffer, 64, 7, &mut host).unwrap();
        assert_eq!(buffer, original);
        assert_eq!(output.frames_produced, 64);
        assert_eq!(output.flags, 7);
        assert_eq!(output.rate_update, None);
    }

    #[test]
    fn frames_produced_is_window_size_not_request() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        pipeline.prepare(4096, stereo_format()).unwrap();

        let mut host = MockHost::new(true);
        let mut buffer = vec![0.0f32; 512];
        let output = pipeline.process(&mut buffer, 256, 0, &mut host).unwrap();
        assert_eq!(output.frames_produced, 4096);
    }

    #[test]
    fn silence_skip_takes_precedence_over_voice_boost() {
        let mut pipeline = TapPipeline::new(TapModes {
            skip_silences: true,
            voice_boost: true,
        });
        pipeline.prepare(64, stereo_format()).unwrap();

        let mut host = MockHost::new(true);
        // Loud deterministic content that voice boost would definitely alter
        let mut buffer: Vec<f32> = (0..128).map(|i| (i as f32 * 0.7).sin()).collect();
        let original = buffer.clone();

        // Across many windows the buffer must never be modified
        for _ in 0..100 {
            pipeline.process(&mut buffer, 64, 0, &mut host).unwrap();
            assert_eq!(buffer, original);
        }
    }

    #[test]
    fn silence_skip_drives_host_rate() {
        let mut pipeline = TapPipeline::new(TapModes::skip_silences());
        pipeline.prepare(64, stereo_format()).unwrap();
        let mut host = MockHost::new(true);

        // One full window of loud content to set the running max
        let mut loud: Vec<f32> = vec![1.0; 128];
        for _ in 0..32 {
            pipeline.process(&mut loud, 64, 0, &mut host).unwrap();
        }
        // One full window of near-silence
        let mut quiet: Vec<f32> = vec![0.001; 128];
        let mut last = None;
        for _ in 0..32 {
            let output = pipeline.process(&mut quiet, 64, 0, &mut host).unwrap();
            if output.rate_update.is_some() {
                last = output.rate_update;
            }
        }

        let rate = last.expect("quiet window should emit a rate");
        assert!((rate - 1.3).abs() < 1e-3);
        assert_eq!(host.current_rate(), rate);
        assert_eq!(host.set_rate_calls, 1);
    }

    #[test]
    fn without_fast_forward_rate_stays_normal() {
        let mut pipeline = TapPipeline::new(TapModes::skip_silences());
        pipeline.prepare(64, stereo_format()).unwrap();
        let mut host = MockHost::new(false);

        let mut buffer = vec![0.0f32; 128];
        for _ in 0..64 {
            pipeline.process(&mut buffer, 64, 0, &mut host).unwrap();
        }
        assert_eq!(host.set_rate_calls, 0);
        assert_eq!(host.current_rate(), 1.0);
    }

    #[test]
    fn voice_boost_modifies_only_first_channel() {
        let mut pipeline = TapPipeline::new(TapModes::voice_boost());
        pipeline.prepare(64, stereo_format()).unwrap();

        let mut host = MockHost::new(true);
        let mut buffer: Vec<f32> = (0..128)
            .map(|i| if i % 2 == 0 { (i as f32 * 0.3).sin() } else { 0.77 })
            .collect();

        pipeline.process(&mut buffer, 64, 0, &mut host).unwrap();

        // Second channel untouched
        for frame in buffer.chunks_exact(2) {
            assert_eq!(frame[1], 0.77);
        }
    }

    #[test]
    fn lifecycle_surfaces_observer_events() {
        let mut pipeline = TapPipeline::new(TapModes::passthrough());
        let prepared = pipeline.prepare(256, stereo_format()).unwrap();
        assert_eq!(
            prepared,
            PlaybackEvent::TapPrepared {
                window_size: 256,
                sample_rate: 44_100.0,
            }
        );
        assert_eq!(pipeline.unprepare().unwrap(), PlaybackEvent::TapTornDown);
    }

    #[test]
    fn rate_event_maps_to_playback_event() {
        let output = ProcessOutput {
            frames_produced: 4096,
            flags: 0,
            rate_update: Some(1.2),
        };
        assert_eq!(
            output.rate_event(),
            Some(PlaybackEvent::RateChanged { rate: 1.2 })
        );
    }
}
