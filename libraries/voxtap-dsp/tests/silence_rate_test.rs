//! End-to-end silence-skip rate trajectory tests
//!
//! Feeds loud and quiet passages through a silence-skip session and checks
//! the rate the host actually receives: quiet content speeds playback up,
//! returning loudness brings it back to normal, and a host without
//! fast-forward support never sees a rate change.

use voxtap_core::{PlaybackHost, StreamFormat};
use voxtap_dsp::{TapModes, TapPipeline};

const WINDOW: usize = 64;
const SUB_BUFFERS: usize = 32;

struct RecordingHost {
    rate: f32,
    fast_forward: bool,
    applied: Vec<f32>,
}

impl RecordingHost {
    fn new(fast_forward: bool) -> Self {
        Self {
            rate: 1.0,
            fast_forward,
            applied: Vec::new(),
        }
    }
}

impl PlaybackHost for RecordingHost {
    fn current_rate(&self) -> f32 {
        self.rate
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
        self.applied.push(rate);
    }

    fn supports_fast_forward(&self) -> bool {
        self.fast_forward
    }
}

fn session() -> TapPipeline {
    let mut pipeline = TapPipeline::new(TapModes::skip_silences());
    pipeline
        .prepare(WINDOW, StreamFormat::pcm_f32(44_100.0, 1))
        .unwrap();
    pipeline
}

fn feed_passage(pipeline: &mut TapPipeline, host: &mut RecordingHost, level: f32, windows: usize) {
    let mut buffer = vec![level; WINDOW];
    for _ in 0..windows * SUB_BUFFERS {
        pipeline.process(&mut buffer, WINDOW, 0, host).unwrap();
    }
}

#[test]
fn quiet_passage_speeds_up_then_loud_restores_normal() {
    let mut pipeline = session();
    let mut host = RecordingHost::new(true);

    // Loud passage establishes the running max at 0 dB, rate stays 1.0
    feed_passage(&mut pipeline, &mut host, 1.0, 1);
    assert!(host.applied.is_empty());

    // -60 dB passage clamps to the -30 dB floor: rate 1.3
    feed_passage(&mut pipeline, &mut host, 0.001, 1);
    assert_eq!(host.applied.len(), 1);
    assert!((host.applied[0] - 1.3).abs() < 1e-3);

    // Loudness returns: candidate 1.0 clears the hysteresis from 1.3
    feed_passage(&mut pipeline, &mut host, 1.0, 1);
    assert_eq!(host.applied.len(), 2);
    assert!((host.applied[1] - 1.0).abs() < 1e-6);
}

#[test]
fn no_fast_forward_never_changes_rate() {
    let mut pipeline = session();
    let mut host = RecordingHost::new(false);

    feed_passage(&mut pipeline, &mut host, 1.0, 1);
    feed_passage(&mut pipeline, &mut host, 0.0, 2);
    feed_passage(&mut pipeline, &mut host, 1.0, 1);

    assert!(host.applied.is_empty());
    assert_eq!(host.current_rate(), 1.0);
}

#[test]
fn rate_changes_are_sparse_under_steady_input() {
    let mut pipeline = session();
    let mut host = RecordingHost::new(true);

    feed_passage(&mut pipeline, &mut host, 1.0, 1);
    // Long steady quiet passage: one rate change, then hysteresis holds
    feed_passage(&mut pipeline, &mut host, 0.001, 20);
    assert_eq!(host.applied.len(), 1);
}

#[test]
fn buffers_are_never_modified_in_silence_mode() {
    let mut pipeline = session();
    let mut host = RecordingHost::new(true);

    let mut buffer: Vec<f32> = (0..WINDOW).map(|i| (i as f32 * 0.2).sin()).collect();
    let original = buffer.clone();
    for _ in 0..SUB_BUFFERS * 3 {
        pipeline.process(&mut buffer, WINDOW, 0, &mut host).unwrap();
        assert_eq!(buffer, original);
    }
}
