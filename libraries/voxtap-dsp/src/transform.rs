//! Spectral transform engine for the voice-boost path
//!
//! Wraps a forward DCT-II / inverse DCT-III pair sized to the session's
//! fixed processing window. Plans and scratch are allocated exactly once
//! (at prepare time) and reused for every subsequent buffer, so `forward`
//! and `inverse` are safe to call from a real-time callback.
//!
//! Neither DCT is normalized on its own: a DCT-III of a DCT-II scales the
//! signal by `window_size / 2`, so [`SpectralTransform::inverse`] divides
//! the result by that factor to bring samples back into the original
//! amplitude range.

use std::sync::Arc;

use rustdct::{DctPlanner, TransformType2And3};

use crate::error::{Result, TapError};

/// Forward/inverse orthogonal transform over a fixed window size.
///
/// Both operations are pure with respect to their inputs; they only reuse
/// internal scratch memory. Resizing mid-session is not supported; a
/// changed window size requires building a new `SpectralTransform`.
pub struct SpectralTransform {
    window_size: usize,
    dct2: Arc<dyn TransformType2And3<f32>>,
    dct3: Arc<dyn TransformType2And3<f32>>,
    /// In-place transform workspace, always `window_size` long
    work: Vec<f32>,
    /// Shared plan scratch, sized for whichever plan needs more
    scratch: Vec<f32>,
}

impl SpectralTransform {
    /// Plan the transform pair for a fixed window size.
    ///
    /// Fails with [`TapError::InvalidWindowSize`] for a zero window.
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(TapError::InvalidWindowSize(window_size));
        }

        let mut planner = DctPlanner::<f32>::new();
        let dct2 = planner.plan_dct2(window_size);
        let dct3 = planner.plan_dct3(window_size);
        let scratch_len = dct2.get_scratch_len().max(dct3.get_scratch_len());

        Ok(Self {
            window_size,
            dct2,
            dct3,
            work: vec![0.0; window_size],
            scratch: vec![0.0; scratch_len],
        })
    }

    /// The fixed number of samples processed per transform call
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Apply the forward DCT-II to `samples`, writing the unnormalized
    /// spectrum into `spectrum`.
    ///
    /// Both slices must be exactly one window long.
    pub fn forward(&mut self, samples: &[f32], spectrum: &mut [f32]) -> Result<()> {
        self.check_len("forward input", samples.len())?;
        self.check_len("forward output", spectrum.len())?;

        self.work.copy_from_slice(samples);
        self.dct2
            .process_dct2_with_scratch(&mut self.work, &mut self.scratch);
        spectrum.copy_from_slice(&self.work);
        Ok(())
    }

    /// Apply the inverse DCT-III to `spectrum` and normalize, writing the
    /// recovered time-domain signal into `samples`.
    ///
    /// Both slices must be exactly one window long. After normalization, an
    /// inverse of an unmodified forward transform reproduces the original
    /// signal within floating-point tolerance.
    pub fn inverse(&mut self, spectrum: &[f32], samples: &mut [f32]) -> Result<()> {
        self.check_len("inverse input", spectrum.len())?;
        self.check_len("inverse output", samples.len())?;

        self.work.copy_from_slice(spectrum);
        self.dct3
            .process_dct3_with_scratch(&mut self.work, &mut self.scratch);

        // DCT-III of DCT-II scales by window_size / 2
        let scale = 2.0 / self.window_size as f32;
        for (out, &value) in samples.iter_mut().zip(self.work.iter()) {
            *out = value * scale;
        }
        Ok(())
    }

    fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.window_size {
            return Err(TapError::InvalidBufferSize(format!(
                "{what} is {len} samples, window is {}",
                self.window_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(window_size: usize) {
        let mut transform = SpectralTransform::new(window_size).unwrap();

        let signal: Vec<f32> = (0..window_size)
            .map(|i| (i as f32 * 0.37).sin() * 0.8)
            .collect();
        let mut spectrum = vec![0.0; window_size];
        let mut recovered = vec![0.0; window_size];

        transform.forward(&signal, &mut spectrum).unwrap();
        transform.inverse(&spectrum, &mut recovered).unwrap();

        for (orig, back) in signal.iter().zip(recovered.iter()) {
            assert!(
                (orig - back).abs() < 1e-4,
                "round trip diverged: {orig} vs {back}"
            );
        }
    }

    #[test]
    fn forward_inverse_round_trip_small_window() {
        round_trip(8);
    }

    #[test]
    fn forward_inverse_round_trip_typical_windows() {
        round_trip(256);
        round_trip(1024);
    }

    #[test]
    fn forward_inverse_round_trip_odd_window() {
        round_trip(375);
    }

    #[test]
    fn zero_window_rejected() {
        assert!(matches!(
            SpectralTransform::new(0),
            Err(TapError::InvalidWindowSize(0))
        ));
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut transform = SpectralTransform::new(64).unwrap();
        let short = vec![0.0; 32];
        let mut out = vec![0.0; 64];
        assert!(matches!(
            transform.forward(&short, &mut out),
            Err(TapError::InvalidBufferSize(_))
        ));
    }

    #[test]
    fn forward_does_not_modify_input() {
        let mut transform = SpectralTransform::new(32).unwrap();
        let signal: Vec<f32> = (0..32).map(|i| i as f32 * 0.01).collect();
        let copy = signal.clone();
        let mut spectrum = vec![0.0; 32];
        transform.forward(&signal, &mut spectrum).unwrap();
        assert_eq!(signal, copy);
    }
}
