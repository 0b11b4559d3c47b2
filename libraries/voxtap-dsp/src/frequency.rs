//! Dominant-frequency estimation
//!
//! [`SpectrumAnalyzer`] produces a Hann-windowed magnitude spectrum via a
//! forward FFT planned once per window size, and [`estimate_frequency`]
//! refines the peak bin with parabolic-style interpolation. Without the
//! refinement, precision is bounded by bin resolution; with it, a stable
//! tone resolves to a fraction of a bin.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::{Result, TapError};

/// Estimate the dominant frequency in Hz from a magnitude spectrum.
///
/// Finds the peak bin (first occurrence on ties) and refines its location
/// using the ratio of the peak to its larger neighbor: with neighbors
/// `y1, y2, y3` around peak `m`, the fractional offset is `a / (1 + a)`
/// where `a` is the neighbor ratio, rounded to the nearest bin. A refined
/// location outside the spectrum falls back to the peak bin itself.
///
/// Returns 0.0 for an empty spectrum or a peak at bin 0 (DC).
pub fn estimate_frequency(magnitudes: &[f32], frame_count: usize, sample_rate: f64) -> f32 {
    if magnitudes.is_empty() || frame_count == 0 {
        return 0.0;
    }

    let mut max_index = 0;
    for (i, &value) in magnitudes.iter().enumerate() {
        if value > magnitudes[max_index] {
            max_index = i;
        }
    }
    if max_index == 0 {
        return 0.0;
    }

    let y2 = magnitudes[max_index].abs();
    let y1 = magnitudes[max_index - 1].abs();
    let y3 = if max_index == magnitudes.len() - 1 {
        y2
    } else {
        magnitudes[max_index + 1].abs()
    };

    let location = if y1 > y3 {
        let a = y2 / y1;
        let d = a / (1.0 + a);
        max_index as isize - 1 + d.round() as isize
    } else {
        let a = y3 / y2;
        let d = a / (1.0 + a);
        max_index as isize + d.round() as isize
    };

    let location = if location >= 0 && (location as usize) < magnitudes.len() {
        location as usize
    } else {
        max_index
    };

    location as f32 * sample_rate as f32 / (frame_count as f32 * 2.0)
}

/// Reusable Hann-windowed magnitude-spectrum analyzer.
///
/// The FFT plan, window coefficients, and all scratch are allocated once
/// for a given frame count and reused across calls.
pub struct SpectrumAnalyzer {
    frame_count: usize,
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    /// Hann coefficients, one per FFT slot
    window: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Plan an analyzer for signal windows of `frame_count` samples.
    ///
    /// The FFT runs at the power of two nearest to `frame_count`; shorter
    /// inputs are zero-padded, longer inputs truncated.
    pub fn new(frame_count: usize) -> Result<Self> {
        if frame_count == 0 {
            return Err(TapError::InvalidWindowSize(frame_count));
        }

        let log2n = (frame_count as f64).log2().round() as u32;
        let fft_size = 1usize << log2n;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / fft_size as f32).cos()))
            .collect();

        Ok(Self {
            frame_count,
            fft_size,
            fft,
            window,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            fft_scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; fft_size / 2],
        })
    }

    /// Number of bins in the produced half spectrum
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Squared magnitudes of the lower half spectrum, scaled by
    /// `1 / frame_count`.
    pub fn magnitudes(&mut self, samples: &[f32]) -> &[f32] {
        let scale = 1.0 / self.frame_count as f32;
        self.transform(samples);
        for (slot, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *slot = bin.norm_sqr() * scale;
        }
        &self.magnitudes
    }

    /// Squared magnitudes scaled so the peak bin is 1.0 (0.0 spectra stay
    /// all-zero).
    pub fn normalized_magnitudes(&mut self, samples: &[f32]) -> &[f32] {
        self.transform(samples);
        let mut peak = 0.0f32;
        for (slot, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *slot = bin.norm_sqr();
            peak = peak.max(*slot);
        }
        if peak > 0.0 {
            let scale = 1.0 / peak;
            for slot in &mut self.magnitudes {
                *slot *= scale;
            }
        }
        &self.magnitudes
    }

    fn transform(&mut self, samples: &[f32]) {
        let copied = samples.len().min(self.fft_size);

        // Hann windowing to reduce frequency leakage
        for i in 0..copied {
            self.fft_buffer[i] = Complex::new(samples[i] * self.window[i], 0.0);
        }
        for slot in self.fft_buffer.iter_mut().skip(copied) {
            *slot = Complex::new(0.0, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.fft_scratch);
    }
}
