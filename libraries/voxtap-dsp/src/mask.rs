//! Spectral mask synthesis
//!
//! Builds per-bin multiplier curves from a small set of (index, gain)
//! control points via piecewise linear interpolation. The resulting vector
//! is multiplied element-wise against a spectrum to shape it (band-pass or
//! band-stop). Masks are static configuration: they are synthesized once at
//! prepare time, never inside the buffer callback.

/// A single control point of a mask curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskPoint {
    /// Fractional bin index this point anchors
    pub index: f32,
    /// Gain at that index, nominally in [0, 1]
    pub gain: f32,
}

impl MaskPoint {
    /// Create a control point
    pub fn new(index: f32, gain: f32) -> Self {
        Self { index, gain }
    }
}

/// An ordered sequence of control points with strictly increasing indices.
///
/// Synthesizes per-bin multiplier vectors of arbitrary length: positions
/// between control points are linearly interpolated, positions before the
/// first point hold its gain, and positions past the last point hold the
/// last gain.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskCurve {
    points: Vec<MaskPoint>,
}

impl MaskCurve {
    /// Create a curve from control points.
    ///
    /// Indices must be strictly increasing and at least one point must be
    /// given.
    pub fn new(points: Vec<MaskPoint>) -> Result<Self, MaskError> {
        if points.is_empty() {
            return Err(MaskError::Empty);
        }
        for (position, pair) in points.windows(2).enumerate() {
            if pair[1].index <= pair[0].index {
                return Err(MaskError::NonIncreasingIndices { position });
            }
        }
        Ok(Self { points })
    }

    /// The control points defining this curve
    pub fn points(&self) -> &[MaskPoint] {
        &self.points
    }

    /// Synthesize a multiplier vector of `length` bins.
    ///
    /// Deterministic and pure; the same curve and length always produce the
    /// same vector.
    pub fn build(&self, length: usize) -> Vec<f32> {
        let mut mask = vec![0.0; length];
        let points = &self.points;
        let last = points.len() - 1;
        let mut seg = 0;

        for (i, slot) in mask.iter_mut().enumerate() {
            let x = i as f32;
            while seg < last && points[seg + 1].index <= x {
                seg += 1;
            }

            *slot = if x <= points[0].index {
                points[0].gain
            } else if seg == last {
                points[last].gain
            } else {
                let a = points[seg];
                let b = points[seg + 1];
                let t = (x - a.index) / (b.index - a.index);
                a.gain + (b.gain - a.gain) * t
            };
        }

        mask
    }
}

/// Control-point indices of the voice band-pass shape, for a 4096-sample
/// reference window. Passes roughly 1.5-11 kHz at 44.1 kHz with short
/// linear transitions on both flanks.
const VOICE_BAND_INDICES: [f32; 8] = [0.0, 290.0, 300.0, 380.0, 390.0, 1024.0, 2048.0, 4096.0];

/// Gains matching [`VOICE_BAND_INDICES`]
const VOICE_BAND_GAINS: [f32; 8] = [0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0];

/// Window size the voice-band indices were tuned against
const VOICE_BAND_REFERENCE_WINDOW: f32 = 4096.0;

/// The fixed voice band-pass curve, scaled to `window_size` bins.
pub fn voice_band(window_size: usize) -> MaskCurve {
    let scale = window_size as f32 / VOICE_BAND_REFERENCE_WINDOW;
    let points = VOICE_BAND_INDICES
        .iter()
        .zip(VOICE_BAND_GAINS.iter())
        .map(|(&index, &gain)| MaskPoint::new(index * scale, gain))
        .collect();
    // Scaling preserves strict ordering for any non-zero window
    MaskCurve { points }
}

/// Errors from mask-curve construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// No control points were given
    Empty,
    /// Control-point indices are not strictly increasing
    NonIncreasingIndices {
        /// Index of the first offending pair
        position: usize,
    },
}

impl std::fmt::Display for MaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskError::Empty => write!(f, "Mask curve needs at least one control point"),
            MaskError::NonIncreasingIndices { position } => {
                write!(f, "Control-point indices must be strictly increasing (pair {position})")
            }
        }
    }
}

impl std::error::Error for MaskError {}
