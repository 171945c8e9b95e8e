//! Per-buffer analysis result.

use crate::engine::MEL_BAND_COUNT;

/// Everything the engine extracts from one audio buffer.
///
/// An owned value: the engine's internal buffers never escape by
/// reference, so a frame stays valid while the engine mutates its state
/// on the next call. Hand-off to a render thread should copy the frame
/// or keep only the latest one; stale frames carry no value.
#[derive(Clone, Debug)]
pub struct AnalysisFrame {
    /// Smoothed magnitude spectrum (`fft_size / 2` bins).
    pub magnitudes: Vec<f32>,
    /// Smoothed mel-band energies (64 bands, each 0-1).
    pub mel_bands: Vec<f32>,
    /// RMS energy below 100 Hz (0-1).
    pub sub_bass: f32,
    /// Trailing sub-bass energy, oldest first (128 values).
    pub sub_bass_history: Vec<f32>,
    /// Sidechain envelope follower value (0-1).
    pub envelope: f32,
    /// Detected pumping amount (0-1).
    pub pump_amount: f32,
    /// Whether sidechain pumping is active.
    pub is_pumping: bool,
    /// Harmonic-to-noise ratio (0 = noise, 1 = pure harmonic).
    pub harmonicity: f32,
    /// Whether a transient peak was detected this buffer.
    pub is_peak: bool,
    /// Strength of the detected peak (0-1).
    pub peak_intensity: f32,
    /// Left channel input samples.
    pub left_channel: Vec<f32>,
    /// Right channel input samples (copy of left for mono input).
    pub right_channel: Vec<f32>,
    /// Normalized spectral centroid (0-1).
    pub spectral_centroid: f32,
    /// Overall RMS level of the mono mix.
    pub rms: f32,
}

impl AnalysisFrame {
    /// The degenerate frame returned for absent or empty input.
    ///
    /// Scalar features with a neutral fallback (harmonicity, centroid)
    /// sit at 0.5; everything else is zero, false or empty.
    pub fn empty() -> Self {
        Self {
            magnitudes: Vec::new(),
            mel_bands: vec![0.0; MEL_BAND_COUNT],
            sub_bass: 0.0,
            sub_bass_history: Vec::new(),
            envelope: 0.0,
            pump_amount: 0.0,
            is_pumping: false,
            harmonicity: 0.5,
            is_peak: false,
            peak_intensity: 0.0,
            left_channel: Vec::new(),
            right_channel: Vec::new(),
            spectral_centroid: 0.5,
            rms: 0.0,
        }
    }
}

impl Default for AnalysisFrame {
    fn default() -> Self {
        Self::empty()
    }
}
