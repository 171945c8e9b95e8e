//! Sub-bass energy extraction.

/// Sums spectral energy below a fixed cutoff into one normalized scalar.
///
/// The covered bin range is precomputed from the cutoff frequency and
/// the configured transform size.
pub struct SubBassExtractor {
    bin_count: usize,
}

impl SubBassExtractor {
    pub fn new(fft_size: usize, sample_rate: f32, cutoff_hz: f32) -> Self {
        let bin_width = sample_rate / fft_size as f32;
        Self {
            bin_count: (cutoff_hz / bin_width) as usize,
        }
    }

    /// RMS of the sub-bass bins, normalized with a reactivity-driven
    /// gain and clamped to [0, 1]. Returns 0 when the spectrum does not
    /// cover the cutoff range.
    pub fn extract(&self, magnitudes: &[f32], reactivity: f32) -> f32 {
        if self.bin_count == 0 || magnitudes.len() < self.bin_count {
            return 0.0;
        }

        let mut sum = 0.0;
        for &m in &magnitudes[..self.bin_count] {
            sum += m * m;
        }
        let rms = (sum / self.bin_count as f32).sqrt();

        (rms * 5.0 * (1.0 + reactivity)).min(1.0)
    }
}
