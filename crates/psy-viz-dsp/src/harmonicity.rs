//! Harmonic-to-noise estimation via autocorrelation.

/// Longest time-domain window the estimator looks at.
const MAX_FRAME: usize = 512;
/// Shortest lag considered when searching for the harmonic peak; lag 0
/// and its neighborhood only ever hold the self-energy maximum.
const MIN_LAG: usize = 20;
/// Longest lag considered (≈110 Hz fundamental at 44.1 kHz).
const MAX_LAG: usize = 400;

/// Estimates how tonal versus noisy a time-domain frame is by comparing
/// the strongest autocorrelation peak against the residual floor past
/// the search window.
pub struct HarmonicityEstimator {
    autocorr: Vec<f32>,
}

impl HarmonicityEstimator {
    pub fn new() -> Self {
        Self {
            autocorr: vec![0.0; MAX_FRAME],
        }
    }

    /// Harmonicity of `frame` in [0, 1]; 0.5 (neutral) when the frame is
    /// too short for a meaningful lag search.
    pub fn estimate(&mut self, frame: &[f32]) -> f32 {
        let len = frame.len().min(MAX_FRAME);
        let max_lag = len.saturating_sub(1).min(MAX_LAG);
        if max_lag <= MIN_LAG {
            return 0.5;
        }

        for k in 0..len {
            let mut sum = 0.0;
            for n in k..len {
                sum += frame[n] * frame[n - k];
            }
            self.autocorr[k] = sum;
        }

        let peak = self.autocorr[MIN_LAG..=max_lag]
            .iter()
            .fold(0.0f32, |acc, &v| acc.max(v));

        let tail = &self.autocorr[max_lag..len];
        let noise_floor = tail.iter().map(|v| v.abs()).sum::<f32>() / tail.len() as f32;

        let hnr = peak / (peak + noise_floor.max(1e-4));
        hnr.clamp(0.0, 1.0)
    }
}

impl Default for HarmonicityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn short_frame_is_neutral() {
        let mut estimator = HarmonicityEstimator::new();
        assert_eq!(estimator.estimate(&[1.0; 16]), 0.5);
    }

    #[test]
    fn silence_reads_as_noise() {
        let mut estimator = HarmonicityEstimator::new();
        assert_eq!(estimator.estimate(&[0.0; 512]), 0.0);
    }

    #[test]
    fn tone_reads_as_harmonic() {
        let frame: Vec<f32> = (0..512)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let mut estimator = HarmonicityEstimator::new();
        let hnr = estimator.estimate(&frame);
        assert!(hnr > 0.5, "hnr {hnr}");
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let frame: Vec<f32> = (0..512)
            .map(|i| (2.0 * PI * 220.0 * i as f32 / 44100.0).sin())
            .collect();
        let mut estimator = HarmonicityEstimator::new();
        let first = estimator.estimate(&frame);
        let second = estimator.estimate(&frame);
        assert_eq!(first, second);
    }
}
