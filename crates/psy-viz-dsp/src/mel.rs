//! Perceptually spaced triangular filterbank.
//!
//! Fully determined by (fft size, band count, sample rate) and built once
//! per configuration; the engine rebuilds it from scratch whenever the
//! transform size changes. The filterbank itself carries no mutable
//! state so it can be tested in isolation.

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Bank of overlapping triangular filters mapping linear FFT bins onto
/// mel-spaced bands.
pub struct MelFilterbank {
    /// One weight vector of length `fft_size / 2` per band.
    filters: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build the filterbank for `band_count` bands between 20 Hz and
    /// Nyquist.
    ///
    /// Boundary frequencies are mapped to bins by integer truncation.
    /// At low frequencies adjacent boundaries can land on the same bin,
    /// collapsing a triangle to a zero-width spike or an all-zero
    /// filter. Downstream consumers see that exact shape, so it is kept
    /// rather than widened.
    pub fn new(fft_size: usize, band_count: usize, sample_rate: f32) -> Self {
        let half = fft_size / 2;
        let nyquist = sample_rate / 2.0;

        let mel_min = hz_to_mel(20.0);
        let mel_max = hz_to_mel(nyquist);

        // band_count + 2 equally spaced mel points: each band uses three
        // consecutive points as (start, center, end).
        let bins: Vec<usize> = (0..band_count + 2)
            .map(|i| {
                let mel = mel_min + i as f32 * (mel_max - mel_min) / (band_count + 1) as f32;
                (mel_to_hz(mel) / nyquist * half as f32) as usize
            })
            .collect();

        let mut filters = Vec::with_capacity(band_count);
        for m in 1..=band_count {
            let mut filter = vec![0.0; half];
            let start = bins[m - 1];
            let center = bins[m];
            let end = bins[m + 1];

            // Rising edge
            for k in start..center {
                filter[k] = (k - start) as f32 / (center - start) as f32;
            }
            // Falling edge
            for k in center..end {
                filter[k] = (end - k) as f32 / (end - center) as f32;
            }

            filters.push(filter);
        }

        Self { filters }
    }

    pub fn band_count(&self) -> usize {
        self.filters.len()
    }

    /// Reduce a magnitude spectrum to compressed band energies.
    ///
    /// Each band is the weighted sum of the spectrum against its filter,
    /// compressed with `log10(1 + 10s) / log10(11)` so a unit-sum band
    /// maps to 1.0. `bands` must hold `band_count` slots.
    pub fn apply(&self, magnitudes: &[f32], bands: &mut [f32]) {
        for (band, filter) in bands.iter_mut().zip(&self.filters) {
            let count = filter.len().min(magnitudes.len());
            let mut sum = 0.0;
            for j in 0..count {
                sum += magnitudes[j] * filter[j];
            }
            *band = (1.0 + sum * 10.0).log10() / 11.0f32.log10();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_scale_round_trips() {
        for hz in [20.0, 100.0, 1000.0, 10000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() / hz < 1e-4);
        }
    }

    #[test]
    fn filterbank_has_requested_bands() {
        let bank = MelFilterbank::new(1024, 64, 44100.0);
        assert_eq!(bank.band_count(), 64);
    }

    #[test]
    fn weights_stay_in_unit_range() {
        let bank = MelFilterbank::new(1024, 64, 44100.0);
        for filter in &bank.filters {
            assert_eq!(filter.len(), 512);
            assert!(filter.iter().all(|&w| (0.0..=1.0).contains(&w)));
        }
    }

    #[test]
    fn silence_maps_to_zero_bands() {
        let bank = MelFilterbank::new(1024, 64, 44100.0);
        let mut bands = [1.0; 64];
        bank.apply(&[0.0; 512], &mut bands);
        assert!(bands.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn unit_band_sum_compresses_to_one() {
        // A spectrum that puts weighted sum 1.0 into a band must come out
        // as exactly 1.0 after compression.
        assert!(((1.0f32 + 10.0).log10() / 11.0f32.log10() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn low_frequency_filters_may_collapse() {
        // With 64 bands over a 512-bin spectrum the lowest mel boundaries
        // truncate to the same bin. That degenerate shape is part of the
        // contract; make sure construction tolerates it.
        let bank = MelFilterbank::new(512, 64, 44100.0);
        let zero_width = bank
            .filters
            .iter()
            .filter(|f| f.iter().all(|&w| w == 0.0))
            .count();
        assert!(zero_width > 0);
    }
}
