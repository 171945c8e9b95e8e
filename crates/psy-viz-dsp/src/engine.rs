//! The analysis engine: owns every component, exposes the single
//! per-buffer entry point.
//!
//! The engine is synchronous and not re-entrant. It is meant to run on
//! the audio callback thread; the caller must serialize `process` calls
//! and must not reconfigure concurrently with them. All spectral
//! resources are allocated at construction or reconfiguration time, so
//! the steady-state hot path only touches preallocated scratch; the
//! returned frame copies out of it.

use crate::centroid;
use crate::envelope::EnvelopeTracker;
use crate::frame::AnalysisFrame;
use crate::harmonicity::HarmonicityEstimator;
use crate::history::History;
use crate::mel::MelFilterbank;
use crate::spectral::SpectralTransform;
use crate::sub_bass::SubBassExtractor;
use crate::transient::TransientDetector;

/// Fixed analysis sample rate. Window and filterbank constants are
/// derived from it; feeding audio at another rate shifts every
/// frequency-mapped feature.
pub const SAMPLE_RATE: f32 = 44100.0;

/// Number of mel filterbank bands.
pub const MEL_BAND_COUNT: usize = 64;

/// Transform sizes the engine accepts.
pub const SUPPORTED_BUFFER_SIZES: [usize; 2] = [512, 1024];

/// Upper frequency bound of the sub-bass band.
const SUB_BASS_CUTOFF_HZ: f32 = 100.0;

/// Depth of the trailing sub-bass history exposed on each frame.
const SUB_BASS_HISTORY: usize = 128;

/// Real-time audio analysis engine.
///
/// Converts raw sample buffers into the perceptual and spectral
/// features of an [`AnalysisFrame`]. Every component carries smoothed
/// state across calls, so results are only meaningful in call order.
pub struct AnalysisEngine {
    fft_size: usize,
    reactivity: f32,
    /// One-pole coefficient shared by the spectral and mel smoothing,
    /// derived from reactivity.
    smoothing: f32,

    transform: SpectralTransform,
    filterbank: MelFilterbank,
    sub_bass: SubBassExtractor,
    envelope: EnvelopeTracker,
    harmonicity: HarmonicityEstimator,
    transient: TransientDetector,

    /// Persistent smoothed mel bands. Length is band count, not
    /// transform size, so it survives resizes.
    smoothed_mel: Vec<f32>,
    sub_bass_history: History,

    // Per-call scratch, sized to the transform.
    mel_scratch: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
    mono: Vec<f32>,
}

impl AnalysisEngine {
    /// Build an engine for the given transform size.
    ///
    /// `buffer_size` must be one of [`SUPPORTED_BUFFER_SIZES`].
    pub fn new(buffer_size: usize) -> Self {
        Self {
            fft_size: buffer_size,
            reactivity: 0.5,
            smoothing: 0.3,
            transform: SpectralTransform::new(buffer_size),
            filterbank: MelFilterbank::new(buffer_size, MEL_BAND_COUNT, SAMPLE_RATE),
            sub_bass: SubBassExtractor::new(buffer_size, SAMPLE_RATE, SUB_BASS_CUTOFF_HZ),
            envelope: EnvelopeTracker::new(SAMPLE_RATE),
            harmonicity: HarmonicityEstimator::new(),
            transient: TransientDetector::new(),
            smoothed_mel: vec![0.0; MEL_BAND_COUNT],
            sub_bass_history: History::new(SUB_BASS_HISTORY),
            mel_scratch: vec![0.0; MEL_BAND_COUNT],
            left: Vec::with_capacity(buffer_size),
            right: Vec::with_capacity(buffer_size),
            mono: Vec::with_capacity(buffer_size),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.fft_size
    }

    pub fn reactivity(&self) -> f32 {
        self.reactivity
    }

    /// Set reactivity (clamped to [0, 1]) and recompute the shared
    /// smoothing factor. Higher reactivity means less smoothing. Takes
    /// effect on the next `process` call; no other state is touched.
    pub fn set_reactivity(&mut self, value: f32) {
        self.reactivity = value.clamp(0.0, 1.0);
        self.smoothing = 0.1 + (1.0 - self.reactivity) * 0.4;
    }

    /// Reconfigure the transform size.
    ///
    /// Rebuilds the transform context, filterbank and scratch buffers
    /// from scratch. The sub-bass, pump and RMS histories are
    /// independent of the transform size and survive unchanged.
    /// Unsupported sizes are ignored, keeping the prior configuration.
    pub fn set_buffer_size(&mut self, size: usize) {
        if size == self.fft_size || !SUPPORTED_BUFFER_SIZES.contains(&size) {
            return;
        }

        self.fft_size = size;
        self.transform = SpectralTransform::new(size);
        self.filterbank = MelFilterbank::new(size, MEL_BAND_COUNT, SAMPLE_RATE);
        self.sub_bass = SubBassExtractor::new(size, SAMPLE_RATE, SUB_BASS_CUTOFF_HZ);
        self.left = Vec::with_capacity(size);
        self.right = Vec::with_capacity(size);
        self.mono = Vec::with_capacity(size);
    }

    /// Analyze one buffer of planar (per-channel) samples.
    ///
    /// One channel is duplicated to both sides; with three or more
    /// channels the extras are ignored. Absent channel data or a zero
    /// frame count yields [`AnalysisFrame::empty`].
    pub fn process(&mut self, channels: &[&[f32]], frame_count: usize) -> AnalysisFrame {
        let Some(first) = channels.first() else {
            return AnalysisFrame::empty();
        };
        let frames = frame_count.min(first.len()).min(self.fft_size);
        if frames == 0 {
            return AnalysisFrame::empty();
        }

        self.left.clear();
        self.left.extend_from_slice(&first[..frames]);

        self.right.clear();
        match channels.get(1) {
            Some(second) if second.len() >= frames => {
                self.right.extend_from_slice(&second[..frames]);
            }
            _ => self.right.extend_from_slice(&first[..frames]),
        }

        self.analyze(frames)
    }

    /// Analyze one buffer of interleaved samples, as delivered by a
    /// capture callback. Returns the empty frame for empty input or a
    /// zero channel count.
    pub fn process_interleaved(&mut self, data: &[f32], channel_count: usize) -> AnalysisFrame {
        if data.is_empty() || channel_count == 0 {
            return AnalysisFrame::empty();
        }
        let frames = (data.len() / channel_count).min(self.fft_size);
        if frames == 0 {
            return AnalysisFrame::empty();
        }

        self.left.clear();
        self.right.clear();
        for chunk in data.chunks_exact(channel_count).take(frames) {
            self.left.push(chunk[0]);
            self.right.push(if channel_count >= 2 { chunk[1] } else { chunk[0] });
        }

        self.analyze(frames)
    }

    /// Shared tail of both entry points: `left`/`right` hold `frames`
    /// samples each.
    fn analyze(&mut self, frames: usize) -> AnalysisFrame {
        self.mono.clear();
        for i in 0..frames {
            self.mono.push((self.left[i] + self.right[i]) * 0.5);
        }

        let rms =
            (self.mono.iter().map(|s| s * s).sum::<f32>() / frames as f32).sqrt();

        let magnitudes = self.transform.transform(&self.mono, self.smoothing);

        self.filterbank.apply(magnitudes, &mut self.mel_scratch);
        let sub_bass = self.sub_bass.extract(magnitudes, self.reactivity);
        let spectral_centroid = centroid::estimate(magnitudes);
        let magnitudes = magnitudes.to_vec();

        for (slot, &band) in self.smoothed_mel.iter_mut().zip(&self.mel_scratch) {
            *slot = *slot * self.smoothing + band * (1.0 - self.smoothing);
        }

        self.sub_bass_history.push(sub_bass);
        let pump = self.envelope.track(sub_bass);
        let harmonicity = self.harmonicity.estimate(&self.mono);
        let peak = self.transient.detect(rms, self.reactivity);

        AnalysisFrame {
            magnitudes,
            mel_bands: self.smoothed_mel.clone(),
            sub_bass,
            sub_bass_history: self.sub_bass_history.snapshot(),
            envelope: pump.envelope,
            pump_amount: pump.amount,
            is_pumping: pump.is_pumping,
            harmonicity,
            is_peak: peak.is_peak,
            peak_intensity: peak.intensity,
            left_channel: self.left.clone(),
            right_channel: self.right.clone(),
            spectral_centroid,
            rms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_channels_yield_empty_frame() {
        let mut engine = AnalysisEngine::new(1024);
        let frame = engine.process(&[], 1024);
        assert!(frame.magnitudes.is_empty());
        assert_eq!(frame.harmonicity, 0.5);
    }

    #[test]
    fn zero_frame_count_yields_empty_frame() {
        let mut engine = AnalysisEngine::new(1024);
        let samples = [0.1f32; 1024];
        let frame = engine.process(&[&samples], 0);
        assert!(frame.magnitudes.is_empty());
    }

    #[test]
    fn mono_input_duplicates_to_both_channels() {
        let mut engine = AnalysisEngine::new(1024);
        let samples: Vec<f32> = (0..1024).map(|i| (i % 7) as f32 * 0.1).collect();
        let frame = engine.process(&[&samples], 1024);
        assert_eq!(frame.left_channel, frame.right_channel);
    }

    #[test]
    fn reactivity_clamps_out_of_range_values() {
        let mut engine = AnalysisEngine::new(1024);
        engine.set_reactivity(3.0);
        assert_eq!(engine.reactivity(), 1.0);
        engine.set_reactivity(-1.0);
        assert_eq!(engine.reactivity(), 0.0);
    }

    #[test]
    fn unsupported_buffer_size_is_ignored() {
        let mut engine = AnalysisEngine::new(1024);
        engine.set_buffer_size(777);
        assert_eq!(engine.buffer_size(), 1024);
        engine.set_buffer_size(512);
        assert_eq!(engine.buffer_size(), 512);
    }

    #[test]
    fn extra_channels_are_ignored() {
        let mut engine = AnalysisEngine::new(512);
        let a = [0.2f32; 512];
        let b = [0.4f32; 512];
        let c = [0.9f32; 512];
        let frame = engine.process(&[&a, &b, &c], 512);
        assert_eq!(frame.left_channel[0], 0.2);
        assert_eq!(frame.right_channel[0], 0.4);
    }
}
