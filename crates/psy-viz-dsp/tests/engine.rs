//! End-to-end engine scenarios: full buffers in, feature frames out.

use psy_viz_dsp::{AnalysisEngine, MEL_BAND_COUNT, SAMPLE_RATE};
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

fn white_noise(len: usize) -> Vec<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

fn peak_bin(magnitudes: &[f32]) -> usize {
    magnitudes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap()
}

#[test]
fn silent_stereo_buffer_yields_silent_frame() {
    let mut engine = AnalysisEngine::new(1024);
    let silence = vec![0.0f32; 1024];
    let frame = engine.process(&[&silence, &silence], 1024);

    assert_eq!(frame.magnitudes.len(), 512);
    assert!(frame.magnitudes.iter().all(|&m| m == 0.0));
    assert_eq!(frame.mel_bands.len(), MEL_BAND_COUNT);
    assert!(frame.mel_bands.iter().all(|&b| b == 0.0));
    assert_eq!(frame.sub_bass, 0.0);
    assert!(!frame.is_pumping);
    assert!(!frame.is_peak);
    assert_eq!(frame.spectral_centroid, 0.5);
    assert_eq!(frame.rms, 0.0);
}

#[test]
fn one_khz_tone_lands_in_the_expected_bin() {
    let mut engine = AnalysisEngine::new(1024);
    let tone = sine(1000.0, 1.0, 1024);
    let frame = engine.process(&[&tone, &tone], 1024);

    // 1000 * 1024 / 44100 = 23.2
    let bin = peak_bin(&frame.magnitudes);
    assert!((22..=24).contains(&bin), "dominant bin {bin}");
    assert!(frame.rms > 0.5);
}

#[test]
fn mel_bands_stay_in_unit_range() {
    let mut engine = AnalysisEngine::new(1024);
    let noise = white_noise(1024);
    let tone = sine(5000.0, 1.0, 1024);

    for _ in 0..20 {
        for buffer in [&noise, &tone] {
            let frame = engine.process(&[buffer.as_slice()], 1024);
            assert!(frame
                .mel_bands
                .iter()
                .all(|&b| (0.0..=1.0).contains(&b)));
        }
    }
}

#[test]
fn sub_bass_prefers_energy_below_the_cutoff() {
    let low_tone = sine(50.0, 1.0, 1024);
    let high_tone = sine(5000.0, 1.0, 1024);

    let mut low_engine = AnalysisEngine::new(1024);
    let mut high_engine = AnalysisEngine::new(1024);

    let mut low_energy = 0.0;
    let mut high_energy = 0.0;
    for _ in 0..10 {
        low_energy = low_engine.process(&[&low_tone], 1024).sub_bass;
        high_energy = high_engine.process(&[&high_tone], 1024).sub_bass;
    }

    assert!(
        low_energy > high_energy * 5.0,
        "low {low_energy} vs high {high_energy}"
    );
}

#[test]
fn noise_burst_after_long_silence_is_a_peak() {
    let mut engine = AnalysisEngine::new(1024);
    let silence = vec![0.0f32; 1024];
    for _ in 0..64 {
        let frame = engine.process(&[&silence, &silence], 1024);
        assert!(!frame.is_peak);
    }

    let noise = white_noise(1024);
    let frame = engine.process(&[&noise, &noise], 1024);
    assert!(frame.is_peak);
    assert!(frame.peak_intensity > 0.0);
}

#[test]
fn sustained_tone_stops_peaking_in_steady_state() {
    let mut engine = AnalysisEngine::new(1024);
    let tone = sine(1000.0, 0.8, 1024);
    for _ in 0..20 {
        engine.process(&[&tone], 1024);
    }
    for _ in 0..40 {
        assert!(!engine.process(&[&tone], 1024).is_peak);
    }
}

#[test]
fn higher_reactivity_converges_faster() {
    let tone = sine(1000.0, 1.0, 1024);

    let converge_calls = |reactivity: f32| -> usize {
        // Steady-state magnitude at the dominant bin for this setting.
        let mut reference = AnalysisEngine::new(1024);
        reference.set_reactivity(reactivity);
        let mut steady = 0.0;
        let mut bin = 0;
        for _ in 0..200 {
            let frame = reference.process(&[&tone], 1024);
            bin = peak_bin(&frame.magnitudes);
            steady = frame.magnitudes[bin];
        }

        let mut engine = AnalysisEngine::new(1024);
        engine.set_reactivity(reactivity);
        for call in 1..=200 {
            let frame = engine.process(&[&tone], 1024);
            if (frame.magnitudes[bin] - steady).abs() <= steady * 0.05 {
                return call;
            }
        }
        panic!("never converged at reactivity {reactivity}");
    };

    let fast = converge_calls(1.0);
    let slow = converge_calls(0.0);
    assert!(fast < slow, "fast {fast} vs slow {slow}");
}

#[test]
fn resizing_swaps_spectral_lengths_and_back() {
    let mut engine = AnalysisEngine::new(1024);
    let frame = engine.process(&[sine(1000.0, 1.0, 1024).as_slice()], 1024);
    assert_eq!(frame.magnitudes.len(), 512);

    engine.set_buffer_size(512);
    let frame = engine.process(&[sine(1000.0, 1.0, 512).as_slice()], 512);
    assert_eq!(frame.magnitudes.len(), 256);
    assert_eq!(frame.mel_bands.len(), MEL_BAND_COUNT);
    assert_eq!(frame.left_channel.len(), 512);

    engine.set_buffer_size(1024);
    let frame = engine.process(&[sine(1000.0, 1.0, 1024).as_slice()], 1024);
    assert_eq!(frame.magnitudes.len(), 512);
}

#[test]
fn histories_survive_a_resize() {
    let mut engine = AnalysisEngine::new(1024);
    let low_tone = sine(50.0, 1.0, 1024);
    for _ in 0..8 {
        engine.process(&[&low_tone], 1024);
    }
    let before = engine.process(&[&low_tone], 1024).sub_bass_history;

    engine.set_buffer_size(512);
    let after = engine
        .process(&[sine(50.0, 1.0, 512).as_slice()], 512)
        .sub_bass_history;

    assert_eq!(after.len(), before.len());
    // The pre-resize trail is still there, shifted by one push.
    assert_eq!(after[after.len() - 2], before[before.len() - 1]);
}

#[test]
fn interleaved_and_planar_inputs_agree() {
    let left = sine(440.0, 0.8, 1024);
    let right = sine(660.0, 0.6, 1024);
    let mut interleaved = Vec::with_capacity(2048);
    for i in 0..1024 {
        interleaved.push(left[i]);
        interleaved.push(right[i]);
    }

    let mut planar_engine = AnalysisEngine::new(1024);
    let mut interleaved_engine = AnalysisEngine::new(1024);

    let planar = planar_engine.process(&[&left, &right], 1024);
    let inter = interleaved_engine.process_interleaved(&interleaved, 2);

    assert_eq!(planar.rms, inter.rms);
    assert_eq!(planar.magnitudes, inter.magnitudes);
    assert_eq!(planar.left_channel, inter.left_channel);
    assert_eq!(planar.right_channel, inter.right_channel);
}

#[test]
fn short_buffers_are_analyzed_zero_padded() {
    let mut engine = AnalysisEngine::new(1024);
    let tone = sine(1000.0, 1.0, 600);
    let frame = engine.process(&[&tone], 600);

    assert_eq!(frame.magnitudes.len(), 512);
    assert_eq!(frame.left_channel.len(), 600);
    assert!(frame.rms > 0.0);
}

#[test]
fn tone_is_more_harmonic_than_noise() {
    let mut tone_engine = AnalysisEngine::new(1024);
    let mut noise_engine = AnalysisEngine::new(1024);

    let tone_frame = tone_engine.process(&[sine(220.0, 1.0, 1024).as_slice()], 1024);
    let noise = white_noise(1024);
    let noise_frame = noise_engine.process(&[noise.as_slice()], 1024);

    assert!(tone_frame.harmonicity > 0.5);
    assert!(noise_frame.harmonicity >= 0.0 && noise_frame.harmonicity <= 1.0);
}

#[test]
fn brightness_follows_the_tone() {
    let mut dark_engine = AnalysisEngine::new(1024);
    let mut bright_engine = AnalysisEngine::new(1024);

    let dark = dark_engine.process(&[sine(200.0, 1.0, 1024).as_slice()], 1024);
    let bright = bright_engine.process(&[sine(12000.0, 1.0, 1024).as_slice()], 1024);

    assert!(bright.spectral_centroid > dark.spectral_centroid);
}
