//! Windowed forward FFT with exponential smoothing.
//!
//! One transform context per configured size: the rustfft plan, the
//! analysis window and the work buffers are built together and torn down
//! together when the engine is reconfigured. Nothing here is shared
//! between instances.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Spectral transform over a mono frame.
///
/// Produces `fft_size / 2` magnitude bins normalized by the transform
/// size, smoothed across calls with a one-pole filter whose coefficient
/// the engine derives from the reactivity setting.
pub struct SpectralTransform {
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    window: Vec<f32>,
    /// Persistent smoothed magnitude spectrum (length `fft_size / 2`).
    smoothed: Vec<f32>,
    fft_size: usize,
}

impl SpectralTransform {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Hann window scaled to unit RMS so windowing does not change
        // the reported energy level.
        let norm = (8.0f32 / 3.0).sqrt();
        let window: Vec<f32> = (0..fft_size)
            .map(|i| norm * 0.5 * (1.0 - (2.0 * PI * i as f32 / fft_size as f32).cos()))
            .collect();

        Self {
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            window,
            smoothed: vec![0.0; fft_size / 2],
            fft_size,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// The smoothed spectrum from the most recent [`transform`] call.
    ///
    /// [`transform`]: SpectralTransform::transform
    pub fn magnitudes(&self) -> &[f32] {
        &self.smoothed
    }

    /// Window the frame, run the forward FFT and fold the new magnitudes
    /// into the smoothed spectrum.
    ///
    /// Frames shorter than the transform size are zero-padded. Returns
    /// the smoothed spectrum.
    pub fn transform(&mut self, frame: &[f32], smoothing: f32) -> &[f32] {
        let count = frame.len().min(self.fft_size);

        for i in 0..self.fft_size {
            if i < count {
                self.fft_buffer[i] = Complex::new(frame[i] * self.window[i], 0.0);
            } else {
                self.fft_buffer[i] = Complex::new(0.0, 0.0);
            }
        }

        self.fft.process(&mut self.fft_buffer);

        let scale = 1.0 / self.fft_size as f32;
        for (i, slot) in self.smoothed.iter_mut().enumerate() {
            let c = self.fft_buffer[i];
            let magnitude = (c.re * c.re + c.im * c.im).sqrt() * scale;
            *slot = *slot * smoothing + magnitude * (1.0 - smoothing);
        }

        &self.smoothed
    }
}
