//! Transient/peak detection from the RMS level.

use crate::history::History;

/// Moving-average window over per-buffer RMS values.
const RMS_HISTORY: usize = 16;

/// Output of one [`TransientDetector::detect`] call.
#[derive(Clone, Copy, Debug)]
pub struct PeakReading {
    pub is_peak: bool,
    /// Strength of the detected peak (0-1); 0 when no peak fired.
    pub intensity: f32,
}

/// Flags sudden loudness increases against an adaptive threshold derived
/// from a short moving average of the RMS level.
pub struct TransientDetector {
    history: History,
    previous_rms: f32,
}

impl TransientDetector {
    pub fn new() -> Self {
        Self {
            history: History::new(RMS_HISTORY),
            previous_rms: 0.0,
        }
    }

    /// Classify the current buffer's RMS. The history and previous-RMS
    /// tracker update on every call regardless of the outcome.
    ///
    /// The current value enters the moving average before thresholding,
    /// so the average always includes this buffer.
    pub fn detect(&mut self, rms: f32, reactivity: f32) -> PeakReading {
        self.history.push(rms);
        let average = self.history.mean();

        let increase = rms - self.previous_rms;
        let threshold = average * (0.5 + reactivity * 0.5);

        self.previous_rms = rms;

        let is_peak = increase > threshold && rms > average * 1.5;
        let intensity = if is_peak {
            (increase / average.max(0.01) * 2.0).min(1.0)
        } else {
            0.0
        };

        PeakReading { is_peak, intensity }
    }
}

impl Default for TransientDetector {
    fn default() -> Self {
        Self::new()
    }
}
