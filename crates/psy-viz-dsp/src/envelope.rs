//! Sidechain pump detection.
//!
//! An asymmetric attack/release follower tracks the sub-bass energy: the
//! attack constant (5 ms) is much faster than the release (150 ms), so a
//! rhythmically gated bassline produces the characteristic duck-and-recover
//! envelope shape. Rolling variance over the recent envelope then serves
//! as a periodicity heuristic. This is deliberately not a true
//! periodicity detector (no transform of the envelope itself): good
//! enough to drive visuals, not for BPM extraction.

use crate::history::History;

const ATTACK_TIME: f32 = 0.005;
const RELEASE_TIME: f32 = 0.15;

/// Envelope ring depth and the variance window within it.
const PUMP_HISTORY: usize = 64;
const PUMP_WINDOW: usize = 32;

/// Output of one [`EnvelopeTracker::track`] call.
#[derive(Clone, Copy, Debug)]
pub struct PumpReading {
    /// Current follower value (0-1).
    pub envelope: f32,
    /// How strongly the envelope is oscillating (0-1).
    pub amount: f32,
    /// Whether pumping is active this call.
    pub is_pumping: bool,
}

/// Attack/release follower over sub-bass energy with a variance-based
/// pump heuristic.
pub struct EnvelopeTracker {
    envelope: f32,
    previous_envelope: f32,
    history: History,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeTracker {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            envelope: 0.0,
            previous_envelope: 0.0,
            history: History::new(PUMP_HISTORY),
            attack_coeff: (-1.0 / (sample_rate * ATTACK_TIME)).exp(),
            release_coeff: (-1.0 / (sample_rate * RELEASE_TIME)).exp(),
        }
    }

    /// Advance the follower by one buffer of sub-bass energy.
    pub fn track(&mut self, sub_bass_energy: f32) -> PumpReading {
        let coeff = if sub_bass_energy > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * sub_bass_energy;

        self.history.push(self.envelope);

        let derivative = self.envelope - self.previous_envelope;
        self.previous_envelope = self.envelope;

        let variance = self.history.recent_variance(PUMP_WINDOW);
        let amount = (variance.sqrt() * 4.0).min(1.0);
        let is_pumping = amount > 0.3 && derivative.abs() > 0.02;

        PumpReading {
            envelope: self.envelope,
            amount,
            is_pumping,
        }
    }

    /// Snapshot of the trailing envelope values, oldest first.
    pub fn history(&self) -> Vec<f32> {
        self.history.snapshot()
    }
}
