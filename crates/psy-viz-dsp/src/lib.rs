//! Real-time audio feature extraction for audio-reactive visuals.
//!
//! [`AnalysisEngine`] turns raw PCM buffers into one [`AnalysisFrame`]
//! per call: magnitude spectrum, mel-band energies, sub-bass energy,
//! sidechain pump detection, harmonicity, transient flags and spectral
//! centroid. Designed to run inside a latency-bounded audio callback:
//! no I/O, no locking, spectral resources preallocated per
//! configuration.

mod centroid;
mod engine;
mod envelope;
mod frame;
mod harmonicity;
mod history;
mod mel;
mod spectral;
mod sub_bass;
mod transient;

pub use engine::{AnalysisEngine, MEL_BAND_COUNT, SAMPLE_RATE, SUPPORTED_BUFFER_SIZES};
pub use envelope::{EnvelopeTracker, PumpReading};
pub use frame::AnalysisFrame;
pub use harmonicity::HarmonicityEstimator;
pub use mel::MelFilterbank;
pub use spectral::SpectralTransform;
pub use sub_bass::SubBassExtractor;
pub use transient::{PeakReading, TransientDetector};
