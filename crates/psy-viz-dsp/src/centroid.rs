//! Spectral centroid ("brightness") estimation.

/// Energy-weighted average bin of the magnitude spectrum, normalized by
/// bin count and clamped to [0, 1]. A zero-energy spectrum has no
/// meaningful centroid and reads as a neutral 0.5.
pub fn estimate(magnitudes: &[f32]) -> f32 {
    let mut weighted_sum = 0.0;
    let mut sum = 0.0;
    for (i, &m) in magnitudes.iter().enumerate() {
        weighted_sum += i as f32 * m;
        sum += m;
    }

    if sum <= 0.0 {
        return 0.5;
    }

    (weighted_sum / sum / magnitudes.len() as f32).clamp(0.0, 1.0)
}
