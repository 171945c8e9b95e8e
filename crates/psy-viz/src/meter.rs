//! One-line terminal feature meter.
//!
//! Stands in for a real renderer at the analysis boundary: every frame
//! is reduced to a single status line of bars and flags.

use psy_viz_dsp::AnalysisFrame;

const BAR_WIDTH: usize = 16;

fn bar(value: f32, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f32).round() as usize;
    let mut out = String::with_capacity(width);
    for i in 0..width {
        out.push(if i < filled { '#' } else { '.' });
    }
    out
}

/// Render one frame as a status line.
pub fn line(frame: &AnalysisFrame) -> String {
    format!(
        "sub[{}] env[{}] pump {:4.2}{} bright {:4.2} hnr {:4.2} rms {:5.3}{}",
        bar(frame.sub_bass, BAR_WIDTH),
        bar(frame.envelope, BAR_WIDTH),
        frame.pump_amount,
        if frame.is_pumping { " PUMP" } else { "     " },
        frame.spectral_centroid,
        frame.harmonicity,
        frame.rms,
        if frame.is_peak { " *PEAK*" } else { "" },
    )
}
