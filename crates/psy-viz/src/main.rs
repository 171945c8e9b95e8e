mod capture;
mod config;
mod meter;

use anyhow::Result;
use capture::SourcePipe;
use config::Config;
use psy_viz_dsp::AnalysisEngine;
use std::env;
use std::io::Write;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--list-devices".to_string()) {
        SourcePipe::list_devices();
        return Ok(());
    }

    let mut config = Config::load();
    let buffer_size = config.buffer_size();

    let mut engine = AnalysisEngine::new(buffer_size);
    engine.set_reactivity(config.reactivity());

    let mut source = SourcePipe::new(buffer_size, &config);
    if source.device_count() == 0 {
        anyhow::bail!("no audio devices available");
    }

    // --device <name> overrides the configured device for this run
    if let Some(pos) = args.iter().position(|a| a == "--device") {
        if let Some(name) = args.get(pos + 1) {
            match source.select_device_by_name(name, &mut config) {
                Some((device, true)) => log::info!("Using device: {}", device),
                Some((device, false)) => log::warn!("Could not open device: {}", device),
                None => log::warn!("No device matching '{}'", name),
            }
        }
    }

    log::info!(
        "Analyzing at {} Hz, {}-sample buffers, reactivity {:.2}",
        psy_viz_dsp::SAMPLE_RATE,
        buffer_size,
        engine.reactivity()
    );

    // The capture callback fills a rolling window; this loop takes the
    // latest snapshot at roughly visual frame rate, runs the engine and
    // redraws the meter line. Engine calls stay on this one thread, so
    // processing and reconfiguration are never concurrent.
    let stdout = std::io::stdout();
    loop {
        let (samples, channels) = source.snapshot();
        let frame = engine.process_interleaved(&samples, channels);

        let mut out = stdout.lock();
        let _ = write!(out, "\r{}", meter::line(&frame));
        let _ = out.flush();

        thread::sleep(Duration::from_millis(16));
    }
}
