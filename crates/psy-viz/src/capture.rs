//! Audio capture via cpal.
//!
//! Keeps a rolling window of raw interleaved samples filled from the
//! capture callback. The analysis engine does its own mono mixing, so
//! the window stays interleaved and carries the device channel count
//! with it. Snapshots are latest-value-wins: the consumer only ever
//! sees the most recent window, never a queue.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;

/// Rolling interleaved capture window shared with the stream callback.
struct CaptureWindow {
    samples: Vec<f32>,
    channels: usize,
}

pub struct DeviceInfo {
    pub device: cpal::Device,
    pub name: String,
    pub is_input: bool,
}

pub struct SourcePipe {
    window: Arc<Mutex<CaptureWindow>>,
    devices: Vec<DeviceInfo>,
    current_device: usize,
    _stream: Option<Stream>,
    /// Frames (not samples) kept in the rolling window.
    window_frames: usize,
    input_gain: f32,
}

impl SourcePipe {
    pub fn new(window_frames: usize, config: &Config) -> Self {
        let devices = Self::collect_devices();
        let window = Arc::new(Mutex::new(CaptureWindow {
            samples: vec![0.0; window_frames],
            channels: 1,
        }));

        // Restore the last used device, then fall back to the usual
        // Linux suspects, then to loopback on the default output.
        let start_index = config
            .last_device
            .as_ref()
            .and_then(|name| {
                let is_input = config.last_device_is_input.unwrap_or(false);
                devices
                    .iter()
                    .position(|d| d.name == *name && d.is_input == is_input)
            })
            .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pipewire"))
            .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pulse"))
            .or_else(|| {
                let host = cpal::default_host();
                let default_output_name = host.default_output_device().and_then(|d| d.name().ok());
                default_output_name
                    .and_then(|name| devices.iter().position(|d| !d.is_input && d.name == name))
            })
            .unwrap_or(0);

        let stream = if !devices.is_empty() {
            Self::build_stream(
                &devices[start_index],
                Arc::clone(&window),
                window_frames,
                config.device_timeout_secs(),
            )
        } else {
            log::error!("No audio devices found");
            None
        };

        if stream.is_some() {
            let info = &devices[start_index];
            let device_type = if info.is_input { "input" } else { "output" };
            log::info!("[{}] Selected: {} ({})", start_index, info.name, device_type);
        }

        Self {
            window,
            devices,
            current_device: start_index,
            _stream: stream,
            window_frames,
            input_gain: config.input_gain(),
        }
    }

    pub fn list_devices() {
        let host = cpal::default_host();
        println!("\n=== Audio Devices ===");

        let mut idx = 0;
        if let Ok(inputs) = host.input_devices() {
            for device in inputs {
                if let Ok(name) = device.name() {
                    println!("  [{}] {} (input)", idx, name);
                    idx += 1;
                }
            }
        }
        if let Ok(outputs) = host.output_devices() {
            for device in outputs {
                if let Ok(name) = device.name() {
                    println!("  [{}] {} (output)", idx, name);
                    idx += 1;
                }
            }
        }
        println!();
    }

    fn collect_devices() -> Vec<DeviceInfo> {
        let host = cpal::default_host();
        let mut devices = Vec::new();

        if let Ok(input_devices) = host.input_devices() {
            for device in input_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo {
                        device,
                        name,
                        is_input: true,
                    });
                }
            }
        }

        if let Ok(output_devices) = host.output_devices() {
            for device in output_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo {
                        device,
                        name,
                        is_input: false,
                    });
                }
            }
        }

        devices
    }

    /// Get device config with a timeout (the config call often hangs on
    /// bad devices).
    fn get_config_with_timeout(
        device: &Device,
        is_input: bool,
        timeout_secs: u64,
    ) -> Option<StreamConfig> {
        let timeout = Duration::from_secs(timeout_secs);
        let device_clone = device.clone();

        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let config = if is_input {
                device_clone.default_input_config()
            } else {
                device_clone.default_output_config()
            };
            let _ = tx.send(config);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(config)) => Some(config.into()),
            Ok(Err(e)) => {
                log::warn!("Failed to get device config: {}", e);
                None
            }
            Err(_) => {
                log::warn!("Device config timed out after {:?}", timeout);
                None
            }
        }
    }

    fn build_stream(
        device_info: &DeviceInfo,
        window: Arc<Mutex<CaptureWindow>>,
        window_frames: usize,
        timeout_secs: u64,
    ) -> Option<Stream> {
        let stream_config =
            Self::get_config_with_timeout(&device_info.device, device_info.is_input, timeout_secs)?;
        let channels = (stream_config.channels as usize).max(1);

        {
            let mut win = window.lock().unwrap();
            win.channels = channels;
            win.samples.clear();
            win.samples.resize(window_frames * channels, 0.0);
        }

        let err_fn = |err| log::error!("Audio stream error: {}", err);
        let capacity = window_frames * channels;

        let stream = device_info.device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut win = window.lock().unwrap();
                win.samples.extend_from_slice(data);
                let excess = win.samples.len().saturating_sub(capacity);
                if excess > 0 {
                    win.samples.drain(..excess);
                }
            },
            err_fn,
            None,
        );

        match stream {
            Ok(s) => {
                if let Err(e) = s.play() {
                    log::warn!("Failed to play stream: {}", e);
                    return None;
                }
                Some(s)
            }
            Err(e) => {
                log::warn!("Failed to build stream: {}", e);
                None
            }
        }
    }

    /// Attempts to select a device.
    /// Returns Some((device_name, success)) if a switch was attempted,
    /// None if the index is invalid.
    pub fn select_device(&mut self, index: usize, config: &mut Config) -> Option<(String, bool)> {
        if index >= self.devices.len() {
            return None;
        }
        if index == self.current_device {
            let info = &self.devices[index];
            return Some((info.name.clone(), true));
        }

        let info = &self.devices[index];
        let device_name = info.name.clone();
        let is_input = info.is_input;
        log::info!("[{}] Selecting: {}", index, device_name);

        if let Some(stream) = Self::build_stream(
            info,
            Arc::clone(&self.window),
            self.window_frames,
            config.device_timeout_secs(),
        ) {
            self._stream = Some(stream);
            self.current_device = index;
            config.set_device(&device_name, is_input);
            Some((device_name, true))
        } else {
            Some((device_name, false))
        }
    }

    /// Select a device by name (partial match, case-insensitive).
    pub fn select_device_by_name(&mut self, name: &str, config: &mut Config) -> Option<(String, bool)> {
        let name_lower = name.to_lowercase();
        let index = self
            .devices
            .iter()
            .position(|d| d.name.to_lowercase().contains(&name_lower))?;
        self.select_device(index, config)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Copy out the most recent capture window with the input gain
    /// applied. Returns the interleaved samples and the channel count.
    pub fn snapshot(&self) -> (Vec<f32>, usize) {
        let win = self.window.lock().unwrap();
        let gain = self.input_gain;
        let samples = win
            .samples
            .iter()
            .map(|s| (s * gain).clamp(-1.0, 1.0))
            .collect();
        (samples, win.channels)
    }
}
