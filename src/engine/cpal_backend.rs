//! Device output through cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, SupportedStreamConfig};

use crate::engine::callback::RenderCallback;
use crate::engine::stream::{AudioBackend, OutputStream, StreamFormat, StreamRequest};
use crate::error::{EngineError, Result};

/// Opens f32 streams on the default host's default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Pick an f32 config, at the requested rate if the device can run it.
fn select_config(device: &cpal::Device, request: &StreamRequest) -> Result<SupportedStreamConfig> {
    let ranges: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| EngineError::UnsupportedFormat(e.to_string()))?
        .filter(|range| range.sample_format() == SampleFormat::F32)
        .collect();

    let rate = SampleRate(request.sample_rate);
    let at_rate = |range: &&cpal::SupportedStreamConfigRange| {
        range.min_sample_rate() <= rate && range.max_sample_rate() >= rate
    };

    // Exact channel count first, then any channel count
    if let Some(range) = ranges
        .iter()
        .filter(at_rate)
        .find(|range| range.channels() == request.channels)
        .or_else(|| ranges.iter().find(at_rate))
    {
        return Ok(range.clone().with_sample_rate(rate));
    }

    if let Ok(default) = device.default_output_config() {
        if default.sample_format() == SampleFormat::F32 {
            log::warn!(
                "device cannot run at {} Hz, using its default {} Hz",
                request.sample_rate,
                default.sample_rate().0
            );
            return Ok(default);
        }
    }

    ranges
        .into_iter()
        .next()
        .map(|range| range.with_max_sample_rate())
        .ok_or_else(|| EngineError::UnsupportedFormat("device has no f32 output".into()))
}

impl AudioBackend for CpalBackend {
    type Stream = CpalStream;

    fn open<F>(&mut self, request: &StreamRequest, build: F) -> Result<CpalStream>
    where
        F: FnOnce(StreamFormat) -> RenderCallback,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;

        let supported = select_config(&device, request)?;
        let config = supported.config();
        let format = StreamFormat {
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        };
        log::info!(
            "output device {:?}: {} Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            format.sample_rate,
            format.channels
        );

        let mut callback = build(format);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback.render(data);
                },
                |err| log::error!("output stream error: {}", err),
                None,
            )
            .map_err(|e| EngineError::BuildStream(e.to_string()))?;

        Ok(CpalStream { stream, format })
    }
}

pub struct CpalStream {
    stream: cpal::Stream,
    format: StreamFormat,
}

impl OutputStream for CpalStream {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn start(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| EngineError::PlayStream(e.to_string()))
    }

    fn stop(&mut self) -> Result<()> {
        self.stream
            .pause()
            .map_err(|e| EngineError::PauseStream(e.to_string()))
    }
}
