//! Native frequency analyser
//!
//! Mirrors what a browser `AnalyserNode` reports so the level meter behaves
//! the same on every platform: Blackman window over the most recent
//! `fft_size` samples, forward FFT, temporal smoothing, then dB scaled to
//! bytes between the configured min/max decibels.
//!
//! Nothing in this workspace decodes audio itself; browsers use the Web Audio
//! analyser instead. `NativeAudioGraph` is for embedders that own the PCM
//! stream: they push decoded frames into the [`SampleTap`] and pass the graph
//! to [`AudioLevelMeter::new`](crate::AudioLevelMeter::new).

use crate::analyser::{AudioGraph, FrequencyAnalyser};
use crate::error::{PlaybackError, Result};
use crate::types::AnalyserConfig;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32768;

/// Shared ring of the most recent mono samples
///
/// The audio thread pushes, the analyser reads.
#[derive(Debug, Clone)]
pub struct SampleTap {
    samples: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append samples, dropping the oldest beyond capacity
    pub fn push(&self, data: &[f32]) {
        let mut samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        samples.extend(data.iter().copied());
        let excess = samples.len().saturating_sub(self.capacity);
        samples.drain(..excess);
    }

    /// Append interleaved frames, averaged to mono
    pub fn push_interleaved(&self, data: &[f32], channels: usize) {
        if channels <= 1 {
            self.push(data);
            return;
        }
        let mono: Vec<f32> = data
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        self.push(&mono);
    }

    /// Copy the latest `out.len()` samples, zero-padded at the front
    fn copy_latest(&self, out: &mut [f32]) {
        let samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        let available = samples.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);
        for (dst, src) in out[pad..]
            .iter_mut()
            .zip(samples.iter().skip(samples.len() - available))
        {
            *dst = *src;
        }
    }
}

/// FFT-backed analyser over a [`SampleTap`]
pub struct FftAnalyser {
    tap: SampleTap,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    frame: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl FftAnalyser {
    pub fn new(tap: SampleTap, config: &AnalyserConfig) -> Result<Self> {
        let size = config.fft_size;
        if !size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&size) {
            return Err(PlaybackError::AnalyserUnavailable(format!(
                "FFT size must be a power of two in {MIN_FFT_SIZE}..={MAX_FFT_SIZE}, got {size}"
            )));
        }
        if config.max_decibels <= config.min_decibels {
            return Err(PlaybackError::AnalyserUnavailable(format!(
                "max_decibels ({}) must exceed min_decibels ({})",
                config.max_decibels, config.min_decibels
            )));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Ok(Self {
            tap,
            fft,
            window: blackman_window(size),
            smoothed: vec![0.0; size / 2],
            frame: vec![0.0; size],
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothing: config.smoothing.clamp(0.0, 1.0),
            min_db: config.min_decibels,
            max_db: config.max_decibels,
        })
    }

    fn analyse(&mut self) {
        self.tap.copy_latest(&mut self.frame);

        for ((dst, &sample), &w) in self.buffer.iter_mut().zip(&self.frame).zip(&self.window) {
            *dst = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let n = self.frame.len() as f32;
        let tau = self.smoothing;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(&self.buffer) {
            let magnitude = bin.norm() / n;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
        }
    }

    fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let scaled = 255.0 / (self.max_db - self.min_db) * (db - self.min_db);
        scaled.floor().clamp(0.0, 255.0) as u8
    }
}

impl FrequencyAnalyser for FftAnalyser {
    fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        for (dst, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            *dst = self.to_byte(magnitude);
        }
    }
}

fn blackman_window(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    let n = size as f32;
    (0..size)
        .map(|i| {
            let x = i as f32 / n;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}

/// Analysis graph for native playback: the decoder feeds a [`SampleTap`]
pub struct NativeAudioGraph {
    tap: SampleTap,
}

impl NativeAudioGraph {
    pub fn new(tap: SampleTap) -> Self {
        Self { tap }
    }
}

impl AudioGraph for NativeAudioGraph {
    fn connect(&mut self, config: &AnalyserConfig) -> Result<Box<dyn FrequencyAnalyser>> {
        Ok(Box::new(FftAnalyser::new(self.tap.clone(), config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_bin: usize, size: usize, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq_bin as f32 * i as f32 / size as f32).sin())
            .collect()
    }

    #[test]
    fn silence_reads_zero() {
        let tap = SampleTap::new(256);
        let mut analyser = FftAnalyser::new(tap, &AnalyserConfig::default()).unwrap();
        let mut out = vec![0u8; analyser.frequency_bin_count()];
        analyser.byte_frequency_data(&mut out);
        assert_eq!(analyser.frequency_bin_count(), 128);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_at_its_bin() {
        let tap = SampleTap::new(256);
        // quiet enough that the main lobe is not clipped at 255
        tap.push(&sine(8, 256, 256, 0.001));
        let config = AnalyserConfig {
            smoothing: 0.0,
            ..AnalyserConfig::default()
        };
        let mut analyser = FftAnalyser::new(tap, &config).unwrap();
        let mut out = vec![0u8; 128];
        analyser.byte_frequency_data(&mut out);

        let peak = out
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!(out[8] > out[40]);
    }

    #[test]
    fn smoothing_lags_behind_input() {
        let tap = SampleTap::new(256);
        let mut analyser = FftAnalyser::new(tap.clone(), &AnalyserConfig::default()).unwrap();
        let mut out = vec![0u8; 128];

        tap.push(&sine(8, 256, 256, 0.001));
        analyser.byte_frequency_data(&mut out);
        let first = out[8];
        analyser.byte_frequency_data(&mut out);
        assert!(out[8] >= first);
    }

    #[test]
    fn tap_keeps_latest_samples() {
        let tap = SampleTap::new(4);
        tap.push(&[1.0, 2.0, 3.0]);
        tap.push(&[4.0, 5.0]);
        let mut out = [0.0; 4];
        tap.copy_latest(&mut out);
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0]);

        let mut wide = [9.0; 6];
        tap.copy_latest(&mut wide);
        assert_eq!(wide, [0.0, 0.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn interleaved_is_mixed_down() {
        let tap = SampleTap::new(4);
        tap.push_interleaved(&[1.0, 3.0, -1.0, 1.0], 2);
        let mut out = [0.0; 2];
        tap.copy_latest(&mut out);
        assert_eq!(out, [2.0, 0.0]);
    }

    #[test]
    fn rejects_bad_fft_size() {
        let config = AnalyserConfig {
            fft_size: 100,
            ..AnalyserConfig::default()
        };
        let mut graph = NativeAudioGraph::new(SampleTap::new(100));
        assert!(graph.connect(&config).is_err());
    }
}
