// src/utils/mfcc.rs
//! Mel-frequency cepstral coefficients for audio inputs.

use crate::core::{ComponentError, Result};
use ndarray::{Array1, Array2, Axis};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;

const PRE_EMPHASIS: f64 = 0.97;
const FRAME_SIZE: f64 = 0.025;
const FRAME_STRIDE: f64 = 0.01;
const NFFT: usize = 512;
const NUM_FILTERS: usize = 40;
const NUM_CEPS: usize = 12;
const CEP_LIFTER: f64 = 22.0;

/// Computes mean-normalized MFCC features of shape `(frames, 12)`.
///
/// `samples` is `(frames, channels)`; channels are averaged to mono first.
pub fn mfcc_features(samples: &Array2<f32>, sample_rate: u32) -> Result<Array2<f64>> {
    if sample_rate == 0 {
        return Err(ComponentError::InvalidInput(
            "sample rate must be positive".to_string(),
        ));
    }
    let signal: Array1<f64> = match samples.mean_axis(Axis(1)) {
        Some(mono) => mono.mapv(f64::from),
        None => Array1::zeros(0),
    };
    if signal.is_empty() {
        return Err(ComponentError::InvalidInput(
            "cannot extract features from empty audio".to_string(),
        ));
    }

    let mut emphasized = Vec::with_capacity(signal.len());
    emphasized.push(signal[0]);
    for i in 1..signal.len() {
        emphasized.push(signal[i] - PRE_EMPHASIS * signal[i - 1]);
    }

    let rate = f64::from(sample_rate);
    let frame_length = ((FRAME_SIZE * rate).round() as usize).max(1);
    let frame_step = ((FRAME_STRIDE * rate).round() as usize).max(1);
    let num_frames = {
        let diff = emphasized.len().abs_diff(frame_length) as f64;
        ((diff / frame_step as f64).ceil() as usize).max(1)
    };
    emphasized.resize(num_frames * frame_step + frame_length, 0.0);

    let window: Vec<f64> = (0..frame_length)
        .map(|n| {
            if frame_length == 1 {
                1.0
            } else {
                0.54 - 0.46 * (2.0 * PI * n as f64 / (frame_length - 1) as f64).cos()
            }
        })
        .collect();

    let bins = NFFT / 2 + 1;
    let fbank = mel_filterbank(rate, bins);
    let mut features = Array2::<f64>::zeros((num_frames, NUM_CEPS));

    let mut planner = FftPlanner::<f64>::new();
    let spectrum_fft = planner.plan_fft_forward(NFFT);
    let dct_fft = planner.plan_fft_forward(NUM_FILTERS);

    let mut frame = vec![Complex::new(0.0, 0.0); NFFT];
    for f in 0..num_frames {
        let start = f * frame_step;
        frame.iter_mut().for_each(|v| *v = Complex::new(0.0, 0.0));
        // Frames longer than the transform are truncated, shorter ones zero padded.
        for (n, slot) in frame.iter_mut().enumerate().take(frame_length.min(NFFT)) {
            *slot = Complex::new(emphasized[start + n] * window[n], 0.0);
        }
        let power = power_spectrum(spectrum_fft.as_ref(), &mut frame);
        let energies: Vec<f64> = fbank
            .outer_iter()
            .map(|filter| {
                let e: f64 = filter.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
                let e = if e == 0.0 { f64::EPSILON } else { e };
                20.0 * e.log10()
            })
            .collect();
        let ceps = dct_ortho(dct_fft.as_ref(), &energies);
        for c in 0..NUM_CEPS {
            let lift = 1.0 + (CEP_LIFTER / 2.0) * (PI * c as f64 / CEP_LIFTER).sin();
            features[[f, c]] = ceps[c + 1] * lift;
        }
    }

    if let Some(mean) = features.mean_axis(Axis(0)) {
        features -= &(mean + 1e-8);
    }
    Ok(features)
}

/// One-sided power spectrum `|X[k]|^2 / N` of a frame, transformed in place.
fn power_spectrum(fft: &dyn Fft<f64>, frame: &mut [Complex<f64>]) -> Vec<f64> {
    let n = frame.len();
    fft.process(frame);
    frame[..n / 2 + 1]
        .iter()
        .map(|c| c.norm_sqr() / n as f64)
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

fn mel_filterbank(rate: f64, bins: usize) -> Array2<f64> {
    let high = hz_to_mel(rate / 2.0);
    let points: Vec<usize> = (0..NUM_FILTERS + 2)
        .map(|i| {
            let mel = high * i as f64 / (NUM_FILTERS + 1) as f64;
            (((NFFT + 1) as f64 * mel_to_hz(mel)) / rate).floor() as usize
        })
        .collect();
    let mut fbank = Array2::<f64>::zeros((NUM_FILTERS, bins));
    for m in 1..=NUM_FILTERS {
        let (left, center, right) = (points[m - 1], points[m], points[m + 1]);
        for k in left..center.min(bins) {
            fbank[[m - 1, k]] = (k - left) as f64 / (center - left) as f64;
        }
        for k in center..right.min(bins) {
            fbank[[m - 1, k]] = (right - k) as f64 / (right - center) as f64;
        }
    }
    fbank
}

/// Orthonormal DCT-II through an `x.len()`-point FFT (Makhoul reordering).
fn dct_ortho(fft: &dyn Fft<f64>, x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    let mut y = vec![Complex::new(0.0, 0.0); n];
    for (k, &v) in x.iter().step_by(2).enumerate() {
        y[k] = Complex::new(v, 0.0);
    }
    for (k, &v) in x.iter().skip(1).step_by(2).enumerate() {
        y[n - 1 - k] = Complex::new(v, 0.0);
    }
    fft.process(&mut y);

    let scale = (2.0 / n as f64).sqrt();
    let mut out: Vec<f64> = y
        .iter()
        .enumerate()
        .map(|(k, &c)| {
            let twiddle = Complex::from_polar(1.0, -PI * k as f64 / (2.0 * n as f64));
            (c * twiddle).re * scale
        })
        .collect();
    out[0] /= std::f64::consts::SQRT_2;
    out
}
