// src/utils/samples.rs
//! Built-in sample media used as test inputs for the image and audio components.

use crate::core::{Result, Samples};
use crate::utils::processing::{encode_array_to_base64, encode_wav_to_base64, WavData};
use ndarray::{Array2, Array3};
use std::f64::consts::PI;

const SAMPLE_IMAGE_SIZE: usize = 32;
const SAMPLE_RATE: u32 = 16_000;

/// PNG data URI of a 32x32 RGB image: a diagonal gradient with a bright square in
/// the upper-left quadrant, so segmentation has more than one region to find.
pub fn sample_image_uri() -> Result<String> {
    let n = SAMPLE_IMAGE_SIZE;
    let pixels = Array3::from_shape_fn((n, n, 3), |(y, x, c)| {
        if y < n / 2 && x < n / 2 {
            [240, 200, 40][c]
        } else {
            let ramp = (255 * (x + y) / (2 * n - 2)) as u8;
            [ramp / 4, ramp / 2, ramp][c]
        }
    });
    encode_array_to_base64(&pixels)
}

/// WAV data URI of half a second of a 440 Hz tone, 16-bit mono at 16 kHz.
pub fn sample_wav_uri() -> Result<String> {
    let frames = SAMPLE_RATE as usize / 2;
    let tone = Array2::from_shape_fn((frames, 1), |(i, _)| {
        let t = i as f64 / f64::from(SAMPLE_RATE);
        (8000.0 * (2.0 * PI * 440.0 * t).sin()).round() as i32
    });
    encode_wav_to_base64(&WavData {
        spec: hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
        samples: Samples::Int(tone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::processing::{decode_base64_to_binary, decode_base64_to_image, read_wav};
    use std::io::Cursor;

    #[test]
    fn sample_image_decodes_to_rgb() {
        let (img, _) = decode_base64_to_image(&sample_image_uri().unwrap()).unwrap();
        assert_eq!((img.width(), img.height()), (32, 32));
        assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [240, 200, 40]);
    }

    #[test]
    fn sample_audio_is_half_a_second() {
        let bytes = decode_base64_to_binary(&sample_wav_uri().unwrap()).unwrap();
        let wav = read_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(wav.spec.sample_rate, SAMPLE_RATE);
        assert_eq!(wav.samples.dim(), (8000, 1));
    }
}
