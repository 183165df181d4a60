// src/utils/processing.rs
//! Media plumbing: data-URI base64, image decode/encode and resizing, WAV I/O.

use crate::core::{ComponentError, ImageMode, Result, Samples};
use base64::{engine::general_purpose, Engine as _};
use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use ndarray::{Array2, Array3};
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Splits `data:<mime>;base64,<payload>` into its mime type and payload.
/// Strings without a data-URI header are treated as bare payloads.
pub fn split_data_uri(encoding: &str) -> (Option<&str>, &str) {
    match encoding
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, encoding),
    }
}

/// File extension implied by a mime type (`audio/x-wav` -> `wav`).
pub fn extension_for_mime(mime: &str) -> Option<String> {
    let subtype = mime.split('/').nth(1)?;
    let subtype = subtype.strip_prefix("x-").unwrap_or(subtype);
    let ext = match subtype {
        "mpeg" => "mp3",
        "svg+xml" => "svg",
        "plain" => "txt",
        other => other,
    };
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

pub fn decode_base64_to_binary(encoding: &str) -> Result<Vec<u8>> {
    let (_, payload) = split_data_uri(encoding);
    Ok(general_purpose::STANDARD.decode(payload.trim())?)
}

/// Writes a decoded payload to a named temporary file, rewound to the start.
/// The file is deleted when the returned handle is dropped.
pub fn decode_base64_to_file(encoding: &str) -> Result<NamedTempFile> {
    let (mime, _) = split_data_uri(encoding);
    let bytes = decode_base64_to_binary(encoding)?;
    let suffix = mime
        .and_then(extension_for_mime)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    let mut file = tempfile::Builder::new().suffix(&suffix).tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.rewind()?;
    Ok(file)
}

pub fn encode_bytes_to_base64(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Reads a file into a data URI; `media` is the mime top-level type ("image", "audio").
pub fn encode_file_to_base64(path: &Path, media: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let ext = if ext == "jpg" { "jpeg".to_string() } else { ext };
    Ok(encode_bytes_to_base64(&bytes, &format!("{}/{}", media, ext)))
}

/// Decodes an image data URI, returning the image and the format it was stored in.
pub fn decode_base64_to_image(encoding: &str) -> Result<(DynamicImage, ImageFormat)> {
    let bytes = decode_base64_to_binary(encoding)?;
    let format = image::guess_format(&bytes)?;
    let img = image::load_from_memory_with_format(&bytes, format)?;
    Ok((img, format))
}

pub fn convert_mode(img: DynamicImage, mode: ImageMode) -> DynamicImage {
    match mode {
        ImageMode::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageMode::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
        ImageMode::L => DynamicImage::ImageLuma8(img.to_luma8()),
    }
}

/// Scales the image to cover `(width, height)` and crops the centered overflow.
pub fn resize_and_crop(img: &DynamicImage, (width, height): (u32, u32)) -> DynamicImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Pixel array of shape `(height, width, channels)`.
///
/// 8-bit layouts keep their channel count; anything else is narrowed to RGB(A).
pub fn image_to_array(img: &DynamicImage) -> Result<Array3<u8>> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let (channels, raw) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.as_raw().clone()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.as_raw().clone()),
        DynamicImage::ImageRgb8(buf) => (3, buf.as_raw().clone()),
        DynamicImage::ImageRgba8(buf) => (4, buf.as_raw().clone()),
        other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
        other => (3, other.to_rgb8().into_raw()),
    };
    Ok(Array3::from_shape_vec((h, w, channels), raw)?)
}

pub fn array_to_image(array: &Array3<u8>) -> Result<DynamicImage> {
    let (h, w, channels) = array.dim();
    let raw: Vec<u8> = array.iter().copied().collect();
    let (w, h) = (w as u32, h as u32);
    let img = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    img.ok_or_else(|| {
        ComponentError::InvalidInput(format!(
            "cannot build an image from an array with {} channels",
            channels
        ))
    })
}

/// PNG data URI of an image.
pub fn encode_image_to_base64(img: &DynamicImage) -> Result<String> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(encode_bytes_to_base64(buf.get_ref(), "image/png"))
}

pub fn encode_array_to_base64(array: &Array3<u8>) -> Result<String> {
    encode_image_to_base64(&array_to_image(array)?)
}

/// A decoded WAV stream together with the header needed to write it back.
#[derive(Debug, Clone)]
pub struct WavData {
    pub spec: hound::WavSpec,
    pub samples: Samples,
}

pub fn read_wav<R: Read>(reader: R) -> Result<WavData> {
    let mut reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => {
            let flat: Vec<f32> = reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?;
            Samples::Float(interleaved_to_frames(flat, channels)?)
        }
        hound::SampleFormat::Int => {
            let flat: Vec<i32> = reader
                .samples::<i32>()
                .collect::<std::result::Result<_, _>>()?;
            Samples::Int(interleaved_to_frames(flat, channels)?)
        }
    };
    Ok(WavData { spec, samples })
}

/// Interleaved samples to `(frames, channels)`, dropping a trailing partial frame.
fn interleaved_to_frames<T>(mut flat: Vec<T>, channels: usize) -> Result<Array2<T>> {
    let frames = flat.len() / channels;
    flat.truncate(frames * channels);
    Ok(Array2::from_shape_vec((frames, channels), flat)?)
}

pub fn read_wav_file(path: &Path) -> Result<WavData> {
    read_wav(std::io::BufReader::new(fs::File::open(path)?))
}

pub fn write_wav(data: &WavData) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, data.spec)?;
        match (&data.samples, data.spec.sample_format) {
            (Samples::Float(samples), hound::SampleFormat::Float) => {
                for &s in samples.iter() {
                    writer.write_sample(s)?;
                }
            }
            (Samples::Int(samples), hound::SampleFormat::Int) => {
                for &s in samples.iter() {
                    writer.write_sample(s)?;
                }
            }
            (_, format) => {
                return Err(ComponentError::InvalidInput(format!(
                    "sample buffer does not match the {:?} WAV format",
                    format
                )))
            }
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

pub fn encode_wav_to_base64(data: &WavData) -> Result<String> {
    Ok(encode_bytes_to_base64(&write_wav(data)?, "audio/wav"))
}

/// `input_<local timestamp>.<ext>`, the name a flagged submission is saved under.
pub fn flagged_file_name(ext: &str) -> String {
    format!(
        "input_{}.{}",
        chrono::Local::now().format("%Y-%m-%d-%H-%M-%S"),
        ext
    )
}

/// Decodes an image data URI and saves it as PNG in `dir`; returns the file name.
pub fn save_flagged_image(dir: &Path, encoding: &str) -> Result<String> {
    let (img, _) = decode_base64_to_image(encoding)?;
    let filename = flagged_file_name("png");
    img.save_with_format(dir.join(&filename), ImageFormat::Png)?;
    Ok(filename)
}

/// Writes the decoded payload of a WAV data URI into `dir`; returns the file name.
pub fn save_flagged_wav(dir: &Path, encoding: &str) -> Result<String> {
    let bytes = decode_base64_to_binary(encoding)?;
    let filename = flagged_file_name("wav");
    fs::write(dir.join(&filename), bytes)?;
    Ok(filename)
}
