// src/components/legacy.rs
//! Deprecated components kept for older interface definitions. Each logs a
//! deprecation warning when constructed and has no interpretation.

use crate::component::ComponentKind;
use crate::core::{AudioFeatures, Result, SignalValue};
use crate::traits::{InputComponent, Rebuild};
use crate::utils::mfcc_features;
use crate::utils::processing::{
    decode_base64_to_file, decode_base64_to_image, image_to_array, read_wav_file, resize_and_crop,
    save_flagged_image, save_flagged_wav,
};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use ndarray::{Array3, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchpadConfig {
    /// `(width, height)`.
    pub shape: (u32, u32),
    pub invert_colors: bool,
    pub flatten: bool,
    pub label: Option<String>,
}

impl Default for SketchpadConfig {
    fn default() -> Self {
        SketchpadConfig {
            shape: (28, 28),
            invert_colors: true,
            flatten: false,
            label: None,
        }
    }
}

/// Black-and-white drawing pad.
#[derive(Debug, Clone)]
pub struct Sketchpad {
    config: SketchpadConfig,
}

impl Sketchpad {
    pub fn new(config: SketchpadConfig) -> Self {
        tracing::warn!(
            "Sketchpad has been deprecated. Please use 'Image' component to generate a sketchpad. The string shortcut 'sketchpad' has been moved to the Image component."
        );
        Sketchpad { config }
    }
}

impl InputComponent for Sketchpad {
    type Raw = String;
    type Native = ArrayD<u8>;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Sketchpad
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    /// Flattens transparency onto white, converts to grayscale, then resizes.
    /// Returns `[1, w*h]` when flattening, else `[1, w, h]`.
    fn preprocess(&self, raw: &String) -> Result<ArrayD<u8>> {
        let (drawing, _) = decode_base64_to_image(raw)?;
        let drawing = drawing.to_rgba8();
        let mut canvas =
            RgbaImage::from_pixel(drawing.width(), drawing.height(), Rgba([255, 255, 255, 255]));
        imageops::overlay(&mut canvas, &drawing, 0, 0);

        let mut gray = DynamicImage::ImageLuma8(DynamicImage::ImageRgba8(canvas).to_luma8());
        if self.config.invert_colors {
            gray.invert();
        }
        let (width, height) = self.config.shape;
        let pixels = gray
            .resize_exact(width, height, FilterType::CatmullRom)
            .to_luma8()
            .into_raw();
        let (w, h) = (width as usize, height as usize);
        let shape = if self.config.flatten {
            vec![1, w * h]
        } else {
            vec![1, w, h]
        };
        Ok(ArrayD::from_shape_vec(IxDyn(&shape), pixels)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebcamConfig {
    /// `(width, height)`.
    pub shape: (u32, u32),
    pub label: Option<String>,
}

impl Default for WebcamConfig {
    fn default() -> Self {
        WebcamConfig {
            shape: (224, 224),
            label: None,
        }
    }
}

/// Webcam snapshot.
#[derive(Debug, Clone)]
pub struct Webcam {
    config: WebcamConfig,
}

impl Webcam {
    pub fn new(config: WebcamConfig) -> Self {
        tracing::warn!(
            "Webcam has been deprecated. Please use 'Image' component to generate a webcam. The string shortcut 'webcam' has been moved to the Image component."
        );
        Webcam { config }
    }
}

impl Rebuild for Sketchpad {
    fn rebuild(&self, dir: &Path, raw: &String) -> Result<String> {
        save_flagged_image(dir, raw)
    }
}

impl InputComponent for Webcam {
    type Raw = String;
    type Native = Array3<u8>;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Webcam
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<Array3<u8>> {
        let (img, _) = decode_base64_to_image(raw)?;
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        image_to_array(&resize_and_crop(&rgb, self.config.shape))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicrophoneConfig {
    /// `None` returns the raw signal.
    pub preprocessing: Option<AudioFeatures>,
    pub label: Option<String>,
}

/// Microphone recording.
#[derive(Debug, Clone)]
pub struct Microphone {
    config: MicrophoneConfig,
}

impl Microphone {
    pub fn new(config: MicrophoneConfig) -> Self {
        tracing::warn!(
            "Microphone has been deprecated. Please use 'Audio' component to generate a microphone. The string shortcut 'microphone' has been moved to the Audio component."
        );
        Microphone { config }
    }
}

impl Rebuild for Webcam {
    fn rebuild(&self, dir: &Path, raw: &String) -> Result<String> {
        save_flagged_image(dir, raw)
    }
}

impl InputComponent for Microphone {
    type Raw = String;
    type Native = SignalValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Microphone
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<SignalValue> {
        let file = decode_base64_to_file(raw)?;
        let wav = read_wav_file(file.path())?;
        match self.config.preprocessing {
            Some(AudioFeatures::Mfcc) => Ok(SignalValue::Mfcc(mfcc_features(
                &wav.samples.to_f32(),
                wav.spec.sample_rate,
            )?)),
            None => Ok(SignalValue::Samples(wav.samples)),
        }
    }
}

impl Rebuild for Microphone {
    /// Stores the recording as submitted, without re-encoding.
    fn rebuild(&self, dir: &Path, raw: &String) -> Result<String> {
        save_flagged_wav(dir, raw)
    }
}
