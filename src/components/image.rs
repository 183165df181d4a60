// src/components/image.rs
use crate::algorithms::occlusion::grid_to_rows;
use crate::algorithms::{accumulate_masks, count_labels, rescale_positive, slic, SlicParams};
use crate::component::ComponentKind;
use crate::core::{
    AuxPayload, ImageMode, ImageSource, ImageTool, ImageType, ImageValue, Neighbors, Result,
};
use crate::traits::{template_context, InputComponent, Interpretable, Rebuild};
use crate::utils::processing::{
    array_to_image, convert_mode, decode_base64_to_image, encode_array_to_base64,
    encode_file_to_base64, image_to_array, resize_and_crop, save_flagged_image,
};
use crate::utils::sample_image_uri;
use image::{DynamicImage, ImageFormat};
use ndarray::{Array1, Array3, Axis};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

const EMBEDDING_SHAPE: (u32, u32) = (100, 100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// `(width, height)` to resize and crop to; `None` keeps the upload's size.
    pub shape: Option<(u32, u32)>,
    pub image_mode: ImageMode,
    pub invert_colors: bool,
    pub source: ImageSource,
    pub tool: ImageTool,
    #[serde(rename = "type")]
    pub return_type: ImageType,
    pub label: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            shape: None,
            image_mode: ImageMode::Rgb,
            invert_colors: false,
            source: ImageSource::Upload,
            tool: ImageTool::Editor,
            return_type: ImageType::Numpy,
            label: None,
        }
    }
}

/// Superpixel occlusion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInterpretation {
    /// Upper bound on the number of superpixels.
    pub segments: usize,
    pub compactness: f64,
    pub sigma: f64,
}

impl Default for ImageInterpretation {
    fn default() -> Self {
        ImageInterpretation {
            segments: 16,
            compactness: 10.0,
            sigma: 1.0,
        }
    }
}

/// Image upload box.
#[derive(Debug, Clone, Default)]
pub struct Image {
    config: ImageConfig,
    interpretation: ImageInterpretation,
}

impl Image {
    pub fn new(config: ImageConfig) -> Self {
        Image {
            config,
            interpretation: ImageInterpretation::default(),
        }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Decodes the upload and normalizes its size, keeping the native channels.
    fn shaped_pixels(&self, raw: &str) -> Result<Array3<u8>> {
        let (img, _) = decode_base64_to_image(raw)?;
        let img = match self.config.shape {
            Some(shape) => resize_and_crop(&img, shape),
            None => img,
        };
        image_to_array(&img)
    }

    fn to_temp_file(img: &DynamicImage, format: ImageFormat) -> Result<ImageValue> {
        let ext = format.extensions_str().first().copied().unwrap_or("png");
        let file = tempfile::Builder::new()
            .suffix(&format!(".{}", ext))
            .tempfile()?;
        img.save_with_format(file.path(), format)?;
        Ok(ImageValue::File(file))
    }
}

impl InputComponent for Image {
    type Raw = String;
    type Native = ImageValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Image
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<ImageValue> {
        let (img, format) = decode_base64_to_image(raw)?;
        let mut img = convert_mode(img, self.config.image_mode);
        if let Some(shape) = self.config.shape {
            img = resize_and_crop(&img, shape);
        }
        if self.config.invert_colors {
            img.invert();
        }
        match self.config.return_type {
            ImageType::Pil => Ok(ImageValue::Image(img)),
            ImageType::Numpy => Ok(ImageValue::Array(image_to_array(&img)?)),
            ImageType::File => Self::to_temp_file(&img, format),
        }
    }

    /// Examples are stored as file paths.
    fn preprocess_example(&self, example: &String) -> Result<String> {
        encode_file_to_base64(Path::new(example), "image")
    }

    /// Pixel values after resizing to the configured shape (or 100x100).
    fn embed(&self, native: &ImageValue) -> Result<Vec<f64>> {
        let img = match native {
            ImageValue::Array(array) => array_to_image(array)?,
            ImageValue::Image(img) => img.clone(),
            ImageValue::File(file) => image::open(file.path())?,
        };
        let resized = resize_and_crop(&img, self.config.shape.unwrap_or(EMBEDDING_SHAPE));
        Ok(image_to_array(&resized)?.iter().map(|&v| f64::from(v)).collect())
    }

    fn test_input(&self) -> Result<Option<String>> {
        sample_image_uri().map(Some)
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({
                "image_mode": self.config.image_mode,
                "shape": self.config.shape,
                "source": self.config.source,
                "tool": self.config.tool,
            }),
        )
    }
}

impl Rebuild for Image {
    fn rebuild(&self, dir: &Path, raw: &String) -> Result<String> {
        save_flagged_image(dir, raw)
    }
}

impl Interpretable for Image {
    type Config = ImageInterpretation;
    type Scores = Vec<Vec<f64>>;

    fn interpret(mut self, config: ImageInterpretation) -> Self {
        self.interpretation = config;
        self
    }

    fn interpretation(&self) -> &ImageInterpretation {
        &self.interpretation
    }

    /// One neighbor per superpixel, with that superpixel painted in the image's
    /// mean color.
    fn interpretation_neighbors(&self, raw: &String) -> Result<Neighbors<String>> {
        let pixels = self.shaped_pixels(raw)?;
        let params = SlicParams {
            n_segments: self.interpretation.segments,
            compactness: self.interpretation.compactness,
            sigma: self.interpretation.sigma,
            ..SlicParams::default()
        };
        let labels = slic(&pixels, &params)?;

        let channels = pixels.dim().2;
        let replace: Array1<u8> = pixels
            .mapv(f64::from)
            .mean_axis(Axis(0))
            .and_then(|m| m.mean_axis(Axis(0)))
            .map(|m| m.mapv(|v| v as u8))
            .unwrap_or_else(|| Array1::zeros(channels));

        let segments = count_labels(&labels);
        let mut values = Vec::with_capacity(segments);
        let mut masks = Vec::with_capacity(segments);
        for segment in 0..segments {
            let mask = labels.mapv(|l| l == segment);
            let mut occluded = pixels.clone();
            for ((y, x), &hit) in mask.indexed_iter() {
                if hit {
                    occluded
                        .slice_mut(ndarray::s![y, x, ..])
                        .assign(&replace);
                }
            }
            values.push(encode_array_to_base64(&occluded)?);
            masks.push(mask);
        }
        Ok(Neighbors::new(values, AuxPayload::Masks(masks), true))
    }

    /// Per-pixel heat map, rescaled into `[0, 1]` when any score is positive.
    fn interpretation_scores(
        &self,
        raw: &String,
        _neighbors: &[String],
        scores: &[f64],
        aux: &AuxPayload,
    ) -> Result<Vec<Vec<f64>>> {
        let (rows, cols, _) = self.shaped_pixels(raw)?.dim();
        let grid = accumulate_masks((rows, cols), scores, aux.masks()?)?;
        Ok(grid_to_rows(&rescale_positive(grid)))
    }
}
