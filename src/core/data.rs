// src/core/data.rs
use crate::core::{ComponentError, Result};
use image::DynamicImage;
use ndarray::{s, Array1, Array2, Array3, ArrayD};
use serde::{Deserialize, Serialize};
use std::fmt;
use tempfile::NamedTempFile;

/// One spreadsheet cell as submitted by the dataframe widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Cell {
    /// The "removed" version of this cell: booleans flip, numbers become zero,
    /// strings become empty.
    pub fn blanked(&self) -> Cell {
        match self {
            Cell::Bool(b) => Cell::Bool(!b),
            Cell::Number(_) => Cell::Number(0.0),
            Cell::Str(_) => Cell::Str(String::new()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Str(s) => f.write_str(s),
        }
    }
}

/// Rows of cells, the wire form of a dataframe.
pub type Table = Vec<Vec<Cell>>;

/// Wire payload of the file upload widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Display name, or the on-disk path when `is_local_example` is set.
    pub name: String,
    /// Base64 data URI; empty for local examples.
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub is_local_example: bool,
}

/// Side-channel bookkeeping produced with a neighbor set and handed back,
/// untouched, when the scores are arranged.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuxPayload {
    #[default]
    Empty,
    /// Tokens of the original text, in order.
    Tokens(Vec<String>),
    /// One boolean mask per image segment, in neighbor order.
    Masks(Vec<Array2<bool>>),
    /// `(rows, cols)` of the original table.
    Shape { rows: usize, cols: usize },
}

impl AuxPayload {
    /// Name of the entry this payload carries.
    pub fn key(&self) -> &'static str {
        match self {
            AuxPayload::Empty => "empty",
            AuxPayload::Tokens(_) => "tokens",
            AuxPayload::Masks(_) => "masks",
            AuxPayload::Shape { .. } => "shape",
        }
    }

    pub fn tokens(&self) -> Result<&[String]> {
        match self {
            AuxPayload::Tokens(tokens) => Ok(tokens),
            other => Err(missing_aux("tokens", other)),
        }
    }

    pub fn masks(&self) -> Result<&[Array2<bool>]> {
        match self {
            AuxPayload::Masks(masks) => Ok(masks),
            other => Err(missing_aux("masks", other)),
        }
    }

    pub fn shape(&self) -> Result<(usize, usize)> {
        match self {
            AuxPayload::Shape { rows, cols } => Ok((*rows, *cols)),
            other => Err(missing_aux("shape", other)),
        }
    }
}

fn missing_aux(key: &str, found: &AuxPayload) -> ComponentError {
    ComponentError::InvalidInput(format!(
        "interpretation payload has no '{}' entry (found '{}')",
        key,
        found.key()
    ))
}

/// A perturbation set for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors<R> {
    /// Perturbed raw values. Scores must come back in this order.
    pub values: Vec<R>,
    pub aux: AuxPayload,
    /// `true` when each neighbor removes a unit, `false` when it substitutes one.
    pub by_removal: bool,
}

impl<R> Neighbors<R> {
    pub fn new(values: Vec<R>, aux: AuxPayload, by_removal: bool) -> Self {
        Neighbors {
            values,
            aux,
            by_removal,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Arranged interpretation scores, ready for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Interpretation {
    /// `(token, score)` pairs with zero-scored separators interleaved.
    Tokens(Vec<(String, f64)>),
    /// `(value, score)` pairs around a number; the original value has no score.
    NumberLine(Vec<(f64, Option<f64>)>),
    /// One score per evenly spaced unit (slider grid, audio window).
    Scores(Vec<f64>),
    /// `(score when unchecked, score when checked)`; only the state opposite the
    /// submitted one is filled.
    Binary((Option<f64>, Option<f64>)),
    /// Per choice: `(score_if_unselected, score_if_selected)`; the slot matching the
    /// choice's submitted membership is empty.
    Toggles(Vec<(Option<f64>, Option<f64>)>),
    /// Per choice score; the submitted choice has none.
    Choices(Vec<Option<f64>>),
    /// Per pixel or per cell scores.
    Grid(Vec<Vec<f64>>),
}

impl From<Vec<(String, f64)>> for Interpretation {
    fn from(v: Vec<(String, f64)>) -> Self {
        Interpretation::Tokens(v)
    }
}

impl From<Vec<(f64, Option<f64>)>> for Interpretation {
    fn from(v: Vec<(f64, Option<f64>)>) -> Self {
        Interpretation::NumberLine(v)
    }
}

impl From<Vec<f64>> for Interpretation {
    fn from(v: Vec<f64>) -> Self {
        Interpretation::Scores(v)
    }
}

impl From<(Option<f64>, Option<f64>)> for Interpretation {
    fn from(v: (Option<f64>, Option<f64>)) -> Self {
        Interpretation::Binary(v)
    }
}

impl From<Vec<(Option<f64>, Option<f64>)>> for Interpretation {
    fn from(v: Vec<(Option<f64>, Option<f64>)>) -> Self {
        Interpretation::Toggles(v)
    }
}

impl From<Vec<Option<f64>>> for Interpretation {
    fn from(v: Vec<Option<f64>>) -> Self {
        Interpretation::Choices(v)
    }
}

impl From<Vec<Vec<f64>>> for Interpretation {
    fn from(v: Vec<Vec<f64>>) -> Self {
        Interpretation::Grid(v)
    }
}

/// Textbox output.
#[derive(Debug, Clone, PartialEq)]
pub enum TextValue {
    Str(String),
    Number(f64),
}

/// CheckboxGroup output.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Values(Vec<String>),
    Indices(Vec<usize>),
}

/// Radio / Dropdown output.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Value(String),
    Index(usize),
}

/// Image output.
#[derive(Debug)]
pub enum ImageValue {
    /// `(height, width, channels)`.
    Array(Array3<u8>),
    Image(DynamicImage),
    /// The caller owns (and eventually drops) the temporary file.
    File(NamedTempFile),
}

/// `(frames, channels)` sample buffer in the stream's own numeric type.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Integer PCM of any bit depth, held exactly.
    Int(Array2<i32>),
    Float(Array2<f32>),
}

impl Samples {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Samples::Int(a) => a.dim(),
            Samples::Float(a) => a.dim(),
        }
    }

    pub fn frames(&self) -> usize {
        self.dim().0
    }

    /// Lossy float view, for feature extraction.
    pub fn to_f32(&self) -> Array2<f32> {
        match self {
            Samples::Int(a) => a.mapv(|v| v as f32),
            Samples::Float(a) => a.clone(),
        }
    }

    /// Zeroes frames `start..stop` on every channel; other frames are untouched.
    pub fn silence(&mut self, start: usize, stop: usize) {
        match self {
            Samples::Int(a) => a.slice_mut(s![start..stop, ..]).fill(0),
            Samples::Float(a) => a.slice_mut(s![start..stop, ..]).fill(0.0),
        }
    }
}

/// Decoded PCM audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    pub sample_rate: u32,
    pub data: Samples,
}

/// Audio output.
#[derive(Debug)]
pub enum AudioValue {
    File(NamedTempFile),
    Samples(AudioSamples),
    /// `(frames, coefficients)`.
    Mfcc(Array2<f64>),
}

/// File output.
#[derive(Debug)]
pub enum FileValue {
    /// A pre-registered example opened from disk.
    Local(std::fs::File),
    /// An upload decoded into a temporary file.
    Temp(NamedTempFile),
    Bytes(Vec<u8>),
}

/// A table with column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub columns: Vec<String>,
    pub rows: Table,
}

/// Dataframe output.
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    Labeled(LabeledTable),
    Matrix(Array2<Cell>),
    /// Single-column sheets in matrix form.
    Vector(Array1<Cell>),
    Rows(Table),
    /// Single-column sheets in array form.
    Column(Vec<Cell>),
}

/// Legacy microphone output.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalValue {
    Samples(Samples),
    Mfcc(Array2<f64>),
}

/// A preprocessed value of any component kind.
#[derive(Debug)]
pub enum NativeValue {
    Text(TextValue),
    Number(f64),
    Bool(bool),
    Selection(Selection),
    Choice(Choice),
    Image(ImageValue),
    Audio(AudioValue),
    File(FileValue),
    Table(TableValue),
    /// Sketchpad output: `[1, w*h]` or `[1, w, h]`.
    Sketch(ArrayD<u8>),
    /// Webcam output: `(height, width, 3)`.
    Pixels(Array3<u8>),
    Signal(SignalValue),
}

macro_rules! native_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(v: $ty) -> Self {
                    NativeValue::$variant(v)
                }
            }
        )+
    };
}

native_from! {
    TextValue => Text,
    f64 => Number,
    bool => Bool,
    Selection => Selection,
    Choice => Choice,
    ImageValue => Image,
    AudioValue => Audio,
    FileValue => File,
    TableValue => Table,
    ArrayD<u8> => Sketch,
    Array3<u8> => Pixels,
    SignalValue => Signal,
}
