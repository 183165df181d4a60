// src/core/options.rs
//! Enumerated configuration literals.
//!
//! Every selector that used to be a free-form string ("numpy", "index", "RGB", ...)
//! is an enum here. Parsing happens once, when a component is configured, so a
//! constructed component can never carry an unknown literal.

use crate::core::{ComponentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal), default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $lit)] $variant ),+
        }

        impl $name {
            /// All accepted literals, in documentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = ComponentError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($lit => Ok($name::$variant),)+
                    other => Err(ComponentError::InvalidConfiguration(format!(
                        "Unknown {}: {}. Please choose from: {}.",
                        $what,
                        other,
                        [$(concat!("'", $lit, "'")),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

literal_enum! {
    /// Native value produced by a textbox.
    TextType("type"), default = Str {
        Str => "str",
        /// Deprecated; the Number component replaces it.
        Number => "number",
    }
}

literal_enum! {
    /// Whether choice components hand back the choice strings or their indices.
    ChoiceType("type"), default = Value {
        Value => "value",
        Index => "index",
    }
}

literal_enum! {
    /// Native form of an uploaded image.
    ImageType("type"), default = Numpy {
        /// `(height, width, channels)` pixel array.
        Numpy => "numpy",
        /// Decoded image object.
        Pil => "pil",
        /// Image saved to a temporary file.
        File => "file",
    }
}

literal_enum! {
    /// Color mode images are converted to before use.
    ImageMode("image_mode"), default = Rgb {
        Rgb => "RGB",
        Rgba => "RGBA",
        L => "L",
    }
}

literal_enum! {
    ImageSource("source"), default = Upload {
        Upload => "upload",
        Webcam => "webcam",
        Canvas => "canvas",
    }
}

literal_enum! {
    ImageTool("tool"), default = Editor {
        Editor => "editor",
        Select => "select",
    }
}

literal_enum! {
    /// Native form of submitted audio.
    AudioType("type"), default = Numpy {
        /// `(sample_rate, samples)`.
        Numpy => "numpy",
        File => "file",
        /// Cepstral coefficients.
        Mfcc => "mfcc",
    }
}

literal_enum! {
    AudioSource("source"), default = Upload {
        Upload => "upload",
        Microphone => "microphone",
    }
}

literal_enum! {
    /// Feature extraction applied by the legacy microphone input.
    AudioFeatures("preprocessing"), default = Mfcc {
        Mfcc => "mfcc",
    }
}

literal_enum! {
    FileType("type"), default = File {
        /// Readable file handle.
        File => "file",
        Bytes => "bytes",
    }
}

literal_enum! {
    /// Native form of a submitted table.
    DataframeType("type"), default = Pandas {
        /// Table with column labels.
        Pandas => "pandas",
        /// `ndarray` matrix of cells.
        Numpy => "numpy",
        /// Nested rows as submitted.
        Array => "array",
    }
}

literal_enum! {
    /// Declared type of a table column.
    Datatype("datatype"), default = Str {
        Str => "str",
        Number => "number",
        Bool => "bool",
        Date => "date",
    }
}

literal_enum! {
    /// How the number-interpretation step size is read.
    DeltaType("delta_type"), default = Percent {
        /// Step is `delta` percent of the input value.
        Percent => "percent",
        /// Step is `delta` itself.
        Absolute => "absolute",
    }
}

/// Datatype declaration for a whole sheet or per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataframeDatatype {
    Sheet(Datatype),
    Columns(Vec<Datatype>),
}

impl Default for DataframeDatatype {
    fn default() -> Self {
        DataframeDatatype::Sheet(Datatype::Str)
    }
}

impl DataframeDatatype {
    /// Expands the declaration to one datatype per column.
    pub fn per_column(&self, col_count: usize) -> Vec<Datatype> {
        match self {
            DataframeDatatype::Sheet(dt) => vec![*dt; col_count],
            DataframeDatatype::Columns(cols) => cols.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_literals() {
        assert_eq!("numpy".parse::<ImageType>().unwrap(), ImageType::Numpy);
        assert_eq!("L".parse::<ImageMode>().unwrap(), ImageMode::L);
        assert_eq!("absolute".parse::<DeltaType>().unwrap(), DeltaType::Absolute);
        for dt in Datatype::ALL {
            assert_eq!(dt.as_str().parse::<Datatype>().unwrap(), *dt);
        }
    }

    #[test]
    fn unknown_literal_is_a_configuration_error() {
        let err = "tensor".parse::<ImageType>().unwrap_err();
        match err {
            ComponentError::InvalidConfiguration(msg) => {
                assert_eq!(
                    msg,
                    "Unknown type: tensor. Please choose from: 'numpy', 'pil', 'file'."
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serde_uses_the_wire_literals() {
        let t: DataframeType = serde_json::from_str("\"array\"").unwrap();
        assert_eq!(t, DataframeType::Array);
        assert_eq!(serde_json::to_string(&ImageMode::Rgb).unwrap(), "\"RGB\"");
        assert!(serde_json::from_str::<ChoiceType>("\"label\"").is_err());
    }

    #[test]
    fn sheet_datatype_expands_per_column() {
        let sheet = DataframeDatatype::Sheet(Datatype::Number);
        assert_eq!(sheet.per_column(3), vec![Datatype::Number; 3]);
        let cols: DataframeDatatype = serde_json::from_str("[\"str\", \"bool\"]").unwrap();
        assert_eq!(cols.per_column(2), vec![Datatype::Str, Datatype::Bool]);
    }
}
