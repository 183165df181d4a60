// src/shortcuts.rs
//! String aliases that stand in for fully configured components.

use crate::component::{Component, ComponentKind};
use crate::components::{
    Audio, AudioConfig, Checkbox, Dataframe, DataframeConfig, File, Image, ImageConfig, Number,
    Slider, SliderConfig, Textbox, TextboxConfig,
};
use crate::core::{AudioSource, ComponentError, DataframeType, ImageMode, ImageSource, Result};

/// One entry of the alias table.
pub struct Shortcut {
    pub alias: &'static str,
    pub kind: ComponentKind,
    build: fn() -> Result<Component>,
}

impl Shortcut {
    pub fn build(&self) -> Result<Component> {
        (self.build)()
    }
}

fn dataframe(return_type: DataframeType, col_count: usize) -> Component {
    Component::Dataframe(Dataframe::new(DataframeConfig {
        return_type,
        col_count,
        ..DataframeConfig::default()
    }))
}

static SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        alias: "text",
        kind: ComponentKind::Textbox,
        build: || Ok(Component::Textbox(Textbox::default())),
    },
    Shortcut {
        alias: "textbox",
        kind: ComponentKind::Textbox,
        build: || {
            Ok(Component::Textbox(Textbox::new(TextboxConfig {
                lines: 7,
                ..TextboxConfig::default()
            })))
        },
    },
    Shortcut {
        alias: "number",
        kind: ComponentKind::Number,
        build: || Ok(Component::Number(Number::default())),
    },
    Shortcut {
        alias: "slider",
        kind: ComponentKind::Slider,
        build: || Slider::new(SliderConfig::default()).map(Component::Slider),
    },
    Shortcut {
        alias: "checkbox",
        kind: ComponentKind::Checkbox,
        build: || Ok(Component::Checkbox(Checkbox::default())),
    },
    Shortcut {
        alias: "image",
        kind: ComponentKind::Image,
        build: || Ok(Component::Image(Image::default())),
    },
    Shortcut {
        alias: "webcam",
        kind: ComponentKind::Image,
        build: || {
            Ok(Component::Image(Image::new(ImageConfig {
                source: ImageSource::Webcam,
                ..ImageConfig::default()
            })))
        },
    },
    Shortcut {
        alias: "sketchpad",
        kind: ComponentKind::Image,
        build: || {
            Ok(Component::Image(Image::new(ImageConfig {
                image_mode: ImageMode::L,
                source: ImageSource::Canvas,
                shape: Some((28, 28)),
                invert_colors: true,
                ..ImageConfig::default()
            })))
        },
    },
    Shortcut {
        alias: "audio",
        kind: ComponentKind::Audio,
        build: || Ok(Component::Audio(Audio::default())),
    },
    Shortcut {
        alias: "microphone",
        kind: ComponentKind::Audio,
        build: || {
            Ok(Component::Audio(Audio::new(AudioConfig {
                source: AudioSource::Microphone,
                ..AudioConfig::default()
            })))
        },
    },
    Shortcut {
        alias: "file",
        kind: ComponentKind::File,
        build: || Ok(Component::File(File::default())),
    },
    Shortcut {
        alias: "dataframe",
        kind: ComponentKind::Dataframe,
        build: || Ok(dataframe(DataframeType::Pandas, 3)),
    },
    Shortcut {
        alias: "numpy",
        kind: ComponentKind::Dataframe,
        build: || Ok(dataframe(DataframeType::Numpy, 3)),
    },
    Shortcut {
        alias: "matrix",
        kind: ComponentKind::Dataframe,
        build: || Ok(dataframe(DataframeType::Array, 3)),
    },
    Shortcut {
        alias: "list",
        kind: ComponentKind::Dataframe,
        build: || Ok(dataframe(DataframeType::Array, 1)),
    },
];

pub fn shortcuts() -> &'static [Shortcut] {
    SHORTCUTS
}

/// Builds the component registered under `alias`.
pub fn shortcut(alias: &str) -> Result<Component> {
    SHORTCUTS
        .iter()
        .find(|s| s.alias == alias)
        .ok_or_else(|| {
            let known: Vec<&str> = SHORTCUTS.iter().map(|s| s.alias).collect();
            ComponentError::InvalidConfiguration(format!(
                "Unknown shortcut: {}. Please choose from: {}.",
                alias,
                known.join(", ")
            ))
        })?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_alias_builds_its_declared_kind() {
        for entry in shortcuts() {
            let component = entry.build().unwrap();
            assert_eq!(component.kind(), entry.kind, "alias {}", entry.alias);
        }
    }

    #[test]
    fn aliases_are_unique() {
        let aliases: HashSet<&str> = shortcuts().iter().map(|s| s.alias).collect();
        assert_eq!(aliases.len(), shortcuts().len());
        assert_eq!(aliases.len(), 15);
    }

    #[test]
    fn presets_carry_their_configuration() {
        let ctx = shortcut("sketchpad").unwrap().template_context();
        assert_eq!(ctx["image_mode"], "L");
        assert_eq!(ctx["source"], "canvas");
        assert_eq!(shortcut("textbox").unwrap().template_context()["lines"], 7);
        assert_eq!(shortcut("list").unwrap().template_context()["col_count"], 1);
        assert_eq!(
            shortcut("microphone").unwrap().template_context()["source"],
            "microphone"
        );
    }

    #[test]
    fn unknown_alias_lists_the_table() {
        match shortcut("hologram") {
            Err(ComponentError::InvalidConfiguration(msg)) => {
                assert!(msg.starts_with("Unknown shortcut: hologram."));
                assert!(msg.contains("dataframe"));
            }
            other => panic!("unexpected result {:?}", other.map(|c| c.kind())),
        }
    }
}
