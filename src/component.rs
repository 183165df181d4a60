// src/component.rs
//! Closed set of input components with JSON-level dispatch.
//!
//! A serving layer that only sees wire values (`serde_json::Value`) drives every
//! component through [`Component`]; the typed API lives on the individual
//! component structs.

use crate::components::{
    Audio, AudioConfig, Checkbox, CheckboxConfig, CheckboxGroup, ChoiceConfig, Dataframe,
    DataframeConfig, File, FileConfig, Image, ImageConfig, Microphone, MicrophoneConfig, Number,
    NumberConfig, SingleChoice, Sketchpad, SketchpadConfig, Slider, SliderConfig, Textbox,
    TextboxConfig, Webcam, WebcamConfig,
};
use crate::core::{ComponentError, Interpretation, NativeValue, Neighbors, Result};
use crate::traits::{InputComponent, Interpretable, Rebuild};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Identifies a component kind; also the `name` reported in template contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Textbox,
    Number,
    Slider,
    Checkbox,
    CheckboxGroup,
    Radio,
    Dropdown,
    Image,
    Audio,
    File,
    Dataframe,
    Sketchpad,
    Webcam,
    Microphone,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Textbox => "textbox",
            ComponentKind::Number => "number",
            ComponentKind::Slider => "slider",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::CheckboxGroup => "checkboxgroup",
            ComponentKind::Radio => "radio",
            ComponentKind::Dropdown => "dropdown",
            ComponentKind::Image => "image",
            ComponentKind::Audio => "audio",
            ComponentKind::File => "file",
            ComponentKind::Dataframe => "dataframe",
            ComponentKind::Sketchpad => "sketchpad",
            ComponentKind::Webcam => "webcam",
            ComponentKind::Microphone => "microphone",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Neighbor set in wire form.
pub type WireNeighbors = Neighbors<Value>;

/// Definition of a component as the interface layer writes it, tagged by `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum ComponentSpec {
    Textbox(TextboxConfig),
    Number(NumberConfig),
    Slider(SliderConfig),
    Checkbox(CheckboxConfig),
    CheckboxGroup(ChoiceConfig),
    Radio(ChoiceConfig),
    Dropdown(ChoiceConfig),
    Image(ImageConfig),
    Audio(AudioConfig),
    File(FileConfig),
    Dataframe(DataframeConfig),
    Sketchpad(SketchpadConfig),
    Webcam(WebcamConfig),
    Microphone(MicrophoneConfig),
}

/// Any input component.
#[derive(Debug, Clone)]
pub enum Component {
    Textbox(Textbox),
    Number(Number),
    Slider(Slider),
    Checkbox(Checkbox),
    CheckboxGroup(CheckboxGroup),
    Radio(SingleChoice),
    Dropdown(SingleChoice),
    Image(Image),
    Audio(Audio),
    File(File),
    Dataframe(Dataframe),
    Sketchpad(Sketchpad),
    Webcam(Webcam),
    Microphone(Microphone),
}

macro_rules! each_component {
    ($value:expr, $c:ident => $body:expr) => {
        match $value {
            Component::Textbox($c) => $body,
            Component::Number($c) => $body,
            Component::Slider($c) => $body,
            Component::Checkbox($c) => $body,
            Component::CheckboxGroup($c) => $body,
            Component::Radio($c) => $body,
            Component::Dropdown($c) => $body,
            Component::Image($c) => $body,
            Component::Audio($c) => $body,
            Component::File($c) => $body,
            Component::Dataframe($c) => $body,
            Component::Sketchpad($c) => $body,
            Component::Webcam($c) => $body,
            Component::Microphone($c) => $body,
        }
    };
}

macro_rules! each_interpretable {
    ($value:expr, $c:ident => $body:expr, otherwise => $fallback:expr) => {
        match $value {
            Component::Textbox($c) => $body,
            Component::Number($c) => $body,
            Component::Slider($c) => $body,
            Component::Checkbox($c) => $body,
            Component::CheckboxGroup($c) => $body,
            Component::Radio($c) => $body,
            Component::Dropdown($c) => $body,
            Component::Image($c) => $body,
            Component::Audio($c) => $body,
            Component::Dataframe($c) => $body,
            Component::File(_)
            | Component::Sketchpad(_)
            | Component::Webcam(_)
            | Component::Microphone(_) => $fallback,
        }
    };
}

fn decode_raw<C: InputComponent>(component: &C, value: &Value) -> Result<C::Raw> {
    serde_json::from_value(value.clone()).map_err(|e| {
        ComponentError::InvalidInput(format!("bad {} payload: {}", component.kind(), e))
    })
}

fn preprocess_wire<C>(component: &C, value: &Value) -> Result<NativeValue>
where
    C: InputComponent,
    C::Native: Into<NativeValue>,
{
    let raw = decode_raw(component, value)?;
    Ok(component.preprocess(&raw)?.into())
}

fn preprocess_example_wire<C: InputComponent>(component: &C, value: &Value) -> Result<Value> {
    let raw = decode_raw(component, value)?;
    Ok(serde_json::to_value(component.preprocess_example(&raw)?)?)
}

fn test_input_wire<C: InputComponent>(component: &C) -> Result<Option<Value>> {
    match component.test_input()? {
        Some(raw) => Ok(Some(serde_json::to_value(raw)?)),
        None => Ok(None),
    }
}

fn rebuild_wire<C: Rebuild>(component: &C, dir: &Path, value: &Value) -> Result<String> {
    let raw = decode_raw(component, value)?;
    component.rebuild(dir, &raw)
}

fn neighbors_wire<C: Interpretable>(component: &C, value: &Value) -> Result<WireNeighbors> {
    let raw = decode_raw(component, value)?;
    let neighbors = component.interpretation_neighbors(&raw)?;
    tracing::debug!(
        component = %component.kind(),
        neighbors = neighbors.len(),
        by_removal = neighbors.by_removal,
        "generated interpretation neighbors"
    );
    let values = neighbors
        .values
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Neighbors::new(values, neighbors.aux, neighbors.by_removal))
}

fn scores_wire<C: Interpretable>(
    component: &C,
    value: &Value,
    neighbors: &WireNeighbors,
    scores: &[f64],
) -> Result<Interpretation> {
    let raw = decode_raw(component, value)?;
    let values = neighbors
        .values
        .iter()
        .map(|v| decode_raw(component, v))
        .collect::<Result<Vec<_>>>()?;
    Ok(component
        .interpretation_scores(&raw, &values, scores, &neighbors.aux)?
        .into())
}

impl Component {
    pub fn from_spec(spec: ComponentSpec) -> Result<Component> {
        Ok(match spec {
            ComponentSpec::Textbox(c) => Component::Textbox(Textbox::new(c)),
            ComponentSpec::Number(c) => Component::Number(Number::new(c)),
            ComponentSpec::Slider(c) => Component::Slider(Slider::new(c)?),
            ComponentSpec::Checkbox(c) => Component::Checkbox(Checkbox::new(c)),
            ComponentSpec::CheckboxGroup(c) => Component::CheckboxGroup(CheckboxGroup::new(c)),
            ComponentSpec::Radio(c) => Component::Radio(SingleChoice::radio(c)?),
            ComponentSpec::Dropdown(c) => Component::Dropdown(SingleChoice::dropdown(c)?),
            ComponentSpec::Image(c) => Component::Image(Image::new(c)),
            ComponentSpec::Audio(c) => Component::Audio(Audio::new(c)),
            ComponentSpec::File(c) => Component::File(File::new(c)),
            ComponentSpec::Dataframe(c) => Component::Dataframe(Dataframe::new(c)),
            ComponentSpec::Sketchpad(c) => Component::Sketchpad(Sketchpad::new(c)),
            ComponentSpec::Webcam(c) => Component::Webcam(Webcam::new(c)),
            ComponentSpec::Microphone(c) => Component::Microphone(Microphone::new(c)),
        })
    }

    /// Builds a component from its JSON definition, e.g.
    /// `{"name": "slider", "minimum": 0, "maximum": 10}`.
    pub fn from_json(definition: &str) -> Result<Component> {
        let spec: ComponentSpec = serde_json::from_str(definition)
            .map_err(|e| ComponentError::InvalidConfiguration(e.to_string()))?;
        Component::from_spec(spec)
    }

    pub fn kind(&self) -> ComponentKind {
        each_component!(self, c => c.kind())
    }

    pub fn label(&self) -> Option<&str> {
        each_component!(self, c => c.label())
    }

    pub fn template_context(&self) -> Value {
        each_component!(self, c => c.template_context())
    }

    pub fn is_interpretable(&self) -> bool {
        each_interpretable!(self, _c => true, otherwise => false)
    }

    pub fn preprocess(&self, raw: &Value) -> Result<NativeValue> {
        each_component!(self, c => preprocess_wire(c, raw))
    }

    pub fn preprocess_example(&self, example: &Value) -> Result<Value> {
        each_component!(self, c => preprocess_example_wire(c, example))
    }

    /// Sample wire value for smoke-testing, when the kind has one.
    pub fn test_input(&self) -> Result<Option<Value>> {
        each_component!(self, c => test_input_wire(c))
    }

    /// Saves a flagged submission under `dir` and returns the file name; `None` for
    /// kinds that are stored inline rather than as files.
    pub fn rebuild(&self, dir: &Path, raw: &Value) -> Result<Option<String>> {
        match self {
            Component::Image(c) => rebuild_wire(c, dir, raw).map(Some),
            Component::Sketchpad(c) => rebuild_wire(c, dir, raw).map(Some),
            Component::Webcam(c) => rebuild_wire(c, dir, raw).map(Some),
            Component::Microphone(c) => rebuild_wire(c, dir, raw).map(Some),
            _ => Ok(None),
        }
    }

    /// `None` for kinds without an interpretation.
    pub fn interpretation_neighbors(&self, raw: &Value) -> Result<Option<WireNeighbors>> {
        each_interpretable!(
            self,
            c => neighbors_wire(c, raw).map(Some),
            otherwise => Ok(None)
        )
    }

    /// `scores` must be in the order of `neighbors.values`.
    pub fn interpretation_scores(
        &self,
        raw: &Value,
        neighbors: &WireNeighbors,
        scores: &[f64],
    ) -> Result<Option<Interpretation>> {
        each_interpretable!(
            self,
            c => scores_wire(c, raw, neighbors, scores).map(Some),
            otherwise => Ok(None)
        )
    }

    /// Embeds a value previously returned by [`Component::preprocess`].
    pub fn embed(&self, native: &NativeValue) -> Result<Vec<f64>> {
        match (self, native) {
            (Component::Textbox(c), NativeValue::Text(v)) => c.embed(v),
            (Component::Number(c), NativeValue::Number(v)) => c.embed(v),
            (Component::Slider(c), NativeValue::Number(v)) => c.embed(v),
            (Component::Checkbox(c), NativeValue::Bool(v)) => c.embed(v),
            (Component::CheckboxGroup(c), NativeValue::Selection(v)) => c.embed(v),
            (Component::Radio(c) | Component::Dropdown(c), NativeValue::Choice(v)) => c.embed(v),
            (Component::Image(c), NativeValue::Image(v)) => c.embed(v),
            (Component::Audio(c), NativeValue::Audio(v)) => c.embed(v),
            (Component::File(c), NativeValue::File(v)) => c.embed(v),
            (Component::Dataframe(c), NativeValue::Table(v)) => c.embed(v),
            (Component::Sketchpad(c), NativeValue::Sketch(v)) => c.embed(v),
            (Component::Webcam(c), NativeValue::Pixels(v)) => c.embed(v),
            (Component::Microphone(c), NativeValue::Signal(v)) => c.embed(v),
            (component, _) => Err(ComponentError::InvalidInput(format!(
                "value was not produced by a {} component",
                component.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AuxPayload, TextValue};
    use serde_json::json;

    #[test]
    fn builds_components_from_json() {
        let slider = Component::from_json(r#"{"name": "slider", "minimum": 0, "maximum": 10}"#)
            .unwrap();
        assert_eq!(slider.kind(), ComponentKind::Slider);
        assert_eq!(slider.template_context()["step"], 1.0);

        let radio = Component::from_json(
            r#"{"name": "radio", "choices": ["a", "b"], "type": "index", "label": "Pick"}"#,
        )
        .unwrap();
        assert_eq!(radio.kind(), ComponentKind::Radio);
        assert_eq!(radio.label(), Some("Pick"));
    }

    #[test]
    fn unknown_literals_fail_at_configuration() {
        let err = Component::from_json(r#"{"name": "image", "type": "tensor"}"#).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration(_)));
        let err = Component::from_json(r#"{"name": "hologram"}"#).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration(_)));
    }

    #[test]
    fn kind_names_match_wire_tags() {
        for kind in [
            ComponentKind::Textbox,
            ComponentKind::CheckboxGroup,
            ComponentKind::Microphone,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn wire_round_trip_for_text() {
        let textbox = Component::from_json(r#"{"name": "textbox"}"#).unwrap();
        let raw = json!("good movie");
        let neighbors = textbox.interpretation_neighbors(&raw).unwrap().unwrap();
        assert_eq!(neighbors.values, vec![json!("movie"), json!("good")]);
        let scores = textbox
            .interpretation_scores(&raw, &neighbors, &[0.9, 0.1])
            .unwrap()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&scores).unwrap(),
            json!([["good", 0.9], [" ", 0.0], ["movie", 0.1], [" ", 0.0]])
        );
    }

    #[test]
    fn non_interpretable_kinds_report_none() {
        let file = Component::from_json(r#"{"name": "file"}"#).unwrap();
        assert!(!file.is_interpretable());
        let raw = json!({"name": "a.txt", "data": "data:text/plain;base64,aGk="});
        assert!(file.interpretation_neighbors(&raw).unwrap().is_none());
        let empty = Neighbors::new(Vec::new(), AuxPayload::Empty, true);
        assert!(file.interpretation_scores(&raw, &empty, &[]).unwrap().is_none());
    }

    #[test]
    fn mistyped_payload_is_invalid_input() {
        let number = Component::from_json(r#"{"name": "number"}"#).unwrap();
        let err = number.preprocess(&json!("seven")).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidInput(_)));
    }

    #[test]
    fn embed_dispatches_on_matching_values() {
        let textbox = Component::from_json(r#"{"name": "textbox"}"#).unwrap();
        let native = textbox.preprocess(&json!("hello")).unwrap();
        assert_eq!(textbox.embed(&native).unwrap().len(), 64);
        assert!(textbox.embed(&NativeValue::Bool(true)).is_err());
        let value = NativeValue::Text(TextValue::Number(3.0));
        assert_eq!(textbox.embed(&value).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_inputs_are_wire_values() {
        let checkbox = Component::from_json(r#"{"name": "checkbox"}"#).unwrap();
        assert_eq!(checkbox.test_input().unwrap(), Some(json!(true)));
        let group =
            Component::from_json(r#"{"name": "checkboxgroup", "choices": ["a", "b"]}"#).unwrap();
        assert_eq!(group.test_input().unwrap(), Some(json!(["a", "b"])));
        let file = Component::from_json(r#"{"name": "file"}"#).unwrap();
        assert_eq!(file.test_input().unwrap(), None);
    }

    #[test]
    fn only_media_kinds_rebuild_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = Component::from_json(r#"{"name": "image"}"#).unwrap();
        let sample = image.test_input().unwrap().unwrap();
        let name = image.rebuild(dir.path(), &sample).unwrap().unwrap();
        assert!(dir.path().join(name).exists());

        let number = Component::from_json(r#"{"name": "number"}"#).unwrap();
        assert_eq!(number.rebuild(dir.path(), &json!(3.0)).unwrap(), None);
        assert!(matches!(
            image.rebuild(dir.path(), &json!(3.0)),
            Err(ComponentError::InvalidInput(_))
        ));
    }
}
