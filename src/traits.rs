// src/traits.rs
use crate::component::ComponentKind;
use crate::core::{AuxPayload, ComponentError, Interpretation, Neighbors, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Behavior shared by every input component.
pub trait InputComponent {
    /// Wire-level value submitted by the widget.
    type Raw: Clone + Serialize + DeserializeOwned;
    /// Value handed to the prediction function.
    type Native;

    fn kind(&self) -> ComponentKind;

    fn label(&self) -> Option<&str>;

    /// Converts a submitted value into the configured native form.
    fn preprocess(&self, raw: &Self::Raw) -> Result<Self::Native>;

    /// Turns a stored example into a value the widget can display.
    fn preprocess_example(&self, example: &Self::Raw) -> Result<Self::Raw> {
        Ok(example.clone())
    }

    /// Fixed-length fingerprint of a *preprocessed* value, used to find similar inputs.
    fn embed(&self, _native: &Self::Native) -> Result<Vec<f64>> {
        Err(ComponentError::NotSupported(format!(
            "{} doesn't currently support embeddings",
            self.kind()
        )))
    }

    /// A representative submitted value for smoke-testing a configured interface.
    /// `None` when the kind has no meaningful sample.
    fn test_input(&self) -> Result<Option<Self::Raw>> {
        Ok(None)
    }

    /// Parameters the rendering layer needs to draw the widget.
    fn template_context(&self) -> Value {
        template_context(self.kind(), self.label(), json!({}))
    }
}

/// Leave-one-out interpretation for a component.
///
/// A driver calls [`Interpretable::interpretation_neighbors`], scores every neighbor
/// with the prediction function, then hands the scores (in neighbor order) and the
/// untouched auxiliary payload to [`Interpretable::interpretation_scores`].
pub trait Interpretable: InputComponent {
    /// Interpretation hyperparameters; `Default` gives the documented defaults.
    type Config: Clone + Default;
    /// Arranged scores for rendering.
    type Scores: Into<Interpretation>;

    /// Replaces the interpretation parameters, consuming and returning the component.
    fn interpret(self, config: Self::Config) -> Self
    where
        Self: Sized;

    fn interpretation(&self) -> &Self::Config;

    fn interpretation_neighbors(&self, raw: &Self::Raw) -> Result<Neighbors<Self::Raw>>;

    fn interpretation_scores(
        &self,
        raw: &Self::Raw,
        neighbors: &[Self::Raw],
        scores: &[f64],
        aux: &AuxPayload,
    ) -> Result<Self::Scores>;
}

/// Media components that can persist a flagged submission to disk.
pub trait Rebuild: InputComponent {
    /// Saves `raw` under `dir` and returns the name of the written file.
    fn rebuild(&self, dir: &Path, raw: &Self::Raw) -> Result<String>;
}

/// Builds a template context: `name` and `label` plus the component's own fields.
pub(crate) fn template_context(kind: ComponentKind, label: Option<&str>, extra: Value) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), json!(kind.as_str()));
    map.insert("label".to_string(), json!(label));
    if let Value::Object(fields) = extra {
        map.extend(fields);
    }
    Value::Object(map)
}
