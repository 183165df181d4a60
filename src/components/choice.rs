// src/components/choice.rs
//! Components that pick from a fixed list of choices: [`CheckboxGroup`] for any
//! subset, [`SingleChoice`] (radio buttons or a dropdown) for exactly one.

use crate::component::ComponentKind;
use crate::core::{AuxPayload, Choice, ChoiceType, ComponentError, Neighbors, Result, Selection};
use crate::traits::{template_context, InputComponent, Interpretable};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceConfig {
    pub choices: Vec<String>,
    #[serde(rename = "type")]
    pub return_type: ChoiceType,
    pub label: Option<String>,
}

fn index_of(choices: &[String], value: &str) -> Result<usize> {
    choices
        .iter()
        .position(|c| c == value)
        .ok_or_else(|| ComponentError::UnknownChoice(value.to_string()))
}

fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn choice_context(kind: ComponentKind, config: &ChoiceConfig) -> Value {
    template_context(
        kind,
        config.label.as_deref(),
        json!({ "choices": config.choices }),
    )
}

/// Multi-select checkboxes.
#[derive(Debug, Clone, Default)]
pub struct CheckboxGroup {
    config: ChoiceConfig,
}

impl CheckboxGroup {
    pub fn new(config: ChoiceConfig) -> Self {
        CheckboxGroup { config }
    }

    pub fn choices(&self) -> &[String] {
        &self.config.choices
    }
}

impl InputComponent for CheckboxGroup {
    type Raw = Vec<String>;
    type Native = Selection;

    fn kind(&self) -> ComponentKind {
        ComponentKind::CheckboxGroup
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &Vec<String>) -> Result<Selection> {
        match self.config.return_type {
            ChoiceType::Value => Ok(Selection::Values(raw.clone())),
            ChoiceType::Index => raw
                .iter()
                .map(|v| index_of(&self.config.choices, v))
                .collect::<Result<Vec<_>>>()
                .map(Selection::Indices),
        }
    }

    /// Membership vector over the declared choices.
    fn embed(&self, native: &Selection) -> Result<Vec<f64>> {
        let choices = &self.config.choices;
        Ok(match native {
            Selection::Values(values) => choices
                .iter()
                .map(|c| indicator(values.contains(c)))
                .collect(),
            Selection::Indices(indices) => (0..choices.len())
                .map(|i| indicator(indices.contains(&i)))
                .collect(),
        })
    }

    /// Every declared choice selected.
    fn test_input(&self) -> Result<Option<Vec<String>>> {
        Ok(Some(self.config.choices.clone()))
    }

    fn template_context(&self) -> Value {
        choice_context(self.kind(), &self.config)
    }
}

impl Interpretable for CheckboxGroup {
    type Config = ();
    type Scores = Vec<(Option<f64>, Option<f64>)>;

    fn interpret(self, _config: ()) -> Self {
        self
    }

    fn interpretation(&self) -> &() {
        &()
    }

    /// One neighbor per declared choice, with that choice toggled.
    fn interpretation_neighbors(&self, raw: &Vec<String>) -> Result<Neighbors<Vec<String>>> {
        let values = self
            .config
            .choices
            .iter()
            .map(|choice| {
                let mut toggled = raw.clone();
                match toggled.iter().position(|v| v == choice) {
                    Some(pos) => {
                        toggled.remove(pos);
                    }
                    None => toggled.push(choice.clone()),
                }
                toggled
            })
            .collect();
        Ok(Neighbors::new(values, AuxPayload::Empty, false))
    }

    fn interpretation_scores(
        &self,
        raw: &Vec<String>,
        _neighbors: &[Vec<String>],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<Vec<(Option<f64>, Option<f64>)>> {
        Ok(self
            .config
            .choices
            .iter()
            .zip(scores)
            .map(|(choice, &score)| {
                if raw.contains(choice) {
                    (Some(score), None)
                } else {
                    (None, Some(score))
                }
            })
            .collect())
    }
}

/// Exactly-one selection, rendered as radio buttons or a dropdown.
#[derive(Debug, Clone)]
pub struct SingleChoice {
    kind: ComponentKind,
    config: ChoiceConfig,
}

impl SingleChoice {
    pub fn radio(config: ChoiceConfig) -> Result<Self> {
        Self::with_kind(ComponentKind::Radio, config)
    }

    pub fn dropdown(config: ChoiceConfig) -> Result<Self> {
        Self::with_kind(ComponentKind::Dropdown, config)
    }

    fn with_kind(kind: ComponentKind, config: ChoiceConfig) -> Result<Self> {
        if config.choices.is_empty() {
            return Err(ComponentError::InvalidConfiguration(format!(
                "{} needs at least one choice",
                kind
            )));
        }
        Ok(SingleChoice { kind, config })
    }

    pub fn choices(&self) -> &[String] {
        &self.config.choices
    }

    /// The first choice, selected before the user interacts.
    pub fn default_choice(&self) -> &str {
        self.config.choices.first().map_or("", String::as_str)
    }
}

impl InputComponent for SingleChoice {
    type Raw = String;
    type Native = Choice;

    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<Choice> {
        match self.config.return_type {
            ChoiceType::Value => Ok(Choice::Value(raw.clone())),
            ChoiceType::Index => index_of(&self.config.choices, raw).map(Choice::Index),
        }
    }

    /// One-hot vector over the declared choices.
    fn embed(&self, native: &Choice) -> Result<Vec<f64>> {
        let choices = &self.config.choices;
        Ok(match native {
            Choice::Value(value) => choices.iter().map(|c| indicator(c == value)).collect(),
            Choice::Index(index) => (0..choices.len()).map(|i| indicator(i == *index)).collect(),
        })
    }

    fn test_input(&self) -> Result<Option<String>> {
        Ok(Some(self.default_choice().to_string()))
    }

    fn template_context(&self) -> Value {
        choice_context(self.kind, &self.config)
    }
}

impl Interpretable for SingleChoice {
    type Config = ();
    type Scores = Vec<Option<f64>>;

    fn interpret(self, _config: ()) -> Self {
        self
    }

    fn interpretation(&self) -> &() {
        &()
    }

    /// Every other choice, in declared order.
    fn interpretation_neighbors(&self, raw: &String) -> Result<Neighbors<String>> {
        let selected = index_of(&self.config.choices, raw)?;
        let values = self
            .config
            .choices
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != selected)
            .map(|(_, c)| c.clone())
            .collect();
        Ok(Neighbors::new(values, AuxPayload::Empty, false))
    }

    /// Scores aligned to the declared choices; the selected one is `None`.
    fn interpretation_scores(
        &self,
        raw: &String,
        _neighbors: &[String],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<Vec<Option<f64>>> {
        let selected = index_of(&self.config.choices, raw)?;
        let mut aligned: Vec<Option<f64>> = scores.iter().copied().map(Some).collect();
        if selected > aligned.len() {
            return Err(ComponentError::InvalidInput(format!(
                "got {} scores for {} choices",
                scores.len(),
                self.config.choices.len()
            )));
        }
        aligned.insert(selected, None);
        Ok(aligned)
    }
}
