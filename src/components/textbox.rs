// src/components/textbox.rs
use crate::component::ComponentKind;
use crate::core::{AuxPayload, ComponentError, Neighbors, Result, TextType, TextValue};
use crate::traits::{template_context, InputComponent, Interpretable};
use crate::utils::embed_text;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Configuration for [`Textbox`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextboxConfig {
    /// Number of rows in the text area.
    pub lines: usize,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    /// Deprecated. Same as `return_type: TextType::Number`.
    pub numeric: bool,
    #[serde(rename = "type")]
    pub return_type: TextType,
    pub label: Option<String>,
}

impl Default for TextboxConfig {
    fn default() -> Self {
        TextboxConfig {
            lines: 1,
            placeholder: None,
            default: None,
            numeric: false,
            return_type: TextType::Str,
            label: None,
        }
    }
}

/// Leave-one-out settings for text: each token is dropped, or swapped for
/// `replacement` when one is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextInterpretation {
    pub separator: String,
    pub replacement: Option<String>,
}

impl Default for TextInterpretation {
    fn default() -> Self {
        TextInterpretation {
            separator: " ".to_string(),
            replacement: None,
        }
    }
}

/// Free text input.
#[derive(Debug, Clone)]
pub struct Textbox {
    config: TextboxConfig,
    interpretation: TextInterpretation,
}

impl Textbox {
    pub fn new(mut config: TextboxConfig) -> Self {
        if config.numeric || config.return_type == TextType::Number {
            tracing::warn!(
                "The 'numeric' type has been deprecated. Use the Number input component instead."
            );
            config.numeric = true;
            config.return_type = TextType::Number;
        }
        Textbox {
            config,
            interpretation: TextInterpretation::default(),
        }
    }

    pub fn config(&self) -> &TextboxConfig {
        &self.config
    }

    fn separator(&self) -> Result<&str> {
        let sep = self.interpretation.separator.as_str();
        if sep.is_empty() {
            return Err(ComponentError::InvalidConfiguration(
                "interpretation separator must not be empty".to_string(),
            ));
        }
        Ok(sep)
    }
}

impl Default for Textbox {
    fn default() -> Self {
        Textbox::new(TextboxConfig::default())
    }
}

impl InputComponent for Textbox {
    type Raw = String;
    type Native = TextValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Textbox
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<TextValue> {
        match self.config.return_type {
            TextType::Str => Ok(TextValue::Str(raw.clone())),
            TextType::Number => raw.trim().parse::<f64>().map(TextValue::Number).map_err(|e| {
                ComponentError::InvalidInput(format!("'{}' is not a number: {}", raw, e))
            }),
        }
    }

    fn embed(&self, native: &TextValue) -> Result<Vec<f64>> {
        match native {
            TextValue::Str(text) => Ok(embed_text(text)),
            TextValue::Number(n) => Ok(vec![*n]),
        }
    }

    fn test_input(&self) -> Result<Option<String>> {
        let sample = match (&self.config.default, self.config.return_type) {
            (Some(default), _) => default.clone(),
            (None, TextType::Str) => "the quick brown fox jumped over the lazy dog".to_string(),
            (None, TextType::Number) => "786.92".to_string(),
        };
        Ok(Some(sample))
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({
                "lines": self.config.lines,
                "placeholder": self.config.placeholder,
                "default": self.config.default,
            }),
        )
    }
}

impl Interpretable for Textbox {
    type Config = TextInterpretation;
    type Scores = Vec<(String, f64)>;

    fn interpret(mut self, config: TextInterpretation) -> Self {
        self.interpretation = config;
        self
    }

    fn interpretation(&self) -> &TextInterpretation {
        &self.interpretation
    }

    fn interpretation_neighbors(&self, raw: &String) -> Result<Neighbors<String>> {
        let sep = self.separator()?;
        let tokens: Vec<&str> = raw.split(sep).collect();
        let mut values = Vec::with_capacity(tokens.len());
        for index in 0..tokens.len() {
            let mut leave_one_out = tokens.clone();
            match &self.interpretation.replacement {
                None => {
                    leave_one_out.remove(index);
                }
                Some(replacement) => leave_one_out[index] = replacement.as_str(),
            }
            values.push(leave_one_out.join(sep));
        }
        let tokens = tokens.into_iter().map(str::to_string).collect();
        Ok(Neighbors::new(values, AuxPayload::Tokens(tokens), true))
    }

    /// Pairs every token with its score, followed by the separator scored zero.
    fn interpretation_scores(
        &self,
        _raw: &String,
        _neighbors: &[String],
        scores: &[f64],
        aux: &AuxPayload,
    ) -> Result<Vec<(String, f64)>> {
        let sep = self.separator()?;
        let mut result = Vec::with_capacity(2 * scores.len());
        for (token, &score) in aux.tokens()?.iter().zip(scores) {
            result.push((token.clone(), score));
            result.push((sep.to_string(), 0.0));
        }
        Ok(result)
    }
}
