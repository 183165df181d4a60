// src/components/number.rs
use crate::component::ComponentKind;
use crate::core::{AuxPayload, DeltaType, Neighbors, Result};
use crate::traits::{template_context, InputComponent, Interpretable};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberConfig {
    pub default: Option<f64>,
    pub label: Option<String>,
}

/// Probes `steps` values on each side of the input, `delta` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberInterpretation {
    pub steps: usize,
    pub delta: f64,
    pub delta_type: DeltaType,
}

impl Default for NumberInterpretation {
    fn default() -> Self {
        NumberInterpretation {
            steps: 3,
            delta: 1.0,
            delta_type: DeltaType::Percent,
        }
    }
}

/// Numeric input field.
#[derive(Debug, Clone, Default)]
pub struct Number {
    config: NumberConfig,
    interpretation: NumberInterpretation,
}

impl Number {
    pub fn new(config: NumberConfig) -> Self {
        Number {
            config,
            interpretation: NumberInterpretation::default(),
        }
    }

    fn step_size(&self, x: f64) -> f64 {
        match self.interpretation.delta_type {
            DeltaType::Percent => self.interpretation.delta * x / 100.0,
            DeltaType::Absolute => self.interpretation.delta,
        }
    }
}

impl InputComponent for Number {
    type Raw = f64;
    type Native = f64;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Number
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &f64) -> Result<f64> {
        Ok(*raw)
    }

    fn embed(&self, native: &f64) -> Result<Vec<f64>> {
        Ok(vec![*native])
    }

    fn test_input(&self) -> Result<Option<f64>> {
        Ok(Some(self.config.default.unwrap_or(1.0)))
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({ "default": self.config.default }),
        )
    }
}

impl Interpretable for Number {
    type Config = NumberInterpretation;
    type Scores = Vec<(f64, Option<f64>)>;

    fn interpret(mut self, config: NumberInterpretation) -> Self {
        self.interpretation = config;
        self
    }

    fn interpretation(&self) -> &NumberInterpretation {
        &self.interpretation
    }

    /// Values below the input in ascending order, then values above it.
    fn interpretation_neighbors(&self, raw: &f64) -> Result<Neighbors<f64>> {
        let x = *raw;
        let delta = self.step_size(x);
        let steps = self.interpretation.steps as i64;
        let values = (-steps..0)
            .chain(1..=steps)
            .map(|i| x + i as f64 * delta)
            .collect();
        Ok(Neighbors::new(values, AuxPayload::Empty, false))
    }

    /// Builds the number line, with the input itself unscored in the middle.
    fn interpretation_scores(
        &self,
        raw: &f64,
        neighbors: &[f64],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<Vec<(f64, Option<f64>)>> {
        let mut line: Vec<(f64, Option<f64>)> = neighbors
            .iter()
            .zip(scores)
            .map(|(&n, &s)| (n, Some(s)))
            .collect();
        line.insert(line.len() / 2, (*raw, None));
        Ok(line)
    }
}
