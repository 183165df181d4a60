// src/components/slider.rs
use crate::algorithms::linspace;
use crate::component::ComponentKind;
use crate::core::{AuxPayload, ComponentError, Neighbors, Result};
use crate::traits::{template_context, InputComponent, Interpretable};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub minimum: f64,
    pub maximum: f64,
    /// Derived from the range when unset.
    pub step: Option<f64>,
    /// Falls back to `minimum`.
    pub default: Option<f64>,
    pub label: Option<String>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        SliderConfig {
            minimum: 0.0,
            maximum: 100.0,
            step: None,
            default: None,
            label: None,
        }
    }
}

/// Number of evenly spaced points across the slider range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderInterpretation {
    pub steps: usize,
}

impl Default for SliderInterpretation {
    fn default() -> Self {
        SliderInterpretation { steps: 8 }
    }
}

/// Bounded numeric slider.
#[derive(Debug, Clone)]
pub struct Slider {
    minimum: f64,
    maximum: f64,
    step: f64,
    default: f64,
    label: Option<String>,
    interpretation: SliderInterpretation,
}

impl Slider {
    pub fn new(config: SliderConfig) -> Result<Self> {
        let step = match config.step {
            Some(step) => step,
            None => {
                let range = config.maximum - config.minimum;
                if !(range > 0.0) {
                    return Err(ComponentError::InvalidConfiguration(format!(
                        "slider maximum ({}) must exceed minimum ({}) to derive a step",
                        config.maximum, config.minimum
                    )));
                }
                10f64.powf((range.log10() - 1.0).floor())
            }
        };
        Ok(Slider {
            minimum: config.minimum,
            maximum: config.maximum,
            step,
            default: config.default.unwrap_or(config.minimum),
            label: config.label,
            interpretation: SliderInterpretation::default(),
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }
}

impl InputComponent for Slider {
    type Raw = f64;
    type Native = f64;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Slider
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn preprocess(&self, raw: &f64) -> Result<f64> {
        Ok(*raw)
    }

    fn embed(&self, native: &f64) -> Result<Vec<f64>> {
        Ok(vec![*native])
    }

    fn test_input(&self) -> Result<Option<f64>> {
        Ok(Some(self.default))
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({
                "minimum": self.minimum,
                "maximum": self.maximum,
                "step": self.step,
                "default": self.default,
            }),
        )
    }
}

impl Interpretable for Slider {
    type Config = SliderInterpretation;
    type Scores = Vec<f64>;

    fn interpret(mut self, config: SliderInterpretation) -> Self {
        self.interpretation = config;
        self
    }

    fn interpretation(&self) -> &SliderInterpretation {
        &self.interpretation
    }

    /// The input value is ignored; neighbors always span the full range.
    fn interpretation_neighbors(&self, _raw: &f64) -> Result<Neighbors<f64>> {
        let values = linspace(self.minimum, self.maximum, self.interpretation.steps);
        Ok(Neighbors::new(values, AuxPayload::Empty, false))
    }

    fn interpretation_scores(
        &self,
        _raw: &f64,
        _neighbors: &[f64],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<Vec<f64>> {
        Ok(scores.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn slider(minimum: f64, maximum: f64) -> Slider {
        Slider::new(SliderConfig {
            minimum,
            maximum,
            ..SliderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn step_is_derived_from_range() {
        assert_abs_diff_eq!(slider(0.0, 100.0).step(), 10.0);
        assert_abs_diff_eq!(slider(0.0, 1.0).step(), 0.1);
        assert_abs_diff_eq!(slider(10.0, 20.0).step(), 1.0);
        assert_abs_diff_eq!(slider(0.0, 5000.0).step(), 100.0);
    }

    #[test]
    fn explicit_step_and_default_win() {
        let s = Slider::new(SliderConfig {
            minimum: 5.0,
            maximum: 5.0,
            step: Some(0.25),
            default: Some(5.0),
            label: None,
        })
        .unwrap();
        assert_eq!(s.step(), 0.25);
        assert_eq!(s.default_value(), 5.0);
        assert_eq!(slider(3.0, 9.0).default_value(), 3.0);
    }

    #[test]
    fn empty_range_without_step_is_rejected() {
        let err = Slider::new(SliderConfig {
            minimum: 10.0,
            maximum: 10.0,
            ..SliderConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration(_)));
    }

    #[test]
    fn neighbors_span_the_range_regardless_of_input() {
        let s = slider(0.0, 70.0);
        let a = s.interpretation_neighbors(&3.0).unwrap();
        let b = s.interpretation_neighbors(&66.0).unwrap();
        assert_eq!(a.values, b.values);
        assert_eq!(a.values, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]);
        assert!(!a.by_removal);

        let s = s.interpret(SliderInterpretation { steps: 3 });
        assert_eq!(
            s.interpretation_neighbors(&0.0).unwrap().values,
            vec![0.0, 35.0, 70.0]
        );

        let s = slider(0.0, 100.0).interpret(SliderInterpretation { steps: 5 });
        assert_eq!(
            s.interpretation_neighbors(&42.0).unwrap().values,
            vec![0.0, 25.0, 50.0, 75.0, 100.0]
        );
    }

    #[test]
    fn scores_come_back_unchanged() {
        let s = slider(0.0, 1.0);
        let scores = [0.1, 0.4, 0.9];
        assert_eq!(
            s.interpretation_scores(&0.5, &[], &scores, &AuxPayload::Empty)
                .unwrap(),
            scores.to_vec()
        );
    }

    #[test]
    fn template_context_has_resolved_step() {
        let ctx = slider(0.0, 1.0).template_context();
        assert_eq!(ctx["name"], "slider");
        assert_abs_diff_eq!(ctx["step"].as_f64().unwrap(), 0.1);
        assert_eq!(ctx["default"], 0.0);
    }

    #[test]
    fn test_input_is_the_resolved_default() {
        let slider = Slider::new(SliderConfig {
            minimum: 5.0,
            ..SliderConfig::default()
        })
        .unwrap();
        assert_eq!(slider.test_input().unwrap(), Some(5.0));
    }
}
