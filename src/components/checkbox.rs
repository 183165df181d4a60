// src/components/checkbox.rs
use crate::component::ComponentKind;
use crate::core::{AuxPayload, ComponentError, Neighbors, Result};
use crate::traits::{InputComponent, Interpretable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxConfig {
    pub label: Option<String>,
}

/// Single boolean checkbox.
#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    config: CheckboxConfig,
}

impl Checkbox {
    pub fn new(config: CheckboxConfig) -> Self {
        Checkbox { config }
    }
}

impl InputComponent for Checkbox {
    type Raw = bool;
    type Native = bool;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Checkbox
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &bool) -> Result<bool> {
        Ok(*raw)
    }

    fn embed(&self, native: &bool) -> Result<Vec<f64>> {
        Ok(vec![if *native { 1.0 } else { 0.0 }])
    }

    fn test_input(&self) -> Result<Option<bool>> {
        Ok(Some(true))
    }
}

impl Interpretable for Checkbox {
    type Config = ();
    type Scores = (Option<f64>, Option<f64>);

    fn interpret(self, _config: ()) -> Self {
        self
    }

    fn interpretation(&self) -> &() {
        &()
    }

    fn interpretation_neighbors(&self, raw: &bool) -> Result<Neighbors<bool>> {
        Ok(Neighbors::new(vec![!raw], AuxPayload::Empty, false))
    }

    /// `(score if unchecked, score if checked)`; only the flipped state's slot is filled.
    fn interpretation_scores(
        &self,
        raw: &bool,
        _neighbors: &[bool],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<(Option<f64>, Option<f64>)> {
        let score = *scores.first().ok_or_else(|| {
            ComponentError::InvalidInput("checkbox interpretation needs one score".to_string())
        })?;
        Ok(if *raw {
            (Some(score), None)
        } else {
            (None, Some(score))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_neighbor_flips_the_box() {
        let n = Checkbox::default().interpretation_neighbors(&true).unwrap();
        assert_eq!(n.values, vec![false]);
        assert!(!n.by_removal);
    }

    #[test]
    fn score_lands_in_the_flipped_state_slot() {
        let c = Checkbox::default();
        let aux = AuxPayload::Empty;
        assert_eq!(
            c.interpretation_scores(&true, &[false], &[0.7], &aux).unwrap(),
            (Some(0.7), None)
        );
        assert_eq!(
            c.interpretation_scores(&false, &[true], &[0.2], &aux).unwrap(),
            (None, Some(0.2))
        );
        assert!(c.interpretation_scores(&false, &[true], &[], &aux).is_err());
    }

    #[test]
    fn embeds_as_zero_or_one() {
        let c = Checkbox::default();
        assert_eq!(c.embed(&true).unwrap(), vec![1.0]);
        assert_eq!(c.embed(&false).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_input_is_checked() {
        assert_eq!(Checkbox::default().test_input().unwrap(), Some(true));
    }
}
