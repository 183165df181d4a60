// tests/interpretation_contract.rs
//! Drives every interpretable component through the JSON seam the way a serving
//! layer would: generate neighbors, score them with a mock model, arrange scores.

use interface_inputs::utils::processing::{encode_array_to_base64, encode_wav_to_base64, WavData};
use interface_inputs::Samples;
use interface_inputs::{shortcut, Component, ComponentKind, Interpretation};
use ndarray::{Array2, Array3};
use serde_json::{json, Value};

/// Stand-in for a model: a deterministic score derived from the wire value.
fn mock_model(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.len() as f64,
        Value::Array(items) => items.iter().map(mock_model).sum(),
        Value::Object(map) => map.values().map(mock_model).sum(),
    }
}

fn run(component: &Component, raw: &Value) -> (usize, Interpretation) {
    let neighbors = component
        .interpretation_neighbors(raw)
        .unwrap()
        .expect("component should be interpretable");
    let scores: Vec<f64> = neighbors.values.iter().map(mock_model).collect();
    let interpretation = component
        .interpretation_scores(raw, &neighbors, &scores)
        .unwrap()
        .expect("component should be interpretable");
    (neighbors.len(), interpretation)
}

fn image_uri() -> String {
    let pixels = Array3::from_shape_fn((12, 12, 3), |(y, x, c)| {
        if (y < 6) == (x < 6) {
            [200, 40, 40][c]
        } else {
            [30, 30, 180][c]
        }
    });
    encode_array_to_base64(&pixels).unwrap()
}

fn wav_uri() -> String {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let samples = Array2::from_shape_fn((160, 2), |(i, ch)| (i as i32 + 1) * (ch as i32 + 1));
    encode_wav_to_base64(&WavData {
        spec,
        samples: Samples::Int(samples),
    })
    .unwrap()
}

#[test]
fn textbox_scores_tokens_and_separators() {
    let textbox = shortcut("text").unwrap();
    let (count, interpretation) = run(&textbox, &json!("one two three four"));
    assert_eq!(count, 4);
    match interpretation {
        Interpretation::Tokens(pairs) => {
            assert_eq!(pairs.len(), 2 * count);
            assert_eq!(pairs[0].0, "one");
            assert_eq!(pairs[1], (" ".to_string(), 0.0));
        }
        other => panic!("unexpected interpretation {:?}", other),
    }
}

#[test]
fn number_line_has_unscored_midpoint() {
    let number = Component::from_json(r#"{"name": "number"}"#).unwrap();
    let (count, interpretation) = run(&number, &json!(50.0));
    assert_eq!(count, 6);
    match interpretation {
        Interpretation::NumberLine(line) => {
            assert_eq!(line.len(), count + 1);
            assert_eq!(line[3], (50.0, None));
            assert!(line.iter().filter(|(_, s)| s.is_none()).count() == 1);
        }
        other => panic!("unexpected interpretation {:?}", other),
    }
}

#[test]
fn slider_scores_align_with_grid() {
    let slider = shortcut("slider").unwrap();
    let (count, interpretation) = run(&slider, &json!(12.0));
    assert_eq!(count, 8);
    assert_eq!(
        interpretation,
        Interpretation::Scores(interface_inputs::algorithms::linspace(0.0, 100.0, 8))
    );
}

#[test]
fn boolean_and_choice_components() {
    let checkbox = shortcut("checkbox").unwrap();
    let (count, interpretation) = run(&checkbox, &json!(true));
    assert_eq!(count, 1);
    assert_eq!(interpretation, Interpretation::Binary((Some(0.0), None)));

    let group =
        Component::from_json(r#"{"name": "checkboxgroup", "choices": ["a", "bb", "ccc"]}"#)
            .unwrap();
    let (count, interpretation) = run(&group, &json!(["bb"]));
    assert_eq!(count, 3);
    match interpretation {
        Interpretation::Toggles(toggles) => {
            assert_eq!(toggles.len(), 3);
            assert!(toggles[1].0.is_some() && toggles[1].1.is_none());
            assert!(toggles[0].0.is_none() && toggles[0].1.is_some());
        }
        other => panic!("unexpected interpretation {:?}", other),
    }

    for name in ["radio", "dropdown"] {
        let definition = json!({"name": name, "choices": ["a", "bb", "ccc"]}).to_string();
        let component = Component::from_json(&definition).unwrap();
        let (count, interpretation) = run(&component, &json!("bb"));
        assert_eq!(count, 2);
        assert_eq!(
            interpretation,
            Interpretation::Choices(vec![Some(1.0), None, Some(3.0)])
        );
    }
}

#[test]
fn image_heat_map_covers_every_pixel() {
    let image = Component::from_json(r#"{"name": "image"}"#).unwrap();
    let (count, interpretation) = run(&image, &json!(image_uri()));
    assert!(count >= 1 && count <= 16);
    match interpretation {
        Interpretation::Grid(rows) => {
            assert_eq!(rows.len(), 12);
            assert!(rows.iter().all(|r| r.len() == 12));
            assert!(rows.iter().flatten().all(|v| v.is_finite()));
        }
        other => panic!("unexpected interpretation {:?}", other),
    }
}

#[test]
fn audio_scores_one_per_window() {
    let audio = shortcut("audio").unwrap();
    let (count, interpretation) = run(&audio, &json!(wav_uri()));
    assert_eq!(count, 8);
    match interpretation {
        Interpretation::Scores(scores) => assert_eq!(scores.len(), 8),
        other => panic!("unexpected interpretation {:?}", other),
    }
}

#[test]
fn dataframe_scores_form_the_table_shape() {
    let dataframe = shortcut("dataframe").unwrap();
    let raw = json!([[1.0, "x", true], [2.0, "yy", false]]);
    let (count, interpretation) = run(&dataframe, &raw);
    assert_eq!(count, 6);
    match interpretation {
        Interpretation::Grid(rows) => {
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.len() == 3));
        }
        other => panic!("unexpected interpretation {:?}", other),
    }
}

#[test]
fn every_shortcut_exposes_a_template_context() {
    for entry in interface_inputs::shortcuts() {
        let component = entry.build().unwrap();
        let ctx = component.template_context();
        assert_eq!(ctx["name"], component.kind().as_str());
        assert!(ctx.get("label").is_some());
    }
}

#[test]
fn deprecated_kinds_preprocess_but_do_not_interpret() {
    let webcam = Component::from_json(r#"{"name": "webcam", "shape": [6, 4]}"#).unwrap();
    assert_eq!(webcam.kind(), ComponentKind::Webcam);
    assert!(webcam.interpretation_neighbors(&json!(image_uri())).unwrap().is_none());
    match webcam.preprocess(&json!(image_uri())).unwrap() {
        interface_inputs::NativeValue::Pixels(p) => assert_eq!(p.dim(), (4, 6, 3)),
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn every_shortcut_test_input_runs_end_to_end() {
    for entry in interface_inputs::shortcuts() {
        let component = entry.build().unwrap();
        let Some(sample) = component.test_input().unwrap() else {
            assert_eq!(component.kind(), ComponentKind::File);
            continue;
        };
        component
            .preprocess(&sample)
            .unwrap_or_else(|e| panic!("{} failed on its test input: {}", entry.alias, e));
        if component.is_interpretable() {
            let (count, _) = run(&component, &sample);
            assert!(count > 0, "{} produced no neighbors", entry.alias);
        }
    }
}
