// src/components/audio.rs
use crate::algorithms::window_boundaries;
use crate::component::ComponentKind;
use crate::core::{AudioSamples, AudioSource, AudioType, AudioValue, AuxPayload, Neighbors, Result};
use crate::traits::{template_context, InputComponent, Interpretable};
use crate::utils::{mfcc_features, sample_wav_uri};
use crate::utils::processing::{
    decode_base64_to_binary, decode_base64_to_file, encode_file_to_base64, encode_wav_to_base64,
    read_wav, read_wav_file,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub source: AudioSource,
    #[serde(rename = "type")]
    pub return_type: AudioType,
    pub label: Option<String>,
}

/// Number of equal-length windows silenced in turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioInterpretation {
    pub segments: usize,
}

impl Default for AudioInterpretation {
    fn default() -> Self {
        AudioInterpretation { segments: 8 }
    }
}

/// WAV upload or microphone recording.
#[derive(Debug, Clone, Default)]
pub struct Audio {
    config: AudioConfig,
    interpretation: AudioInterpretation,
}

impl Audio {
    pub fn new(config: AudioConfig) -> Self {
        Audio {
            config,
            interpretation: AudioInterpretation::default(),
        }
    }
}

impl InputComponent for Audio {
    type Raw = String;
    type Native = AudioValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Audio
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &String) -> Result<AudioValue> {
        let file = decode_base64_to_file(raw)?;
        match self.config.return_type {
            AudioType::File => Ok(AudioValue::File(file)),
            AudioType::Numpy => {
                let wav = read_wav_file(file.path())?;
                Ok(AudioValue::Samples(AudioSamples {
                    sample_rate: wav.spec.sample_rate,
                    data: wav.samples,
                }))
            }
            AudioType::Mfcc => {
                let wav = read_wav_file(file.path())?;
                Ok(AudioValue::Mfcc(mfcc_features(
                    &wav.samples.to_f32(),
                    wav.spec.sample_rate,
                )?))
            }
        }
    }

    fn preprocess_example(&self, example: &String) -> Result<String> {
        encode_file_to_base64(Path::new(example), "audio")
    }

    fn test_input(&self) -> Result<Option<String>> {
        sample_wav_uri().map(Some)
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({ "source": self.config.source }),
        )
    }
}

impl Interpretable for Audio {
    type Config = AudioInterpretation;
    type Scores = Vec<f64>;

    fn interpret(mut self, config: AudioInterpretation) -> Self {
        self.interpretation = config;
        self
    }

    fn interpretation(&self) -> &AudioInterpretation {
        &self.interpretation
    }

    /// One WAV per window, with that window zeroed on every channel.
    fn interpretation_neighbors(&self, raw: &String) -> Result<Neighbors<String>> {
        let wav = read_wav(Cursor::new(decode_base64_to_binary(raw)?))?;
        let frames = wav.samples.frames();
        let mut values = Vec::with_capacity(self.interpretation.segments);
        for (start, stop) in window_boundaries(frames, self.interpretation.segments) {
            let mut silenced = wav.clone();
            silenced.samples.silence(start, stop);
            values.push(encode_wav_to_base64(&silenced)?);
        }
        Ok(Neighbors::new(values, AuxPayload::Empty, true))
    }

    fn interpretation_scores(
        &self,
        _raw: &String,
        _neighbors: &[String],
        scores: &[f64],
        _aux: &AuxPayload,
    ) -> Result<Vec<f64>> {
        Ok(scores.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComponentError;
    use crate::core::Samples;
    use crate::utils::processing::test_support::wav_uri;
    use crate::utils::processing::WavData;
    use std::io::Read;

    fn ramp(len: usize) -> Vec<i16> {
        (0..len).map(|i| (i % 200) as i16 + 1).collect()
    }

    fn audio(return_type: AudioType) -> Audio {
        Audio::new(AudioConfig {
            return_type,
            ..AudioConfig::default()
        })
    }

    #[test]
    fn numpy_preprocess_yields_rate_and_samples() {
        let raw = wav_uri(&ramp(400), 16000);
        match audio(AudioType::Numpy).preprocess(&raw).unwrap() {
            AudioValue::Samples(samples) => {
                assert_eq!(samples.sample_rate, 16000);
                assert_eq!(samples.data.dim(), (400, 1));
                match samples.data {
                    Samples::Int(ints) => assert_eq!(ints[[5, 0]], 6),
                    other => panic!("unexpected samples {:?}", other),
                }
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn file_preprocess_writes_wav_temp_file() {
        let raw = wav_uri(&ramp(10), 8000);
        match audio(AudioType::File).preprocess(&raw).unwrap() {
            AudioValue::File(mut file) => {
                assert!(file.path().to_string_lossy().ends_with(".wav"));
                let mut header = [0u8; 4];
                file.read_exact(&mut header).unwrap();
                assert_eq!(&header, b"RIFF");
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn mfcc_preprocess_has_twelve_coefficients() {
        let raw = wav_uri(&ramp(4000), 8000);
        match audio(AudioType::Mfcc).preprocess(&raw).unwrap() {
            AudioValue::Mfcc(features) => assert_eq!(features.ncols(), 12),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn each_neighbor_silences_exactly_one_window() {
        let component = Audio::default().interpret(AudioInterpretation { segments: 4 });
        let raw = wav_uri(&ramp(100), 8000);
        let n = component.interpretation_neighbors(&raw).unwrap();
        assert_eq!(n.len(), 4);
        assert!(n.by_removal);
        assert_eq!(n.aux, AuxPayload::Empty);
        for (index, value) in n.values.iter().enumerate() {
            let wav = read_wav(Cursor::new(decode_base64_to_binary(value).unwrap())).unwrap();
            assert_eq!(wav.samples.frames(), 100);
            let samples = wav.samples.to_f32();
            for frame in 0..100 {
                let silent = samples[[frame, 0]] == 0.0;
                assert_eq!(silent, frame / 25 == index, "frame {}", frame);
            }
        }
    }

    #[test]
    fn frames_outside_the_window_keep_full_precision() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Int,
        };
        let raw = encode_wav_to_base64(&WavData {
            spec,
            samples: Samples::Int(ndarray::Array2::from_elem((8, 1), 16_777_217)),
        })
        .unwrap();
        let component = Audio::default().interpret(AudioInterpretation { segments: 2 });
        let n = component.interpretation_neighbors(&raw).unwrap();
        let first = read_wav(Cursor::new(decode_base64_to_binary(&n.values[0]).unwrap())).unwrap();
        let expected = ndarray::Array2::from_shape_vec(
            (8, 1),
            vec![0, 0, 0, 0, 16_777_217, 16_777_217, 16_777_217, 16_777_217],
        )
        .unwrap();
        assert_eq!(first.samples, Samples::Int(expected));
    }

    #[test]
    fn scores_pass_through() {
        let scores = [0.5, -0.25];
        let out = Audio::default()
            .interpretation_scores(&String::new(), &[], &scores, &AuxPayload::Empty)
            .unwrap();
        assert_eq!(out, scores.to_vec());
    }

    #[test]
    fn embedding_is_not_supported() {
        let native = AudioValue::Mfcc(ndarray::Array2::zeros((1, 12)));
        let err = Audio::default().embed(&native).unwrap_err();
        assert!(matches!(err, ComponentError::NotSupported(_)));
        assert_eq!(
            err.to_string(),
            "Not Supported: audio doesn't currently support embeddings"
        );
    }

    #[test]
    fn template_context_reports_source() {
        let mic = Audio::new(AudioConfig {
            source: AudioSource::Microphone,
            ..AudioConfig::default()
        });
        assert_eq!(mic.template_context()["source"], "microphone");
    }

    #[test]
    fn test_input_preprocesses_to_samples() {
        let component = audio(AudioType::Numpy);
        let sample = component.test_input().unwrap().unwrap();
        match component.preprocess(&sample).unwrap() {
            AudioValue::Samples(samples) => assert_eq!(samples.sample_rate, 16000),
            other => panic!("unexpected value {:?}", other),
        }
    }
}
