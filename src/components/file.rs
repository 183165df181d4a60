// src/components/file.rs
use crate::component::ComponentKind;
use crate::core::{FilePayload, FileType, FileValue, Result};
use crate::traits::InputComponent;
use crate::utils::processing::{decode_base64_to_binary, decode_base64_to_file};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(rename = "type")]
    pub return_type: FileType,
    pub label: Option<String>,
}

/// Generic file upload. Has no interpretation.
#[derive(Debug, Clone, Default)]
pub struct File {
    config: FileConfig,
}

impl File {
    pub fn new(config: FileConfig) -> Self {
        File { config }
    }
}

impl InputComponent for File {
    type Raw = FilePayload;
    type Native = FileValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::File
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    /// Local examples are read from `name` on disk; uploads are decoded from `data`.
    fn preprocess(&self, raw: &FilePayload) -> Result<FileValue> {
        match (self.config.return_type, raw.is_local_example) {
            (FileType::File, true) => Ok(FileValue::Local(fs::File::open(&raw.name)?)),
            (FileType::File, false) => Ok(FileValue::Temp(decode_base64_to_file(&raw.data)?)),
            (FileType::Bytes, true) => Ok(FileValue::Bytes(fs::read(&raw.name)?)),
            (FileType::Bytes, false) => Ok(FileValue::Bytes(decode_base64_to_binary(&raw.data)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComponentError;
    use crate::utils::processing::encode_bytes_to_base64;
    use std::io::{Read, Write};

    fn upload(bytes: &[u8]) -> FilePayload {
        FilePayload {
            name: "notes.txt".to_string(),
            data: encode_bytes_to_base64(bytes, "text/plain"),
            is_local_example: false,
        }
    }

    fn bytes_component() -> File {
        File::new(FileConfig {
            return_type: FileType::Bytes,
            label: None,
        })
    }

    #[test]
    fn upload_becomes_temp_file() {
        match File::default().preprocess(&upload(b"payload")).unwrap() {
            FileValue::Temp(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).unwrap();
                assert_eq!(contents, "payload");
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn upload_as_bytes() {
        match bytes_component().preprocess(&upload(&[0, 1, 2, 255])).unwrap() {
            FileValue::Bytes(bytes) => assert_eq!(bytes, vec![0, 1, 2, 255]),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn local_examples_are_read_from_disk() {
        let mut example = tempfile::NamedTempFile::new().unwrap();
        example.write_all(b"from disk").unwrap();
        let payload = FilePayload {
            name: example.path().to_string_lossy().to_string(),
            data: String::new(),
            is_local_example: true,
        };
        match bytes_component().preprocess(&payload).unwrap() {
            FileValue::Bytes(bytes) => assert_eq!(bytes, b"from disk".to_vec()),
            other => panic!("unexpected value {:?}", other),
        }
        match File::default().preprocess(&payload).unwrap() {
            FileValue::Local(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).unwrap();
                assert_eq!(contents, "from disk");
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn missing_local_example_is_an_io_error() {
        let payload = FilePayload {
            name: "/definitely/not/here.bin".to_string(),
            data: String::new(),
            is_local_example: true,
        };
        assert!(matches!(
            File::default().preprocess(&payload),
            Err(ComponentError::Io(_))
        ));
    }

    #[test]
    fn wire_payload_defaults_optional_fields() {
        let payload: FilePayload = serde_json::from_str(r#"{"name": "a.txt"}"#).unwrap();
        assert_eq!(payload.data, "");
        assert!(!payload.is_local_example);
    }

    #[test]
    fn embedding_is_not_supported() {
        let err = File::default()
            .embed(&FileValue::Bytes(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, ComponentError::NotSupported(_)));
    }
}
