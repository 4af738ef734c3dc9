use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::model::RawDetection;
use crate::ocr::OcrBackend;

/// OCR backend that shells out to an EasyOCR-style script.
///
/// The script receives `--image <path> --lang <codes>` (plus `--gpu` when
/// enabled) and prints a JSON array of `[corners, text, confidence]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrBridge {
    python: PathBuf,
    script_path: PathBuf,
    languages: Vec<String>,
    gpu: bool,
}

impl Default for OcrBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBridge {
    pub fn new() -> Self {
        Self {
            python: PathBuf::from("python3"),
            script_path: PathBuf::from("ocr/bridge/easyocr_bridge.py"),
            languages: vec!["en".to_string(), "pt".to_string()],
            gpu: true,
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_python(mut self, python: PathBuf) -> Self {
        self.python = python;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }

    fn run(&self, image_path: &Path) -> Result<Vec<RawDetection>> {
        let mut command = Command::new(&self.python);
        command
            .arg(&self.script_path)
            .arg("--image")
            .arg(image_path)
            .arg("--lang")
            .arg(self.languages.join(","));
        if self.gpu {
            command.arg("--gpu");
        }

        let script = self.script_path.display();
        let output = command
            .output()
            .with_context(|| format!("failed to invoke OCR bridge {script}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("OCR bridge failed ({}): {}", output.status, stderr.trim());
        }

        parse_bridge_output(&String::from_utf8_lossy(&output.stdout))
    }
}

impl OcrBackend for OcrBridge {
    fn detect_text(&self, image: &[u8]) -> Result<Vec<RawDetection>> {
        let mut file = tempfile::Builder::new()
            .prefix("ocrlayout-page-")
            .tempfile()
            .with_context(|| "failed to create temp file for OCR")?;
        file.write_all(image)
            .with_context(|| "failed to write page image for OCR")?;
        file.flush()?;

        self.run(file.path())
    }
}

pub fn parse_bridge_output(stdout: &str) -> Result<Vec<RawDetection>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).with_context(|| "failed to parse OCR JSON response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_engine_triples() {
        let stdout = r#"
            [
              [[[10, 20], [80, 20], [80, 34], [10, 34]], "Contrato", 0.98],
              [[[100.5, 21], [160, 21], [160, 35], [100.5, 35]], "nº 42", 0.71]
            ]
        "#;
        let detections = parse_bridge_output(stdout).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[1].text, "nº 42");
        assert_eq!(detections[1].region.left_x(), Some(100.5));
    }

    #[test]
    fn blank_output_means_no_text() {
        assert!(parse_bridge_output("  \n").unwrap().is_empty());
    }

    #[test]
    fn reports_invalid_json() {
        let err = parse_bridge_output("Traceback (most recent call last)").unwrap_err();
        assert!(err.to_string().contains("OCR JSON"));
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let bridge = OcrBridge::new().with_python(PathBuf::from("/nonexistent/python-ocrlayout"));
        let err = bridge.detect_text(b"not an image").unwrap_err();
        assert!(err.to_string().contains("failed to invoke OCR bridge"));
    }
}
