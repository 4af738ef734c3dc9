use serde::{Deserialize, Serialize};

use crate::core::geometry::Region;
use crate::error::{LayoutError, Result};

/// One record as reported by the OCR engine: `[corners, text, confidence]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDetection {
    pub region: Region,
    pub text: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

/// A recognized text fragment placed in page pixel space.
///
/// `y` is the biased vertical anchor produced by the normalizer, not the
/// top edge of the box. `length` counts characters and stands in for the
/// horizontal extent of the text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub length: usize,
}

impl Detection {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self { text, x, y, length }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedDetection {
    pub detection: Detection,
    pub cell: GridCell,
}

/// Reconstructed text of one page, tagged with its 1-based id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageText {
    pub page_id: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutParams {
    pub num_rows: usize,
    pub num_columns: usize,
    pub space_reduction_factor: usize,
    pub glyph_width_factor: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            num_rows: 35,
            num_columns: 20,
            space_reduction_factor: 8,
            glyph_width_factor: 6,
        }
    }
}

impl LayoutParams {
    pub fn new(num_rows: usize, num_columns: usize) -> Self {
        Self {
            num_rows,
            num_columns,
            ..Self::default()
        }
    }

    pub fn with_space_reduction(mut self, factor: usize) -> Self {
        self.space_reduction_factor = factor;
        self
    }

    pub fn with_glyph_width(mut self, factor: usize) -> Self {
        self.glyph_width_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("num_rows", self.num_rows),
            ("num_columns", self.num_columns),
            ("space_reduction_factor", self.space_reduction_factor),
            ("glyph_width_factor", self.glyph_width_factor),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(LayoutError::InvalidParameters(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn raw_detection_reads_engine_triples() {
        let json = r#"[[[0, 10], [40, 10], [40, 22], [0, 22]], "Invoice", 0.93]"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.text, "Invoice");
        assert_eq!(raw.region.corners.len(), 4);
        assert!((raw.confidence - 0.93).abs() < f32::EPSILON);
    }

    #[test]
    fn detection_length_counts_characters() {
        let detection = Detection::new("Ação", 0.0, 0.0);
        assert_eq!(detection.length, 4);
    }

    #[test]
    fn rejects_zero_parameters() {
        let params = LayoutParams::new(10, 0);
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("num_columns"));
        assert!(LayoutParams::default().validate().is_ok());
    }
}
