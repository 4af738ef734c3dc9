pub mod bridge;
pub mod layout_builder;
pub mod normalize;

pub use bridge::OcrBridge;
pub use layout_builder::OcrLayoutBuilder;

use anyhow::Result;

use crate::core::model::RawDetection;

/// Any OCR engine able to report text regions for an encoded page image.
pub trait OcrBackend: Send + Sync {
    fn detect_text(&self, image: &[u8]) -> Result<Vec<RawDetection>>;
}
