pub mod assembler;
pub mod core;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod pipeline;
pub mod source;

pub use assembler::DocumentAssembler;
pub use crate::core::model::{Detection, LayoutParams, PageText, RawDetection};
pub use error::{LayoutError, Stage};
pub use ocr::{OcrBackend, OcrLayoutBuilder};
