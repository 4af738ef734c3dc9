use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Span};

use crate::assembler::{DocumentAssembler, DEFAULT_WORKERS};
use crate::core::model::LayoutParams;
use crate::ocr::{OcrBackend, OcrBridge, OcrLayoutBuilder};
use crate::source::{load_pages, PdfRasterizer};

#[derive(Debug, Clone)]
pub struct OcrOptions {
    pub languages: Vec<String>,
    pub gpu: bool,
    pub script: Option<PathBuf>,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "pt".to_string()],
            gpu: true,
            script: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub params: LayoutParams,
    pub workers: usize,
    pub dpi: u32,
    pub poppler_path: Option<PathBuf>,
    pub pages: Option<Vec<usize>>,
    pub ocr: OcrOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            params: LayoutParams::default(),
            workers: DEFAULT_WORKERS,
            dpi: 200,
            poppler_path: None,
            pages: None,
            ocr: OcrOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(params: LayoutParams, workers: usize) -> Self {
        Self {
            params,
            workers,
            ..Self::default()
        }
    }

    pub fn rasterizer(&self) -> PdfRasterizer {
        PdfRasterizer::new(self.dpi).with_poppler_path(self.poppler_path.clone())
    }

    pub fn ocr_bridge(&self) -> OcrBridge {
        let bridge = OcrBridge::new()
            .with_languages(self.ocr.languages.clone())
            .with_gpu(self.ocr.gpu);
        match &self.ocr.script {
            Some(script) => bridge.with_script(script.clone()),
            None => bridge,
        }
    }
}

/// Sniff the input, rasterize it if needed and rebuild its text.
///
/// Layout failures keep their [`LayoutError`](crate::LayoutError) in the
/// returned error chain.
pub fn extract_text(
    bytes: &[u8],
    config: &PipelineConfig,
    backend: Arc<dyn OcrBackend>,
    span: Span,
) -> Result<String> {
    let run = info_span!(parent: &span, "extract", bytes = bytes.len());
    let _guard = run.enter();

    config.params.validate()?;
    let pages = load_pages(bytes, &config.rasterizer(), config.pages.as_deref())
        .with_context(|| "failed to prepare page images")?;
    info!(pages = pages.len(), "page images ready");

    let builder = OcrLayoutBuilder::new(backend, config.params).with_span(run.clone());
    let assembler = DocumentAssembler::new(builder, config.workers)?.with_span(run.clone());
    let text = assembler.assemble(pages)?;

    info!(chars = text.len(), "document assembled");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RawDetection;
    use crate::error::LayoutError;
    use pretty_assertions::assert_eq;

    struct NoText;

    impl OcrBackend for NoText {
        fn detect_text(&self, _image: &[u8]) -> Result<Vec<RawDetection>> {
            Ok(Vec::new())
        }
    }

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn blank_image_surfaces_empty_document() {
        let err = extract_text(PNG, &PipelineConfig::default(), Arc::new(NoText), Span::none())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LayoutError>(),
            Some(LayoutError::EmptyDocument)
        ));
    }

    #[test]
    fn invalid_params_fail_before_ocr() {
        let config = PipelineConfig::new(LayoutParams::new(0, 5), 2);
        let err = extract_text(PNG, &config, Arc::new(NoText), Span::none()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LayoutError>(),
            Some(LayoutError::InvalidParameters(_))
        ));
    }

    #[test]
    fn bridge_follows_ocr_options() {
        let mut config = PipelineConfig::default();
        config.ocr.languages = vec!["de".to_string()];
        config.ocr.gpu = false;
        let expected = OcrBridge::new()
            .with_languages(vec!["de".to_string()])
            .with_gpu(false);
        assert_eq!(config.ocr_bridge(), expected);
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }
}
