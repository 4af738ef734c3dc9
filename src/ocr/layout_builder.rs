use std::sync::Arc;

use tracing::{debug, info_span, Span};

use crate::core::model::{LayoutParams, PageText};
use crate::error::{LayoutError, Result, Stage};
use crate::layout::reconstruct_page;
use crate::ocr::normalize::normalize_all;
use crate::ocr::OcrBackend;

/// Runs OCR on one page image and rebuilds its text layout.
#[derive(Clone)]
pub struct OcrLayoutBuilder {
    backend: Arc<dyn OcrBackend>,
    params: LayoutParams,
    span: Option<Span>,
}

impl OcrLayoutBuilder {
    pub fn new(backend: Arc<dyn OcrBackend>, params: LayoutParams) -> Self {
        Self {
            backend,
            params,
            span: None,
        }
    }

    /// Parent span for page spans. Without one, pages open under whatever
    /// span is current when they run.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn analyze_page(&self, page_id: usize, image: &[u8]) -> Result<PageText> {
        let parent = self.span.clone().unwrap_or_else(Span::current);
        let span = info_span!(parent: &parent, "page", page_id);
        let _guard = span.enter();

        let raw = self
            .backend
            .detect_text(image)
            .map_err(|err| LayoutError::page(page_id, Stage::Ocr, err))?;
        debug!(detections = raw.len(), "ocr finished");

        let text = normalize_all(&raw)
            .and_then(|detections| reconstruct_page(detections, &self.params))
            .map_err(|err| LayoutError::page(page_id, Stage::Layout, err))?;
        debug!(lines = text.lines().count(), "layout rebuilt");

        Ok(PageText { page_id, text })
    }
}

impl std::fmt::Debug for OcrLayoutBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrLayoutBuilder")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Point, Region};
    use crate::core::model::RawDetection;
    use pretty_assertions::assert_eq;

    struct FixedBackend(Vec<RawDetection>);

    impl OcrBackend for FixedBackend {
        fn detect_text(&self, _image: &[u8]) -> anyhow::Result<Vec<RawDetection>> {
            Ok(self.0.clone())
        }
    }

    struct FailingBackend;

    impl OcrBackend for FailingBackend {
        fn detect_text(&self, _image: &[u8]) -> anyhow::Result<Vec<RawDetection>> {
            anyhow::bail!("model not loaded")
        }
    }

    fn word(text: &str, x: f64, y: f64) -> RawDetection {
        RawDetection {
            region: Region::new(vec![
                Point::new(x, y),
                Point::new(x + 50.0, y),
                Point::new(x + 50.0, y + 10.0),
                Point::new(x, y + 10.0),
            ]),
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn builds_page_text_from_backend_output() {
        let backend = FixedBackend(vec![word("World", 60.0, 5.0), word("Hello", 0.0, 5.0)]);
        let builder = OcrLayoutBuilder::new(
            Arc::new(backend),
            LayoutParams::new(1, 2).with_space_reduction(8),
        );
        let page = builder.analyze_page(3, b"png").unwrap();
        assert_eq!(
            page,
            PageText {
                page_id: 3,
                text: "Hello   World".to_string(),
            }
        );
    }

    #[test]
    fn wraps_ocr_failures_with_page_and_stage() {
        let builder = OcrLayoutBuilder::new(Arc::new(FailingBackend), LayoutParams::default());
        let err = builder.analyze_page(7, b"png").unwrap_err();
        match err {
            LayoutError::PageProcessing { page_id, stage, source } => {
                assert_eq!(page_id, 7);
                assert_eq!(stage, Stage::Ocr);
                assert!(source.to_string().contains("model not loaded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_geometry_is_a_layout_failure() {
        let mut bad = word("x", 0.0, 0.0);
        bad.region = Region::new(vec![Point::new(1.0, 1.0)]);
        let builder =
            OcrLayoutBuilder::new(Arc::new(FixedBackend(vec![bad])), LayoutParams::default());

        let err = builder.analyze_page(1, b"png").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::PageProcessing {
                stage: Stage::Layout,
                ..
            }
        ));
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("malformed detection"));
    }
}
