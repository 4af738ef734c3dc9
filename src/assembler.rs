use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::unbounded;
use tracing::{error, info, info_span, Span};

use crate::core::model::PageText;
use crate::error::{LayoutError, Result};
use crate::ocr::OcrLayoutBuilder;

pub const DEFAULT_WORKERS: usize = 2;

/// Processes the pages of a document on a bounded pool and stitches the
/// results back together in page order.
pub struct DocumentAssembler {
    builder: Arc<OcrLayoutBuilder>,
    pool: rayon::ThreadPool,
    workers: usize,
    span: Span,
}

impl DocumentAssembler {
    pub fn new(builder: OcrLayoutBuilder, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(LayoutError::InvalidParameters(
                "worker count must be at least 1".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("ocr-page-{idx}"))
            .panic_handler(|_| error!("page worker panicked"))
            .build()?;

        Ok(Self {
            builder: Arc::new(builder),
            pool,
            workers,
            span: Span::current(),
        })
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Run every page and return the lower-cased, page-delimited text.
    ///
    /// The first failed page aborts collection; pages already handed to the
    /// pool may keep running after the error is returned.
    pub fn assemble(&self, pages: BTreeMap<usize, Vec<u8>>) -> Result<String> {
        let span = info_span!(
            parent: &self.span,
            "assemble",
            pages = pages.len(),
            workers = self.workers
        );
        let _guard = span.enter();

        let page_ids: Vec<usize> = pages.keys().copied().collect();
        let (tx, rx) = unbounded();

        for (page_id, image) in pages {
            let tx = tx.clone();
            let builder = Arc::clone(&self.builder);
            let parent = span.clone();
            self.pool.spawn(move || {
                let result = parent.in_scope(|| builder.analyze_page(page_id, &image));
                // receiver is gone once the call has already failed
                let _ = tx.send(result);
            });
        }
        drop(tx);

        let mut collected: Vec<PageText> = Vec::with_capacity(page_ids.len());
        for result in rx.iter() {
            let page = result.inspect_err(|err| error!(error = %err, "page failed"))?;
            info!(page_id = page.page_id, "page done");
            collected.push(page);
        }

        if collected.len() < page_ids.len() {
            let missing = page_ids
                .iter()
                .copied()
                .find(|id| !collected.iter().any(|p| p.page_id == *id))
                .unwrap_or_default();
            return Err(LayoutError::WorkerLost { page_id: missing });
        }

        join_pages(collected)
    }
}

/// Order pages by id, append a boundary marker after each, lower-case.
pub fn join_pages(mut pages: Vec<PageText>) -> Result<String> {
    if pages.iter().all(|p| p.text.trim().is_empty()) {
        return Err(LayoutError::EmptyDocument);
    }
    pages.sort_by_key(|p| p.page_id);

    let mut content = Vec::with_capacity(pages.len() * 2);
    for page in pages {
        content.push(page.text);
        content.push(format!("End of page {}", page.page_id));
    }
    Ok(content.join("\n").to_lowercase())
}
