use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Renders PDF pages to PNG through poppler's `pdfinfo`/`pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    dpi: u32,
    poppler_path: Option<PathBuf>,
}

impl Default for PdfRasterizer {
    fn default() -> Self {
        Self::new(200)
    }
}

impl PdfRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            poppler_path: None,
        }
    }

    /// Directory holding the poppler binaries, when they are not on `PATH`.
    pub fn with_poppler_path(mut self, poppler_path: Option<PathBuf>) -> Self {
        self.poppler_path = poppler_path;
        self
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.poppler_path {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    pub fn page_count(&self, pdf_path: &Path) -> Result<usize> {
        let output = Command::new(self.tool("pdfinfo"))
            .arg(pdf_path)
            .output()
            .with_context(|| "could not run pdfinfo; is poppler-utils installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pdfinfo exited with {}: {}", output.status, stderr.trim());
        }

        parse_page_count(&String::from_utf8_lossy(&output.stdout))
    }

    /// Render the selected 1-based pages (all pages when `pages` is `None`),
    /// returning PNG bytes in rendering order.
    pub fn rasterize(&self, pdf: &[u8], pages: Option<&[usize]>) -> Result<Vec<Vec<u8>>> {
        let work_dir = tempfile::Builder::new()
            .prefix("ocrlayout-pdf-")
            .tempdir()
            .with_context(|| "failed to create temp dir for rasterization")?;
        let pdf_path = work_dir.path().join("input.pdf");
        fs::write(&pdf_path, pdf).with_context(|| "failed to stage PDF for rasterization")?;

        let page_count = self.page_count(&pdf_path)?;
        let selected = select_pages(page_count, pages)?;
        debug!(page_count, selected = selected.len(), dpi = self.dpi, "rasterizing pdf");

        selected
            .into_iter()
            .map(|page_number| self.render_page(&pdf_path, work_dir.path(), page_number))
            .collect()
    }

    fn render_page(&self, pdf_path: &Path, out_dir: &Path, page_number: usize) -> Result<Vec<u8>> {
        let prefix = out_dir.join(format!("page_{:04}", page_number));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

        let status = Command::new(self.tool("pdftoppm"))
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed on page {page_number} with status: {status}");
        }

        // `-singlefile` writes `<prefix>.png` without a page suffix
        let image_path = prefix.with_extension("png");
        fs::read(&image_path)
            .with_context(|| format!("expected rendered image not found: {}", image_path.display()))
    }
}

/// Page count from the `Pages:` field of `pdfinfo` output.
fn parse_page_count(info: &str) -> Result<usize> {
    let field = info
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .map(str::trim)
        .ok_or_else(|| anyhow::anyhow!("pdfinfo reported no page count"))?;
    field
        .parse()
        .with_context(|| format!("unreadable page count {field:?}"))
}

/// Sorted, deduplicated page numbers to render.
fn select_pages(page_count: usize, pages: Option<&[usize]>) -> Result<Vec<usize>> {
    let Some(pages) = pages else {
        return Ok((1..=page_count).collect());
    };

    let mut selected = pages.to_vec();
    selected.sort_unstable();
    selected.dedup();
    if let Some(bad) = selected.iter().find(|&&p| p == 0 || p > page_count) {
        anyhow::bail!("page {bad} is out of range; document has {page_count} page(s)");
    }
    Ok(selected)
}
