pub mod rasterizer;
pub mod sniff;

pub use rasterizer::PdfRasterizer;
pub use sniff::{sniff, FileKind};

use std::collections::BTreeMap;

use anyhow::Result;

/// Split an input file into page images keyed by 1-based page id.
///
/// PDFs are rasterized (optionally restricted to `pages`); a supported
/// image is passed through as page 1.
pub fn load_pages(
    bytes: &[u8],
    rasterizer: &PdfRasterizer,
    pages: Option<&[usize]>,
) -> Result<BTreeMap<usize, Vec<u8>>> {
    match sniff(bytes)? {
        FileKind::Pdf => Ok(rasterizer
            .rasterize(bytes, pages)?
            .into_iter()
            .enumerate()
            .map(|(idx, image)| (idx + 1, image))
            .collect()),
        FileKind::Image(_) => Ok(BTreeMap::from([(1, bytes.to_vec())])),
    }
}
