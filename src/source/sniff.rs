use anyhow::Result;
use image::ImageFormat;

const SUPPORTED_IMAGES: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image(ImageFormat),
}

impl FileKind {
    pub fn tag(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image(format) => format.extensions_str().first().copied().unwrap_or("image"),
        }
    }
}

/// Identify the input from its leading bytes.
pub fn sniff(bytes: &[u8]) -> Result<FileKind> {
    if bytes.starts_with(b"%PDF-") {
        return Ok(FileKind::Pdf);
    }

    match image::guess_format(bytes) {
        Ok(format) if SUPPORTED_IMAGES.contains(&format) => Ok(FileKind::Image(format)),
        Ok(format) => anyhow::bail!(
            "unsupported image format {format:?}; expected pdf or one of {}",
            supported_list()
        ),
        Err(_) => anyhow::bail!(
            "unknown file format; expected pdf or one of {}",
            supported_list()
        ),
    }
}

fn supported_list() -> String {
    SUPPORTED_IMAGES
        .iter()
        .filter_map(|f| f.extensions_str().first().copied())
        .collect::<Vec<_>>()
        .join(", ")
}
