use crate::core::model::{Detection, RawDetection};
use crate::error::{LayoutError, Result};

/// Convert one OCR record into a [`Detection`].
///
/// `x` is the first (top-left) corner. `y` is the bottom edge pushed down by
/// half the box height, which keeps boxes of uneven height on the same row.
pub fn normalize(raw: &RawDetection) -> Result<Detection> {
    let malformed = |reason: &str| LayoutError::MalformedDetection {
        text: raw.text.clone(),
        reason: reason.to_string(),
    };

    if raw.region.corners.iter().any(|p| !p.is_finite()) {
        return Err(malformed("corner coordinates must be finite"));
    }
    if raw.region.distinct_corners() < 2 {
        return Err(malformed("bounding region needs at least two distinct corners"));
    }

    let (Some(x), Some(top), Some(bottom)) =
        (raw.region.left_x(), raw.region.top(), raw.region.bottom())
    else {
        return Err(malformed("bounding region has no corners"));
    };

    Ok(Detection {
        text: raw.text.clone(),
        x,
        y: bottom + (bottom - top) / 2.0,
        length: raw.text.chars().count(),
    })
}

pub fn normalize_all(raws: &[RawDetection]) -> Result<Vec<Detection>> {
    raws.iter().map(normalize).collect()
}
