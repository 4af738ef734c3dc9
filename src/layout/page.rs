use std::collections::BTreeMap;

use crate::core::model::{LayoutParams, PlacedDetection};
use crate::layout::line::compose_line;

/// Join the rows of a page, highest row (top of the page) first.
pub fn compose_page(placed: Vec<PlacedDetection>, params: &LayoutParams) -> String {
    let mut rows: BTreeMap<usize, Vec<PlacedDetection>> = BTreeMap::new();
    for detection in placed {
        rows.entry(detection.cell.row).or_default().push(detection);
    }

    rows.values()
        .rev()
        .map(|row| compose_line(row, params))
        .collect::<Vec<_>>()
        .join("\n")
}
