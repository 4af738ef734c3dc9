use crate::core::model::{LayoutParams, PlacedDetection};

/// Build one line of text from the detections of a single row.
///
/// Fragments are ordered by column (then by `x`), and the gap before each
/// one is the distance from the running pivot divided by
/// `2 * (space_reduction_factor + 1)`. A fragment starting left of the
/// pivot still gets one space so overlapping boxes never glue words.
pub fn compose_line(row: &[PlacedDetection], params: &LayoutParams) -> String {
    let mut ordered: Vec<&PlacedDetection> = row.iter().collect();
    ordered.sort_by(|a, b| {
        a.cell
            .column
            .cmp(&b.cell.column)
            .then_with(|| a.detection.x.total_cmp(&b.detection.x))
    });

    // float math so very large factors cannot overflow
    let divisor = 2.0 * (params.space_reduction_factor as f64 + 1.0);
    let mut line = String::new();
    let mut pivot = 0.0_f64;

    for placed in ordered {
        let detection = &placed.detection;
        let spaces = if detection.x >= pivot {
            ((detection.x - pivot) / divisor).floor() as usize
        } else {
            1
        };
        line.push_str(&" ".repeat(spaces));
        line.push_str(&detection.text);
        // advances by character count; glyph_width_factor is not applied here
        pivot = detection.x + detection.length as f64;
    }

    line
}
