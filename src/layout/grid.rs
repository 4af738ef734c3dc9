use crate::core::model::{Detection, GridCell, PlacedDetection};
use crate::error::Result;
use crate::layout::binning::bin_axis;

/// Flip image-space `y` (growing downward) into reading space, so that a
/// larger value is nearer the top of the page.
pub fn flip_rows(detections: &[Detection]) -> Vec<f64> {
    let max_y = detections
        .iter()
        .map(|d| d.y)
        .fold(f64::NEG_INFINITY, f64::max);
    detections.iter().map(|d| max_y - d.y).collect()
}

/// Attach a row and column bucket to every detection of a page.
pub fn assign_grid(
    detections: Vec<Detection>,
    num_rows: usize,
    num_columns: usize,
) -> Result<Vec<PlacedDetection>> {
    if detections.is_empty() {
        return Ok(Vec::new());
    }

    let rows = bin_axis(&flip_rows(&detections), num_rows)?;
    let xs: Vec<f64> = detections.iter().map(|d| d.x).collect();
    let columns = bin_axis(&xs, num_columns)?;

    Ok(detections
        .into_iter()
        .zip(rows.into_iter().zip(columns))
        .map(|(detection, (row, column))| PlacedDetection {
            detection,
            cell: GridCell { row, column },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn top_of_page_gets_highest_row() {
        let detections = vec![
            Detection::new("footer", 10.0, 900.0),
            Detection::new("title", 10.0, 20.0),
            Detection::new("body", 300.0, 450.0),
        ];
        let placed = assign_grid(detections, 3, 2).unwrap();

        let cells: Vec<(&str, GridCell)> = placed
            .iter()
            .map(|p| (p.detection.text.as_str(), p.cell))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("footer", GridCell { row: 0, column: 0 }),
                ("title", GridCell { row: 2, column: 0 }),
                ("body", GridCell { row: 1, column: 1 }),
            ]
        );
    }

    #[test]
    fn empty_page_skips_binning() {
        assert!(assign_grid(Vec::new(), 0, 0).unwrap().is_empty());
    }

    #[test]
    fn keeps_every_detection() {
        let detections: Vec<Detection> = (0..25)
            .map(|i| Detection::new(format!("w{i}"), (i % 5) as f64 * 40.0, (i / 5) as f64 * 30.0))
            .collect();
        let placed = assign_grid(detections.clone(), 4, 4).unwrap();
        assert_eq!(placed.len(), detections.len());
        for (p, d) in placed.iter().zip(&detections) {
            assert_eq!(&p.detection, d);
        }
    }
}
