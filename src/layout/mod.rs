//! Grid-based reconstruction of page text from positioned detections.

pub mod binning;
pub mod grid;
pub mod line;
pub mod page;

pub use binning::{bin_axis, AxisBucketing};

use crate::core::model::{Detection, LayoutParams};
use crate::error::Result;

/// Turn one page's detections into layout-preserving text.
pub fn reconstruct_page(detections: Vec<Detection>, params: &LayoutParams) -> Result<String> {
    params.validate()?;
    if detections.is_empty() {
        return Ok(String::new());
    }
    let placed = grid::assign_grid(detections, params.num_rows, params.num_columns)?;
    Ok(page::compose_page(placed, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_page() -> Vec<Detection> {
        vec![
            Detection::new("Total", 40.0, 610.0),
            Detection::new("INVOICE", 200.0, 30.0),
            Detection::new("Qty", 40.0, 300.0),
            Detection::new("Price", 400.0, 302.0),
            Detection::new("$10", 400.0, 612.0),
        ]
    }

    #[test]
    fn reconstructs_small_invoice() {
        let text = reconstruct_page(sample_page(), &LayoutParams::new(3, 3)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim(), "INVOICE");
        assert!(lines[1].trim_start().starts_with("Qty"));
        assert!(lines[1].trim_end().ends_with("Price"));
        assert!(lines[2].trim_start().starts_with("Total"));
        assert!(lines[2].trim_end().ends_with("$10"));
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let params = LayoutParams::new(10, 8);
        let first = reconstruct_page(sample_page(), &params).unwrap();
        let second = reconstruct_page(sample_page(), &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn upper_detections_never_come_later() {
        let detections = sample_page();
        let text = reconstruct_page(detections.clone(), &LayoutParams::new(6, 4)).unwrap();
        let line_of = |word: &str| text.lines().position(|l| l.contains(word)).unwrap();

        for a in &detections {
            for b in &detections {
                if a.y < b.y {
                    assert!(
                        line_of(a.text.as_str()) <= line_of(b.text.as_str()),
                        "{} placed after {}",
                        a.text,
                        b.text
                    );
                }
            }
        }
    }

    #[test]
    fn single_detection_single_cell() {
        let detections = vec![Detection::new("Hi", 0.0, 0.0)];
        let text = reconstruct_page(detections, &LayoutParams::new(1, 1)).unwrap();
        assert_eq!(text, "Hi");
    }

    #[test]
    fn empty_page_returns_empty_text() {
        assert_eq!(reconstruct_page(Vec::new(), &LayoutParams::default()).unwrap(), "");
    }
}
