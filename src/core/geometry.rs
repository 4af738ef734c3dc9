use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Corner points of a detected text region, in the OCR engine's order
/// (clockwise from top-left).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Region {
    pub corners: Vec<Point>,
}

impl Region {
    pub fn new(corners: Vec<Point>) -> Self {
        Self { corners }
    }

    pub fn distinct_corners(&self) -> usize {
        let mut distinct: Vec<Point> = Vec::with_capacity(self.corners.len());
        for corner in &self.corners {
            if !distinct.contains(corner) {
                distinct.push(*corner);
            }
        }
        distinct.len()
    }

    pub fn left_x(&self) -> Option<f64> {
        self.corners.first().map(|p| p.x)
    }

    pub fn top(&self) -> Option<f64> {
        self.corners.iter().map(|p| p.y).reduce(f64::min)
    }

    pub fn bottom(&self) -> Option<f64> {
        self.corners.iter().map(|p| p.y).reduce(f64::max)
    }

    pub fn height(&self) -> f64 {
        match (self.top(), self.bottom()) {
            (Some(top), Some(bottom)) => bottom - top,
            _ => 0.0,
        }
    }
}
