//! Positioned text primitives.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page space.
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box (never negative).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the box (never negative).
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A run of text with its position and font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, bbox: BBox, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
        }
    }

    /// Left edge.
    pub fn x(&self) -> f32 {
        self.bbox.x0
    }

    /// Top edge.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let b = BBox::new(10.0, 20.0, 60.0, 32.0);
        assert_eq!(b.width(), 50.0);
        assert_eq!(b.height(), 12.0);

        let inverted = BBox::new(10.0, 20.0, 5.0, 10.0);
        assert_eq!(inverted.width(), 0.0);
        assert_eq!(inverted.height(), 0.0);
    }

    #[test]
    fn test_bbox_union_and_finite() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, -5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), BBox::new(0.0, -5.0, 20.0, 10.0));
        assert!(a.is_finite());
        assert!(!BBox::new(f32::NAN, 0.0, 1.0, 1.0).is_finite());
    }
}
