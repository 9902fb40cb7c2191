//! Basic geometric types for page and image coordinates

/// An axis-aligned rectangle given by two opposite corners.
///
/// `(x0, y0)` is the minimum corner and `(x1, y1)` the maximum corner, so
/// `x0 <= x1` and `y0 <= y1` always hold for rectangles built through the
/// constructors and deserialization. Page coordinates put the origin at the
/// top-left corner with `y` growing downwards: pixels for images, points for
/// PDF pages.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RectangleCorners"))]
pub struct Rectangle {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rectangle {
    /// Create a rectangle from two corners, swapping coordinates if needed
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Create a rectangle from position and size
    pub fn from_position_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest rectangle enclosing both `self` and `other`
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Smallest rectangle enclosing every rectangle yielded by `rects`.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn union_all<'a, I>(rects: I) -> Option<Rectangle>
    where
        I: IntoIterator<Item = &'a Rectangle>,
    {
        rects
            .into_iter()
            .fold(None, |acc: Option<Rectangle>, rect| match acc {
                Some(bounds) => Some(bounds.union(rect)),
                None => Some(*rect),
            })
    }
}

/// Serialized corners, which may arrive in any order
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RectangleCorners {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

#[cfg(feature = "serde")]
impl From<RectangleCorners> for Rectangle {
    fn from(corners: RectangleCorners) -> Self {
        Rectangle::new(corners.x0, corners.y0, corners.x1, corners.y1)
    }
}
