use crate::shared::constants::SMILE_TOLERANCE;

/// An axis-aligned detection box in frame pixel coordinates.
///
/// `bottom_right` is exclusive, matching OpenCV's `Rect::br()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a region from its top-left and bottom-right corners.
    pub fn from_corners(top_left: (i32, i32), bottom_right: (i32, i32)) -> Self {
        Self::new(
            top_left.0,
            top_left.1,
            bottom_right.0 - top_left.0,
            bottom_right.1 - top_left.1,
        )
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }

    pub fn vertical_midpoint(&self) -> f64 {
        (self.y as f64 + (self.y + self.height) as f64) / 2.0
    }

    /// Whether a smile box sits in the lower half of `face`.
    ///
    /// Both horizontal edges and the bottom edge get `SMILE_TOLERANCE`
    /// pixels of slack; the top of the smile must be at or below the
    /// face's vertical midpoint.
    pub fn smile_within(&self, face: &Region) -> bool {
        let (left, top) = self.top_left();
        let (right, bottom) = self.bottom_right();
        let (face_left, _) = face.top_left();
        let (face_right, face_bottom) = face.bottom_right();
        let within_x =
            |x: i32| x >= face_left - SMILE_TOLERANCE && x <= face_right + SMILE_TOLERANCE;

        within_x(left)
            && top as f64 >= face.vertical_midpoint()
            && within_x(right)
            && bottom <= face_bottom + SMILE_TOLERANCE
    }

    /// Whether an eye box starts in the upper half of `face` and stays
    /// inside its horizontal span. No tolerance applies.
    pub fn eye_within(&self, face: &Region) -> bool {
        let (left, top) = self.top_left();
        let (right, _) = self.bottom_right();
        let (face_left, _) = face.top_left();
        let (face_right, _) = face.bottom_right();
        let within_x = |x: i32| x >= face_left && x <= face_right;

        within_x(left) && top as f64 <= face.vertical_midpoint() && within_x(right)
    }
}
