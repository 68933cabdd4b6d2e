use super::{FULL_TURN, POINTER_ANGLE};
use std::f64::consts::PI;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Angular width of every slice, or `None` when there is nothing to slice.
pub fn slice_width(count: usize) -> Option<f64> {
    (count > 0).then(|| FULL_TURN / count as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSpan {
    pub start: f64,
    pub end: f64,
}

impl SliceSpan {
    /// Slices are laid out clockwise from the wheel angle, one width apart.
    pub fn new(angle: f64, index: usize, width: f64) -> Self {
        let start = angle + index as f64 * width;
        Self {
            start,
            end: start + width,
        }
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

pub fn slice_spans(angle: f64, count: usize) -> Vec<SliceSpan> {
    slice_width(count)
        .map(|width| (0..count).map(|i| SliceSpan::new(angle, i, width)).collect())
        .unwrap_or_default()
}

/// Index of the slice under the pointer for a wheel resting at `angle`.
///
/// The remainder keeps the sign of the dividend, so an angle past the pointer
/// yields a negative index that is folded back into `[0, count)`.
pub fn selected_index(angle: f64, count: usize) -> Option<usize> {
    let width = slice_width(count)?;
    let quarter = FULL_TURN - POINTER_ANGLE;
    let raw = (((FULL_TURN - angle - quarter) % FULL_TURN) / width).floor() as i64;
    let count = count as i64;
    Some((count + raw).rem_euclid(count) as usize)
}
