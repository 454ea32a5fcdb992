//! Axis-aligned box geometry for entities, platforms and the castle
//!
//! A rect is stored as its top-left corner plus extents. Screen convention:
//! y grows downward, so `top() < bottom()`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edge only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }
}
