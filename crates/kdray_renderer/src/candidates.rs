//! Raw intersection results of a single primitive.

use kdray_math::{Interval, Vec3};

/// Up to two `(t, normal)` pairs in object space.
///
/// Primitive routines report every root they find without looking at the
/// ray's bounds; the caller then picks the nearest one inside them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Candidates {
    items: [(f32, Vec3); 2],
    len: usize,
}

impl Candidates {
    pub const NONE: Candidates = Candidates {
        items: [(0.0, Vec3::ZERO); 2],
        len: 0,
    };

    pub fn one(t: f32, normal: Vec3) -> Self {
        let mut c = Self::NONE;
        c.push(t, normal);
        c
    }

    pub fn two(first: (f32, Vec3), second: (f32, Vec3)) -> Self {
        let mut c = Self::NONE;
        c.push(first.0, first.1);
        c.push(second.0, second.1);
        c
    }

    /// Add a candidate. Anything past the second is dropped.
    pub fn push(&mut self, t: f32, normal: Vec3) {
        if self.len < self.items.len() {
            self.items[self.len] = (t, normal);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f32, Vec3)> {
        self.items[..self.len].iter()
    }

    /// Order candidates by increasing `t`.
    pub fn sorted(mut self) -> Self {
        if self.len == 2 && self.items[1].0 < self.items[0].0 {
            self.items.swap(0, 1);
        }
        self
    }

    /// The candidate with the smallest `t` inside `bounds`.
    pub fn nearest_within(&self, bounds: Interval) -> Option<(f32, Vec3)> {
        self.iter()
            .filter(|(t, _)| t.is_finite() && bounds.contains(*t))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .copied()
    }
}
