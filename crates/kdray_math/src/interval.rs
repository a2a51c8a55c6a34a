/// Closed span `[min, max]` of ray parameters or of one box axis.
///
/// Ray spans are `[near, far]`; boxes keep one per axis and the slab test
/// narrows a ray span against each of them in turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the span. Negative when inverted.
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Both ends are inclusive.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Widen by `delta / 2` at either end.
    pub fn expand(&self, delta: f32) -> Interval {
        let half = delta / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// `[min, t]` and `[t, max]`, with `t` clamped so neither piece inverts.
    pub fn split_at(&self, t: f32) -> (Interval, Interval) {
        let t = t.max(self.min).min(self.max);
        (Interval::new(self.min, t), Interval::new(t, self.max))
    }

    /// Holds nothing: `min` is above `max`.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}
