use crate::Vec3;

/// One of the three coordinate axes.
///
/// The kd-tree builder cycles X → Y → Z → X as it descends, so the next
/// axis is part of the type rather than something callers compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in cycling order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vec3` (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The axis used one level deeper in the kd-tree.
    #[inline]
    pub fn next(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Component of `v` along this axis.
    #[inline]
    pub fn of(self, v: Vec3) -> f32 {
        v[self.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_cycles_back_to_x() {
        assert_eq!(Axis::X.next(), Axis::Y);
        assert_eq!(Axis::Y.next(), Axis::Z);
        assert_eq!(Axis::Z.next(), Axis::X);
        assert_eq!(Axis::X.next().next().next(), Axis::X);
    }

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(-4.0, 0.5, 9.0);
        assert_eq!(Axis::X.of(v), -4.0);
        assert_eq!(Axis::Y.of(v), 0.5);
        assert_eq!(Axis::Z.of(v), 9.0);
    }
}
