use crate::{Axis, Interval, Ray, Vec3};

/// Axis-aligned bounding box.
///
/// Boxes cull rays before exact intersection tests and bound kd-tree cells
/// for the surface area heuristic. A box never replaces an exact test: it may
/// accept rays that miss the shape inside it, but it must not reject one that
/// hits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Minimum thickness given to boxes built from points.
const MIN_THICKNESS: f32 = 0.0001;

/// Relative growth applied by [`Aabb::with_rounding_margin`].
const ROUNDING_MARGIN: f32 = 1e-5;

impl Aabb {
    /// Create an AABB from two corner points.
    ///
    /// Flat boxes are padded to a small minimum thickness so that planar
    /// geometry still has a box the slab test can enter.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Tight box around a set of points, or `EMPTY` when there are none.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }

        if min.x > max.x {
            Aabb::EMPTY
        } else {
            Aabb::from_points(min, max)
        }
    }

    /// The box grown on every side by a margin relative to its coordinates.
    ///
    /// Boxes built from transformed corners or vertices carry rounding error
    /// of a few ulps, which can leave a face just inside the surface it
    /// bounds. The margin covers that error so the slab test never rejects a
    /// ray that hits the surface. Non-finite boxes come back unchanged.
    pub fn with_rounding_margin(&self) -> Aabb {
        let reach = self.min().abs().max(self.max().abs()).max_element();
        if !reach.is_finite() {
            return *self;
        }
        let margin = ROUNDING_MARGIN * (1.0 + reach);
        Aabb {
            x: self.x.expand(2.0 * margin),
            y: self.y.expand(2.0 * margin),
            z: self.z.expand(2.0 * margin),
        }
    }

    /// Get the extent along one axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn axis_interval_mut(&mut self, axis: Axis) -> &mut Interval {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Cut the box with the plane `axis = location`.
    ///
    /// Both halves keep the parent's extent on the other two axes. The
    /// location is not clamped: a split outside the box yields an inverted
    /// half, which has a surface area of its own but never contains anything.
    pub fn split(&self, axis: Axis, location: f32) -> (Aabb, Aabb) {
        let mut left = *self;
        let mut right = *self;
        left.axis_interval_mut(axis).max = location;
        right.axis_interval_mut(axis).min = location;
        (left, right)
    }

    /// Total area of the six faces.
    pub fn surface_area(&self) -> f32 {
        let dx = self.x.size();
        let dy = self.y.size();
        let dz = self.z.size();
        2.0 * (dx * dy + dy * dz + dz * dx)
    }

    /// Slab test that also clips the parametric span.
    ///
    /// Returns the part of `ray_t` for which the ray is inside the box, or
    /// `None` when that part is empty. A direction component of exactly zero
    /// never divides: the ray is then either inside that slab for its whole
    /// length or never. Grazing contact (an empty-width result) still counts
    /// as a hit.
    pub fn clip(&self, ray: &Ray, mut ray_t: Interval) -> Option<Interval> {
        for axis in Axis::ALL {
            let slab = self.axis_interval(axis);
            let origin = axis.of(ray.origin);
            let dir = axis.of(ray.direction);

            if dir == 0.0 {
                if origin < slab.min || origin > slab.max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return None;
            }
        }

        Some(ray_t)
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        for axis in Axis::ALL {
            let interval = self.axis_interval_mut(axis);
            if interval.size() < MIN_THICKNESS {
                *interval = interval.expand(MIN_THICKNESS);
            }
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
