//! Ray/cylinder intersection.
//!
//! The cylinder runs along +z from z = 0 to z = height. Both ends are closed
//! intervals: a side hit at exactly z = 0 or z = height counts as a side hit.

use kdray_core::Cylinder;
use kdray_math::{Ray, Vec3};

use crate::candidates::Candidates;

/// Where a side root lies relative to the cylinder's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Below,
    Inside,
    Above,
}

fn classify(z: f32, height: f32) -> Span {
    if z < 0.0 {
        Span::Below
    } else if z > height {
        Span::Above
    } else {
        Span::Inside
    }
}

pub fn intersect(cylinder: &Cylinder, ray: &Ray) -> Candidates {
    if ray.is_degenerate() {
        return Candidates::NONE;
    }

    let (o, d) = (ray.origin, ray.direction);
    let r = cylinder.radius;
    let h = cylinder.height;

    let a = d.x * d.x + d.y * d.y;
    let b = 2.0 * (o.x * d.x + o.y * d.y);
    let c = o.x * o.x + o.y * o.y - r * r;

    let side = |t: f32| {
        let p = ray.at(t);
        (t, Vec3::new(p.x, p.y, 0.0).normalize_or_zero())
    };
    let bottom = || ((0.0 - o.z) / d.z, Vec3::NEG_Z);
    let top = || ((h - o.z) / d.z, Vec3::Z);

    // Parallel to the axis: never touches the side, so either misses or
    // passes through both caps.
    if a == 0.0 {
        if c > 0.0 || !cylinder.capped {
            return Candidates::NONE;
        }
        return Candidates::two(bottom(), top()).sorted();
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return Candidates::NONE;
    }

    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);

    let s0 = classify(o.z + t0 * d.z, h);
    let s1 = classify(o.z + t1 * d.z, h);

    use Span::*;
    let hits = match (s0, s1) {
        (Inside, Inside) => Candidates::two(side(t0), side(t1)),

        (Below, Below) | (Above, Above) => Candidates::NONE,

        // Enters one cap and leaves through the other inside the tube.
        (Below, Above) | (Above, Below) => {
            if cylinder.capped {
                Candidates::two(bottom(), top())
            } else {
                Candidates::NONE
            }
        }

        (Inside, Below) => Candidates::two(side(t0), if cylinder.capped { bottom() } else { side(t0) }),
        (Below, Inside) => Candidates::two(if cylinder.capped { bottom() } else { side(t1) }, side(t1)),
        (Inside, Above) => Candidates::two(side(t0), if cylinder.capped { top() } else { side(t0) }),
        (Above, Inside) => Candidates::two(if cylinder.capped { top() } else { side(t1) }, side(t1)),
    };

    hits.sorted()
}
