//! Ray/cone intersection.
//!
//! The cone has its base of `radius` at z = 0 and its apex at z = height.
//! With `k = radius / height` the side satisfies `x² + y² = k²(height - z)²`
//! for z in the closed range [0, height].

use kdray_core::Cone;
use kdray_math::{Ray, Vec3};

use crate::candidates::Candidates;

pub fn intersect(cone: &Cone, ray: &Ray) -> Candidates {
    if ray.is_degenerate() || cone.height <= 0.0 {
        return Candidates::NONE;
    }

    let (o, d) = (ray.origin, ray.direction);
    let h = cone.height;
    let k = cone.radius / h;
    let k2 = k * k;
    let dz_apex = h - o.z;

    let a = d.x * d.x + d.y * d.y - k2 * d.z * d.z;
    let b = 2.0 * (o.x * d.x + o.y * d.y + k2 * dz_apex * d.z);
    let c = o.x * o.x + o.y * o.y - k2 * dz_apex * dz_apex;

    let mut hits = Candidates::NONE;
    let mut side = |t: f32| {
        let p = ray.at(t);
        if (0.0..=h).contains(&p.z) {
            let n = Vec3::new(p.x, p.y, k2 * (h - p.z)).normalize_or_zero();
            hits.push(t, if n == Vec3::ZERO { Vec3::Z } else { n });
        }
    };

    if a == 0.0 {
        // Parallel to the slant: the quadratic degenerates to a line.
        if b != 0.0 {
            side(-c / b);
        }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 && discriminant.is_finite() {
            let sqrtd = discriminant.sqrt();
            let t0 = (-b - sqrtd) / (2.0 * a);
            let t1 = (-b + sqrtd) / (2.0 * a);
            if discriminant == 0.0 {
                side(t0);
            } else {
                side(t0);
                side(t1);
            }
        }
    }

    // A line meets a convex solid at most twice, so the base is only
    // checked while there is room for it.
    if cone.capped && hits.len() < 2 && d.z != 0.0 {
        let t = -o.z / d.z;
        let p = ray.at(t);
        if p.x * p.x + p.y * p.y <= cone.radius * cone.radius {
            hits.push(t, Vec3::NEG_Z);
        }
    }

    hits.sorted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cone(capped: bool) -> Cone {
        Cone {
            radius: 1.0,
            height: 2.0,
            capped,
        }
    }

    #[test]
    fn test_down_the_axis_hits_apex_then_base() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let c = intersect(&cone(true), &ray);
        let all: Vec<_> = c.iter().copied().collect();

        // Apex at t = 3 (tangent root), base at t = 5.
        assert_eq!(all.len(), 2);
        assert!((all[0].0 - 3.0).abs() < 1e-5);
        assert_eq!(all[0].1, Vec3::Z);
        assert!((all[1].0 - 5.0).abs() < 1e-5);
        assert_eq!(all[1].1, Vec3::NEG_Z);
    }

    #[test]
    fn test_horizontal_side_hits() {
        // At z = 1 the radius is 0.5.
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::X);
        let c = intersect(&cone(false), &ray);
        assert_eq!(c.len(), 2);

        let (t, n) = c.nearest_within(ray.bounds()).unwrap();
        assert!((t - 4.5).abs() < 1e-5);

        // Slant normal leans outward and up.
        assert!(n.x < 0.0 && n.z > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);
        let expected = Vec3::new(-0.5, 0.0, 0.25).normalize();
        assert!((n - expected).length() < 1e-5);
    }

    #[test]
    fn test_discriminant_cases() {
        // Misses the cone entirely.
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 1.0), Vec3::X);
        assert!(intersect(&cone(false), &ray).is_empty());

        // Crosses the mirrored nappe above the apex only.
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 3.0), Vec3::X);
        assert!(intersect(&cone(false), &ray).is_empty());
    }

    #[test]
    fn test_base_cap_from_below() {
        let ray = Ray::new(Vec3::new(0.5, 0.0, -3.0), Vec3::Z);
        let open = intersect(&cone(false), &ray);
        let closed = intersect(&cone(true), &ray);

        // Without the base the only hit is where it leaves through the slant.
        assert_eq!(open.len(), 1);

        let (t, n) = closed.nearest_within(ray.bounds()).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
        assert_eq!(n, Vec3::NEG_Z);
    }

    #[test]
    fn test_base_rim_is_closed() {
        // Horizontal ray in the base plane touches the side at radius 1.
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let (t, _) = intersect(&cone(false), &ray)
            .nearest_within(ray.bounds())
            .unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let ray = Ray::new(Vec3::new(-5.0, 0.0, -0.001), Vec3::X);
        assert!(intersect(&cone(false), &ray).is_empty());
    }

    #[test]
    fn test_parallel_to_slant() {
        // Direction parallel to the slant line through (1,0,0) and the apex.
        let d = Vec3::new(-1.0, 0.0, 2.0);
        let ray = Ray::new(Vec3::new(-0.5, 0.0, -1.0), d);
        let c = intersect(&cone(false), &ray);
        assert_eq!(c.len(), 1);
        let p = ray.at(c.iter().next().unwrap().0);
        assert!(((p.x * p.x + p.y * p.y).sqrt() - 0.5 * (2.0 - p.z)).abs() < 1e-4);
    }
}
