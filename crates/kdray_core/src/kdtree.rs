//! kd-tree construction over mesh triangles.
//!
//! Each internal node splits its cell with an axis-aligned plane. The axis
//! cycles X, Y, Z by depth and the split location is chosen by the surface
//! area heuristic over every distinct vertex coordinate of the node's
//! triangles. Triangles that straddle a split are stored on both sides.

use std::collections::HashSet;

use kdray_math::{Aabb, Axis, Vec3};

use crate::mesh::Triangle;

/// Nodes holding this many triangles or fewer become leaves.
pub const KD_LEAF_TRIANGLES: usize = 10;

/// Nodes at this depth become leaves regardless of their triangle count.
pub const KD_MAX_DEPTH: usize = 8;

/// A node of the kd-tree.
#[derive(Debug, Clone)]
pub enum KdNode {
    Leaf {
        triangles: Vec<Triangle>,
    },
    Internal {
        axis: Axis,
        location: f32,
        /// Everything with a vertex at or below `location`
        left: Box<KdNode>,
        /// Everything with a vertex strictly above `location`
        right: Box<KdNode>,
    },
}

impl KdNode {
    /// Build a tree over `triangles`, whose corners index into `vertices`.
    ///
    /// `bounds` must enclose every vertex. It is the root cell and is only
    /// used to weigh candidate splits.
    pub fn build(vertices: &[Vec3], triangles: Vec<Triangle>, bounds: Aabb) -> KdNode {
        build_subtree(vertices, triangles, 0, Axis::X, bounds)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            KdNode::Leaf { .. } => 0,
            KdNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            KdNode::Leaf { .. } => 1,
            KdNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Total triangles stored in leaves, counting duplicates.
    pub fn triangle_refs(&self) -> usize {
        match self {
            KdNode::Leaf { triangles } => triangles.len(),
            KdNode::Internal { left, right, .. } => left.triangle_refs() + right.triangle_refs(),
        }
    }
}

fn build_subtree(
    vertices: &[Vec3],
    triangles: Vec<Triangle>,
    depth: usize,
    axis: Axis,
    bounds: Aabb,
) -> KdNode {
    if triangles.len() <= KD_LEAF_TRIANGLES || depth >= KD_MAX_DEPTH {
        return KdNode::Leaf { triangles };
    }

    let Some(location) = best_split(vertices, &triangles, axis, &bounds) else {
        return KdNode::Leaf { triangles };
    };

    let mut left = Vec::new();
    let mut right = Vec::new();
    for tri in triangles {
        let (in_left, in_right) = classify(vertices, &tri, axis, location);
        if in_left {
            left.push(tri);
        }
        if in_right {
            right.push(tri);
        }
    }

    let (left_bounds, right_bounds) = bounds.split(axis, location);
    let next = axis.next();

    KdNode::Internal {
        axis,
        location,
        left: Box::new(build_subtree(vertices, left, depth + 1, next, left_bounds)),
        right: Box::new(build_subtree(vertices, right, depth + 1, next, right_bounds)),
    }
}

/// Which sides of the plane `axis = location` a triangle touches.
///
/// A vertex on the plane counts as left.
fn classify(vertices: &[Vec3], tri: &Triangle, axis: Axis, location: f32) -> (bool, bool) {
    let mut left = false;
    let mut right = false;
    for &i in &tri.vertices {
        if axis.of(vertices[i as usize]) <= location {
            left = true;
        } else {
            right = true;
        }
    }
    (left, right)
}

/// Cheapest split location along `axis`, if any.
///
/// The cost of a split at `l` is `n_left * area(left cell) + n_right *
/// area(right cell)`. A triangle lands left when its smallest coordinate is
/// at or below `l` and right when its largest is above it, so both counts
/// come from binary searches over sorted per-triangle extents. Candidates
/// are visited in triangle order and ties keep the first one found.
///
/// Triangles duplicated across earlier splits can have vertices outside
/// `bounds`. Those coordinates are not candidates: cutting there leaves one
/// half inverted.
fn best_split(vertices: &[Vec3], triangles: &[Triangle], axis: Axis, bounds: &Aabb) -> Option<f32> {
    let n = triangles.len();
    let mut mins = Vec::with_capacity(n);
    let mut maxs = Vec::with_capacity(n);
    for tri in triangles {
        let coords = tri.vertices.map(|i| axis.of(vertices[i as usize]));
        mins.push(coords[0].min(coords[1]).min(coords[2]));
        maxs.push(coords[0].max(coords[1]).max(coords[2]));
    }
    mins.sort_by(f32::total_cmp);
    maxs.sort_by(f32::total_cmp);

    let slab = bounds.axis_interval(axis);
    let mut seen = HashSet::new();
    let mut best: Option<(f32, f32)> = None;

    for tri in triangles {
        for &i in &tri.vertices {
            let location = axis.of(vertices[i as usize]);
            if !location.is_finite() || !slab.contains(location) || !seen.insert(location.to_bits()) {
                continue;
            }

            let left_count = mins.partition_point(|&m| m <= location);
            let right_count = n - maxs.partition_point(|&m| m <= location);

            let (left_bounds, right_bounds) = bounds.split(axis, location);
            let cost = left_count as f32 * left_bounds.surface_area()
                + right_count as f32 * right_bounds.surface_area();

            if best.map_or(true, |(best_cost, _)| cost < best_cost) {
                best = Some((cost, location));
            }
        }
    }

    best.map(|(_, location)| location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn leaves(node: &KdNode) -> Vec<&Vec<Triangle>> {
        match node {
            KdNode::Leaf { triangles } => vec![triangles],
            KdNode::Internal { left, right, .. } => {
                let mut out = leaves(left);
                out.extend(leaves(right));
                out
            }
        }
    }

    /// A row of small separated triangles along X.
    fn strip(count: usize) -> (Vec<Vec3>, Vec<Triangle>) {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for k in 0..count {
            let x = k as f32 * 2.0;
            let base = vertices.len() as u32;
            vertices.push(Vec3::new(x, 0.0, 0.0));
            vertices.push(Vec3::new(x + 1.0, 0.0, 0.0));
            vertices.push(Vec3::new(x, 1.0, 0.0));
            triangles.push(Triangle::new([base, base + 1, base + 2]));
        }
        (vertices, triangles)
    }

    fn random_soup(rng: &mut StdRng, count: usize) -> (Vec<Vec3>, Vec<Triangle>) {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for _ in 0..count {
            let centre = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let base = vertices.len() as u32;
            for _ in 0..3 {
                let offset = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                vertices.push(centre + offset);
            }
            triangles.push(Triangle::new([base, base + 1, base + 2]));
        }
        (vertices, triangles)
    }

    #[test]
    fn test_small_mesh_is_single_leaf() {
        let (vertices, triangles) = strip(KD_LEAF_TRIANGLES);
        let bounds = Aabb::enclosing(vertices.iter().copied());
        let tree = KdNode::build(&vertices, triangles, bounds);

        assert!(tree.is_leaf());
        assert_eq!(tree.triangle_refs(), KD_LEAF_TRIANGLES);
    }

    #[test]
    fn test_root_splits_along_x() {
        let (vertices, triangles) = strip(40);
        let bounds = Aabb::enclosing(vertices.iter().copied());
        let tree = KdNode::build(&vertices, triangles, bounds);

        match &tree {
            KdNode::Internal { axis, location, .. } => {
                assert_eq!(*axis, Axis::X);
                // The far edge of the 20th triangle: halves the strip
                // without cutting through any triangle.
                assert_eq!(*location, 39.0);
            }
            KdNode::Leaf { .. } => panic!("40 triangles should split"),
        }
    }

    #[test]
    fn test_axis_cycles_with_depth() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(42);
        let (vertices, triangles) = random_soup(&mut rng, 400);
        let bounds = Aabb::enclosing(vertices.iter().copied());
        let tree = KdNode::build(&vertices, triangles, bounds);

        fn check(node: &KdNode, expected: Axis) {
            if let KdNode::Internal { axis, left, right, .. } = node {
                assert_eq!(*axis, expected);
                check(left, expected.next());
                check(right, expected.next());
            }
        }
        check(&tree, Axis::X);
        assert!(tree.depth() <= KD_MAX_DEPTH);
    }

    #[test]
    fn test_straddling_triangle_is_duplicated() {
        // Eleven tiny triangles on the left, one long one spanning everything.
        let (mut vertices, mut triangles) = strip(11);
        let base = vertices.len() as u32;
        vertices.push(Vec3::new(-1.0, 0.0, 0.0));
        vertices.push(Vec3::new(30.0, 0.0, 0.0));
        vertices.push(Vec3::new(-1.0, 0.5, 0.0));
        let long = Triangle::new([base, base + 1, base + 2]);
        triangles.push(long);

        let bounds = Aabb::enclosing(vertices.iter().copied());
        let tree = KdNode::build(&vertices, triangles, bounds);

        let KdNode::Internal { left, right, .. } = &tree else {
            panic!("12 triangles should split");
        };
        let contains_long = |n: &KdNode| leaves(n).iter().any(|l| l.contains(&long));
        assert!(contains_long(left));
        assert!(contains_long(right));
        assert!(tree.triangle_refs() > 12);
    }

    #[test]
    fn test_every_triangle_reaches_a_leaf_on_its_side() {
        let mut rng = StdRng::seed_from_u64(7);
        let (vertices, triangles) = random_soup(&mut rng, 300);
        let bounds = Aabb::enclosing(vertices.iter().copied());
        let tree = KdNode::build(&vertices, triangles.clone(), bounds);

        // No triangle is lost.
        let all: Vec<&Triangle> = leaves(&tree).into_iter().flatten().collect();
        for tri in &triangles {
            assert!(all.contains(&tri));
        }

        // Leaves stop splitting at the size or depth limit.
        fn check_leaves(node: &KdNode, depth: usize) {
            match node {
                KdNode::Leaf { triangles } => {
                    assert!(triangles.len() <= KD_LEAF_TRIANGLES || depth == KD_MAX_DEPTH);
                }
                KdNode::Internal { left, right, .. } => {
                    check_leaves(left, depth + 1);
                    check_leaves(right, depth + 1);
                }
            }
        }
        check_leaves(&tree, 0);
    }

    #[test]
    fn test_vertex_on_plane_goes_left() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let tri = Triangle::new([0, 1, 2]);

        assert_eq!(classify(&vertices, &tri, Axis::X, 1.0), (true, false));
        assert_eq!(classify(&vertices, &tri, Axis::X, 0.5), (true, true));
        assert_eq!(classify(&vertices, &tri, Axis::X, -0.5), (false, true));
    }

    #[test]
    fn test_best_split_separates_clusters() {
        // Two clusters of triangles far apart along X.
        let (mut vertices, mut triangles) = strip(6);
        let base = vertices.len() as u32;
        for k in 0..6u32 {
            let x = 100.0 + k as f32 * 2.0;
            vertices.push(Vec3::new(x, 0.0, 0.0));
            vertices.push(Vec3::new(x + 1.0, 0.0, 0.0));
            vertices.push(Vec3::new(x, 1.0, 0.0));
            let b = base + 3 * k;
            triangles.push(Triangle::new([b, b + 1, b + 2]));
        }

        let bounds = Aabb::enclosing(vertices.iter().copied());
        let location = best_split(&vertices, &triangles, Axis::X, &bounds).unwrap();
        assert!(location >= 11.0 && location < 100.0);
    }

    #[test]
    fn test_best_split_stays_inside_the_cell() {
        // Every triangle reaches past both sides of the cell, as duplicated
        // straddlers do deeper in the tree.
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for k in 0..12u32 {
            let y = k as f32;
            vertices.push(Vec3::new(-5.0, y, 0.0));
            vertices.push(Vec3::new(5.0, y, 0.0));
            vertices.push(Vec3::new(0.5, y + 0.5, 0.5));
            triangles.push(Triangle::new([3 * k, 3 * k + 1, 3 * k + 2]));
        }

        let cell = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 12.0, 1.0));
        let location = best_split(&vertices, &triangles, Axis::X, &cell).unwrap();
        assert!(cell.x.contains(location));
        assert_eq!(location, 0.5);

        // Nothing inside the cell along Y or Z either way: no split at all.
        let narrow = Aabb::from_points(Vec3::new(0.0, 20.0, 2.0), Vec3::new(1.0, 30.0, 3.0));
        assert_eq!(best_split(&vertices, &triangles, Axis::Z, &narrow), None);
    }
}
