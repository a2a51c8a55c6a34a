//! Triangle mesh geometry for kdray.
//!
//! A mesh owns its vertex, normal and texture-coordinate arrays plus a list
//! of triangles that index into them. The kd-tree over the triangles is built
//! once when the mesh is constructed and never changes afterwards.

use std::path::Path;

use kdray_math::{Aabb, Vec3};
use thiserror::Error;

use crate::kdtree::KdNode;

/// Errors raised while building or importing a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("mesh '{0}' has no triangles")]
    Empty(String),

    #[error("triangle {triangle} references {kind} {index}, but only {len} exist")]
    IndexOutOfRange {
        triangle: usize,
        kind: &'static str,
        index: u32,
        len: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// One triangle of a mesh.
///
/// Each corner carries an index into the mesh's vertex array, and optionally
/// into its normal and texture-coordinate arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub normals: Option<[u32; 3]>,
    pub texcoords: Option<[u32; 3]>,
}

impl Triangle {
    /// A triangle with positions only.
    pub fn new(vertices: [u32; 3]) -> Self {
        Self {
            vertices,
            normals: None,
            texcoords: None,
        }
    }

    pub fn with_normals(mut self, normals: [u32; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_texcoords(mut self, texcoords: [u32; 3]) -> Self {
        self.texcoords = Some(texcoords);
        self
    }
}

/// An indexed triangle mesh with its kd-tree.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name used in log output and errors
    pub name: String,

    /// Vertex positions in object space
    vertices: Vec<Vec3>,

    /// Shading normals (may be empty)
    normals: Vec<Vec3>,

    /// Texture coordinates, one [u, v] per entry (may be empty)
    texcoords: Vec<[f32; 2]>,

    /// Every triangle of the mesh, in file order
    triangles: Vec<Triangle>,

    /// Object-space box around the vertices
    bounds: Aabb,

    /// Spatial index over `triangles`
    kd_tree: KdNode,
}

impl Mesh {
    /// Build a mesh and its kd-tree.
    ///
    /// Every index is checked against the array it refers to, so the
    /// intersector can index without bounds failures later.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<[f32; 2]>,
        triangles: Vec<Triangle>,
    ) -> MeshResult<Self> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(MeshError::Empty(name));
        }

        for (i, tri) in triangles.iter().enumerate() {
            check_indices(i, "vertex", &tri.vertices, vertices.len())?;
            if let Some(n) = &tri.normals {
                check_indices(i, "normal", n, normals.len())?;
            }
            if let Some(uv) = &tri.texcoords {
                check_indices(i, "texcoord", uv, texcoords.len())?;
            }
        }

        let bounds = Aabb::enclosing(vertices.iter().copied());
        let kd_tree = KdNode::build(&vertices, triangles.clone(), bounds);

        log::debug!(
            "Mesh '{}': {} triangles, kd-tree depth {}, {} leaves, {} triangle references",
            name,
            triangles.len(),
            kd_tree.depth(),
            kd_tree.leaf_count(),
            kd_tree.triangle_refs()
        );

        Ok(Self {
            name,
            vertices,
            normals,
            texcoords,
            triangles,
            bounds,
            kd_tree,
        })
    }

    /// Object-space bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Root of the kd-tree.
    pub fn kd_tree(&self) -> &KdNode {
        &self.kd_tree
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Check if the mesh has texture coordinates.
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Corner positions of `tri`.
    #[inline]
    pub fn positions(&self, tri: &Triangle) -> [Vec3; 3] {
        tri.vertices.map(|i| self.vertices[i as usize])
    }

    /// Interpolated shading normal at barycentric `(u, v)`.
    ///
    /// `None` when the triangle carries no normal indices; callers then fall
    /// back to the geometric normal.
    pub fn shading_normal(&self, tri: &Triangle, u: f32, v: f32) -> Option<Vec3> {
        let [n0, n1, n2] = tri.normals?.map(|i| self.normals[i as usize]);
        let n = n0 * (1.0 - u - v) + n1 * u + n2 * v;
        Some(n.normalize_or_zero()).filter(|n| *n != Vec3::ZERO)
    }
}

fn check_indices(triangle: usize, kind: &'static str, indices: &[u32; 3], len: usize) -> MeshResult<()> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            triangle,
            kind,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Load a Wavefront OBJ file into a single mesh.
///
/// Polygons are triangulated and all objects in the file are merged. Normal
/// and texture indices are kept separate from vertex indices, so seams in
/// the source file survive.
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options)?;

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut triangles = Vec::new();

    for model in &models {
        let m = &model.mesh;
        let vertex_base = vertices.len() as u32;
        let normal_base = normals.len() as u32;
        let texcoord_base = texcoords.len() as u32;

        vertices.extend(m.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        normals.extend(m.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        texcoords.extend(m.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));

        let has_normals = m.normal_indices.len() == m.indices.len();
        let has_texcoords = m.texcoord_indices.len() == m.indices.len();

        for (face, idx) in m.indices.chunks_exact(3).enumerate() {
            let mut tri = Triangle::new([idx[0], idx[1], idx[2]].map(|i| i + vertex_base));
            if has_normals {
                let n = &m.normal_indices[face * 3..face * 3 + 3];
                tri = tri.with_normals([n[0], n[1], n[2]].map(|i| i + normal_base));
            }
            if has_texcoords {
                let t = &m.texcoord_indices[face * 3..face * 3 + 3];
                tri = tri.with_texcoords([t[0], t[1], t[2]].map(|i| i + texcoord_base));
            }
            triangles.push(tri);
        }
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());

    log::info!(
        "Loaded '{}': {} objects, {} vertices, {} triangles",
        path.display(),
        models.len(),
        vertices.len(),
        triangles.len()
    );

    Mesh::new(name, vertices, normals, texcoords, triangles)
}
