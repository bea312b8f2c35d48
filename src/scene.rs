//! Triangle meshes produced by asset loaders and consumed by the rasterizer
//! and the picking ray cast.

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        ))
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the bounding sphere around [`Aabb::center`].
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

/// Indexed triangle mesh in world space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals, one per position.
    pub normals: Vec<Vec3>,
    /// Triangle list, three indices per face.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Mesh with area-weighted vertex normals computed from the faces.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            normals: Vec::new(),
            positions,
            indices,
        };
        mesh.compute_normals();
        mesh
    }

    /// Mesh with caller-supplied normals. Falls back to computed normals if
    /// the counts do not match.
    #[must_use]
    pub fn with_normals(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Self {
        if normals.len() == positions.len() {
            Self {
                positions,
                normals,
                indices,
            }
        } else {
            Self::new(positions, indices)
        }
    }

    /// Recompute vertex normals from face normals weighted by face area.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for face in self.indices.chunks_exact(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|i| i as usize);
            let (Some(pa), Some(pb), Some(pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            // Cross product length is twice the area
            let n = (*pb - *pa).cross(*pc - *pa);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z))
            .collect();
    }

    /// Number of complete triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of each triangle. Faces with out-of-range indices
    /// are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|face| {
            Some([
                *self.positions.get(face[0] as usize)?,
                *self.positions.get(face[1] as usize)?,
                *self.positions.get(face[2] as usize)?,
            ])
        })
    }

    /// Bounds of the vertex positions.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

/// A loaded piece of scene: zero or more meshes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneFragment {
    /// Meshes in load order.
    pub meshes: Vec<Mesh>,
}

impl SceneFragment {
    /// Empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh.
    pub fn push(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// Move all meshes of `other` into this fragment.
    pub fn extend(&mut self, other: Self) {
        self.meshes.extend(other.meshes);
    }

    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.triangle_count() == 0)
    }

    /// Total triangles across all meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Bounds of every mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .filter_map(Mesh::bounds)
            .reduce(Aabb::union)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad(z: f32) -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn quad_normals_face_plus_z() {
        let quad = unit_quad(0.0);
        assert_eq!(quad.normals.len(), 4);
        for n in &quad.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
        assert_eq!(quad.triangle_count(), 2);
    }

    #[test]
    fn mismatched_normals_are_recomputed() {
        let quad = unit_quad(0.0);
        let mesh = Mesh::with_normals(
            quad.positions.clone(),
            vec![Vec3::X],
            quad.indices.clone(),
        );
        assert_eq!(mesh.normals, quad.normals);
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 7]);
        assert_eq!(mesh.triangles().count(), 0);
        assert_eq!(mesh.normals.len(), 3);
    }

    #[test]
    fn fragment_bounds_cover_all_meshes() {
        let mut fragment = SceneFragment::new();
        assert!(fragment.bounds().is_none());
        assert!(fragment.is_empty());

        fragment.push(unit_quad(0.0));
        let mut other = SceneFragment::new();
        other.push(unit_quad(5.0));
        fragment.extend(other);

        let bounds = fragment.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 5.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.0, 2.5));
        assert_eq!(fragment.triangle_count(), 4);
        assert!(!fragment.is_empty());
    }
}
