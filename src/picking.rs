//! CPU ray casting against scene meshes.
//!
//! Used by double-click zoom-to-point; the scene is small enough that a
//! per-mesh bounds test followed by a linear triangle scan is sufficient.

use glam::Vec3;

use crate::scene::{Aabb, SceneFragment};

/// Determinant below which a ray is treated as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalized here).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Entry distance into `aabb` (slab test), or `None` if missed.
    #[must_use]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let inv = self.direction.recip();
        let t0 = (aabb.min - self.origin) * inv;
        let t1 = (aabb.max - self.origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();
        (far >= near.max(0.0)).then_some(near.max(0.0))
    }

    /// Distance to a triangle (either winding), Möller–Trumbore.
    #[must_use]
    pub fn intersect_triangle(&self, [a, b, c]: [Vec3; 3]) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t > 0.0).then_some(t)
    }
}

/// Nearest ray / scene intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance along the ray.
    pub distance: f32,
    /// Index of the mesh in the fragment.
    pub mesh: usize,
    /// Index of the triangle within the mesh.
    pub triangle: usize,
}

/// Closest triangle hit along `ray`, if any.
#[must_use]
pub fn raycast(scene: &SceneFragment, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for (mesh_index, mesh) in scene.meshes.iter().enumerate() {
        let Some(bounds) = mesh.bounds() else {
            continue;
        };
        match ray.intersect_aabb(&bounds) {
            Some(entry) if best.map_or(true, |hit| entry <= hit.distance) => {}
            _ => continue,
        }
        for (triangle, corners) in mesh.triangles().enumerate() {
            let Some(t) = ray.intersect_triangle(corners) else {
                continue;
            };
            if best.map_or(true, |hit| t < hit.distance) {
                best = Some(Hit {
                    point: ray.at(t),
                    distance: t,
                    mesh: mesh_index,
                    triangle,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Mesh;

    fn quad(z: f32) -> Mesh {
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
    fn nearest_hit_wins() {
        let mut scene = SceneFragment::new();
        scene.push(quad(-5.0));
        scene.push(quad(2.0));
        let ray = Ray::new(Vec3::new(0.2, 0.3, 10.0), Vec3::NEG_Z);

        let hit = raycast(&scene, &ray).unwrap();
        assert_eq!(hit.mesh, 1);
        assert!((hit.distance - 8.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.2, 0.3, 2.0)).length() < 1e-5);
    }

    #[test]
    fn back_faces_are_hit() {
        let mut scene = SceneFragment::new();
        scene.push(quad(0.0));
        let ray = Ray::new(Vec3::new(0.5, -0.5, -3.0), Vec3::Z);
        let hit = raycast(&scene, &ray).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn misses_and_hits_behind_origin() {
        let mut scene = SceneFragment::new();
        scene.push(quad(0.0));
        // outside the quad
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(raycast(&scene, &ray).is_none());
        // quad is behind the ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(raycast(&scene, &ray).is_none());
        // parallel to the quad
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(raycast(&scene, &ray).is_none());
    }

    #[test]
    fn aabb_slab_test() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(ray.intersect_aabb(&aabb), Some(4.0));
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(inside.intersect_aabb(&aabb), Some(0.0));
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(away.intersect_aabb(&aabb), None);
    }
}
