// Copyright @yucwang 2023

use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;

/// Determinants below this mark a degenerate or edge-on triangle.
const DET_EPSILON: Float = 1e-8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub p0: Vector3f,
    pub p1: Vector3f,
    pub p2: Vector3f
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        Triangle { p0, p1, p2 }
    }

    /// Moller-Trumbore. Returns the barycentric coordinates (u, v) of the
    /// hit with respect to p1 and p2, and the ray parameter t.
    pub fn ray_intersect(&self, ray: &Ray3f) -> Option<(Float, Float, Float)> {
        let edge1 = self.p1 - self.p0;
        let edge2 = self.p2 - self.p0;

        let pvec = ray.dir().cross(&edge2);
        let det = edge1.dot(&pvec);
        if det.abs() < DET_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin() - self.p0;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&edge1);
        let v = ray.dir().dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        if ray.test_segment(t) {
            Some((u, v, t))
        } else {
            None
        }
    }

    pub fn surface_area(&self) -> Float {
        0.5 * (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm()
    }

    /// Unnormalized face normal; its length is twice the area.
    pub fn area_normal(&self) -> Vector3f {
        (self.p1 - self.p0).cross(&(self.p2 - self.p0))
    }

    pub fn geometric_normal(&self) -> Vector3f {
        self.area_normal().normalize()
    }

    pub fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.p0, self.p1);
        bound.expand_by_point(&self.p2);

        bound
    }

    pub fn centroid(&self) -> Vector3f {
        (self.p0 + self.p1 + self.p2) / 3.0
    }

    pub fn interpolate(&self, u: Float, v: Float) -> Vector3f {
        (1.0 - u - v) * self.p0 + u * self.p1 + v * self.p2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted_triangle() -> Triangle {
        Triangle::new(Vector3f::new(1.0, 1.0, 1.0),
                      Vector3f::new(1.5, 4.0, -1.0),
                      Vector3f::new(-1.0, 2.0, 2.5))
    }

    #[test]
    fn test_bounding_box() {
        let bounding_box = tilted_triangle().bounding_box();

        assert_eq!(bounding_box.p_min, Vector3f::new(-1.0, 1.0, -1.0));
        assert_eq!(bounding_box.p_max, Vector3f::new(1.5, 4.0, 2.5));
    }

    #[test]
    fn test_centroid_hit_along_normal() {
        let triangle = tilted_triangle();
        let n = triangle.geometric_normal();
        let c = triangle.centroid();
        let ray = Ray3f::new(c + 2.0 * n, -n, None, None);

        let (u, v, t) = triangle.ray_intersect(&ray).expect("centroid must be hit");
        let w = 1.0 - u - v;
        assert!((u - 1.0 / 3.0).abs() < 1e-4);
        assert!((v - 1.0 / 3.0).abs() < 1e-4);
        assert!((w - 1.0 / 3.0).abs() < 1e-4);
        assert!((t - 2.0).abs() < 1e-4);
        assert!((triangle.interpolate(u, v) - c).norm() < 1e-4);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let triangle = Triangle::new(Vector3f::new(0.0, 0.0, 0.0),
                                     Vector3f::new(1.0, 0.0, 0.0),
                                     Vector3f::new(0.0, 1.0, 0.0));
        let ray = Ray3f::new(Vector3f::new(-1.0, 0.2, 0.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(triangle.ray_intersect(&ray).is_none());
    }

    #[test]
    fn test_interval_and_outside_misses() {
        let triangle = Triangle::new(Vector3f::new(1.0, 1.0, 0.0),
                                     Vector3f::new(2.0, 2.0, 0.0),
                                     Vector3f::new(2.0, 1.0, 0.0));

        let down = Ray3f::new(Vector3f::new(1.5, 1.1, 3.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let up = Ray3f::new(Vector3f::new(1.5, 1.1, 3.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let short = Ray3f::new(Vector3f::new(1.5, 1.1, 3.0), Vector3f::new(0.0, 0.0, -1.0), None, Some(2.0));
        let outside = Ray3f::new(Vector3f::new(1.5, 2.0, 3.0), Vector3f::new(0.0, 0.0, -1.0), None, None);

        assert!(triangle.ray_intersect(&down).is_some());
        assert!(triangle.ray_intersect(&up).is_none());
        assert!(triangle.ray_intersect(&short).is_none());
        assert!(triangle.ray_intersect(&outside).is_none());
        assert!((triangle.surface_area() - 0.5).abs() < 1e-6);
    }
}
