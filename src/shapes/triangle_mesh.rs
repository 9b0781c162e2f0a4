// Copyright @yucwang 2023

use super::triangle::Triangle;

use crate::core::error::{RenderError, Result};
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::distribution::DiscretePDF;
use crate::math::ray::Ray3f;
use crate::math::warp::square_to_uniform_triangle;

/// Geometry at a point on the mesh surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfacePoint {
    pub p: Vector3f,
    /// Interpolated vertex normal, or the face normal when none are authored.
    pub sh_normal: Vector3f,
    pub geo_normal: Vector3f,
    pub uv: Vector2f,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionSample {
    pub p: Vector3f,
    pub n: Vector3f,
    pub uv: Vector2f,
}

/// Indexed triangle mesh. Per-face areas are gathered into a discrete
/// distribution by `activate`, which makes area-proportional sampling
/// possible.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    positions: Vec<Vector3f>,
    normals: Vec<Vector3f>,
    uvs: Vec<Vector2f>,
    faces: Vec<[usize; 3]>,
    distribution: DiscretePDF,
    bbox: AABB,
}

impl Mesh {
    pub fn new(name: &str, positions: Vec<Vector3f>, faces: Vec<[usize; 3]>) -> Self {
        let mut bbox = AABB::default();
        for p in &positions {
            bbox.expand_by_point(p);
        }

        Self {
            name: name.to_string(),
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            faces,
            distribution: DiscretePDF::default(),
            bbox,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3f>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vector2f>) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vector3f] {
        &self.positions
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn triangle(&self, face: usize) -> Triangle {
        let [i0, i1, i2] = self.faces[face];
        Triangle::new(self.positions[i0], self.positions[i1], self.positions[i2])
    }

    pub fn surface_area(&self, face: usize) -> Float {
        self.triangle(face).surface_area()
    }

    pub fn total_area(&self) -> Float {
        (0..self.faces.len()).map(|face| self.surface_area(face)).sum()
    }

    pub fn bounding_box(&self) -> AABB {
        self.bbox
    }

    pub fn face_bounding_box(&self, face: usize) -> AABB {
        self.triangle(face).bounding_box()
    }

    pub fn centroid(&self, face: usize) -> Vector3f {
        self.triangle(face).centroid()
    }

    pub fn ray_intersect(&self, face: usize, ray: &Ray3f) -> Option<(Float, Float, Float)> {
        self.triangle(face).ray_intersect(ray)
    }

    /// Validates indices and builds the area distribution.
    pub fn activate(&mut self) -> Result<()> {
        let vertex_count = self.positions.len();
        if let Some(face) = self.faces.iter().find(|f| f.iter().any(|&i| i >= vertex_count)) {
            return Err(RenderError::Configuration(format!(
                "Mesh \"{}\": face {:?} references a missing vertex", self.name, face)));
        }
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(RenderError::Configuration(format!(
                "Mesh \"{}\": {} normals for {} vertices", self.name, self.normals.len(), vertex_count)));
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count {
            return Err(RenderError::Configuration(format!(
                "Mesh \"{}\": {} texture coordinates for {} vertices", self.name, self.uvs.len(), vertex_count)));
        }

        self.distribution = DiscretePDF::new(self.faces.len());
        for face in 0..self.faces.len() {
            let area = self.surface_area(face);
            self.distribution.append(area);
        }
        let total = self.distribution.normalize();
        log::debug!("Mesh \"{}\": {} faces, area {}", self.name, self.faces.len(), total);

        Ok(())
    }

    /// Position, normals and uv at barycentric coordinates (u, v).
    pub fn surface_point(&self, face: usize, u: Float, v: Float) -> SurfacePoint {
        let [i0, i1, i2] = self.faces[face];
        let w = 1.0 - u - v;
        let triangle = self.triangle(face);
        let geo_normal = triangle.geometric_normal();

        let sh_normal = if self.normals.is_empty() {
            geo_normal
        } else {
            (w * self.normals[i0] + u * self.normals[i1] + v * self.normals[i2]).normalize()
        };

        let uv = if self.uvs.is_empty() {
            Vector2f::new(u, v)
        } else {
            w * self.uvs[i0] + u * self.uvs[i1] + v * self.uvs[i2]
        };

        SurfacePoint { p: triangle.interpolate(u, v), sh_normal, geo_normal, uv }
    }

    /// Uniformly samples a point with respect to surface area. The first
    /// coordinate picks the face and is then rescaled for reuse inside it.
    pub fn sample_position(&self, sample: &Vector2f) -> PositionSample {
        if self.distribution.is_empty() || !self.distribution.is_normalized() {
            return PositionSample { p: Vector3f::zeros(), n: Vector3f::zeros(), uv: Vector2f::zeros() };
        }

        let (face, reused) = self.distribution.sample_reuse(sample.x);
        let bary = square_to_uniform_triangle(&Vector2f::new(reused, sample.y));
        let point = self.surface_point(face, bary.x, bary.y);

        PositionSample { p: point.p, n: point.sh_normal, uv: point.uv }
    }

    /// Area density of `sample_position`, constant over the surface.
    pub fn pdf(&self, _p: &Vector3f) -> Float {
        self.distribution.normalization()
    }
}
