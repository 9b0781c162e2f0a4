// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::{RenderError, Result};
use crate::core::scene::{MeshId, Scene};
use crate::math::constants::{EPSILON, FLOAT_MAX, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Connection between a reference point and a point on an emitter.
/// `wi` points from the reference towards the emitter and `pdf` is always
/// a solid-angle density at the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterQueryRecord {
    pub reference: Vector3f,
    pub p: Vector3f,
    pub n: Vector3f,
    pub wi: Vector3f,
    pub dist: Float,
    pub uv: Vector2f,
    pub pdf: Float,
}

impl EmitterQueryRecord {
    pub fn new(reference: Vector3f) -> Self {
        Self {
            reference,
            p: Vector3f::zeros(),
            n: Vector3f::zeros(),
            wi: Vector3f::zeros(),
            dist: 0.0,
            uv: Vector2f::zeros(),
            pdf: 0.0,
        }
    }

    /// Record for a surface point found by tracing a ray from `reference`.
    pub fn from_hit(reference: Vector3f, p: Vector3f, n: Vector3f, uv: Vector2f) -> Self {
        let d = p - reference;
        let dist = d.norm();
        let wi = if dist > 0.0 { d / dist } else { Vector3f::zeros() };
        Self { reference, p, n, wi, dist, uv, pdf: 0.0 }
    }

    /// Record for a direction that leaves the scene.
    pub fn from_direction(reference: Vector3f, wi: Vector3f) -> Self {
        Self {
            reference,
            p: reference,
            n: -wi,
            wi,
            dist: Float::INFINITY,
            uv: Vector2f::zeros(),
            pdf: 0.0,
        }
    }

    /// Visibility segment from the reference towards the sampled point,
    /// clipped to [EPSILON, dist - EPSILON).
    pub fn shadow_ray(&self) -> Ray3f {
        let max_t = if self.dist.is_finite() {
            (self.dist - EPSILON).max(EPSILON)
        } else {
            FLOAT_MAX
        };
        Ray3f::new(self.reference, self.wi, Some(EPSILON), Some(max_t))
    }
}

pub trait Emitter: ComputationNode + Send + Sync {
    /// Samples a point on the emitter as seen from `rec.reference`, fills
    /// the record and returns the emitted radiance there (not divided by
    /// the pdf). Zero when nothing useful was sampled.
    fn sample(&self, scene: &Scene, rec: &mut EmitterQueryRecord, sample: &Vector2f, extra: Float) -> RGBSpectrum;

    /// Radiance leaving `rec.p` towards `rec.reference`.
    fn eval(&self, rec: &EmitterQueryRecord) -> RGBSpectrum;

    /// Solid-angle density with which `sample` would produce `rec`.
    fn pdf(&self, scene: &Scene, rec: &EmitterQueryRecord) -> Float;

    fn set_parent(&mut self, _mesh: MeshId) -> Result<()> {
        Err(RenderError::Configuration(format!(
            "{} cannot be attached to a mesh", self.to_string())))
    }

    fn parent(&self) -> Option<MeshId> {
        None
    }

    /// Infinitely distant emitters also provide the scene background.
    fn is_environment(&self) -> bool {
        false
    }

    /// Called once the scene is assembled; rejects incomplete emitters.
    fn activate(&self) -> Result<()> {
        Ok(())
    }
}
