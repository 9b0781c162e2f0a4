// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;

/// Measure a direction density is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EMeasure {
    Unknown,
    SolidAngle,
    Discrete,
}

/// Directions are in the local shading frame. `wi` points back along the
/// arriving path (towards the camera side), `wo` is the scattered
/// direction the next segment follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFQueryRecord {
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub uv: Vector2f,
    /// Relative index of refraction of the sampled event.
    pub eta: Float,
    pub measure: EMeasure,
}

impl BSDFQueryRecord {
    /// Record for sampling: only the incident direction is known.
    pub fn new(wi: Vector3f) -> Self {
        Self {
            wi,
            wo: Vector3f::zeros(),
            uv: Vector2f::zeros(),
            eta: 1.0,
            measure: EMeasure::Unknown,
        }
    }

    /// Record for evaluating a fixed pair of directions.
    pub fn with_directions(wi: Vector3f, wo: Vector3f, measure: EMeasure) -> Self {
        Self {
            wi,
            wo,
            uv: Vector2f::zeros(),
            eta: 1.0,
            measure,
        }
    }

    pub fn with_uv(mut self, uv: Vector2f) -> Self {
        self.uv = uv;
        self
    }
}

pub trait BSDF: ComputationNode + Send + Sync {
    /// Samples `rec.wo` and returns `eval * |cos(wo)| / pdf`, or zero when
    /// sampling fails.
    fn sample(&self, rec: &mut BSDFQueryRecord, sample: &Vector2f) -> RGBSpectrum;

    /// Zero unless `rec.measure` is `SolidAngle`.
    fn eval(&self, rec: &BSDFQueryRecord) -> RGBSpectrum;

    /// Solid-angle density of `sample` producing `rec.wo`. Zero unless
    /// `rec.measure` is `SolidAngle`.
    fn pdf(&self, rec: &BSDFQueryRecord) -> Float;

    /// Whether the BSDF has a usable density, i.e. light sampling helps.
    fn is_diffuse(&self) -> bool {
        false
    }
}
