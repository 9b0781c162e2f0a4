// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, SceneNode};
use crate::core::error::Result;
use crate::core::phase::PhaseFunction;
use crate::core::registry::Registry;
use crate::core::sampler::Sampler;
use crate::math::constants::{Float, PDF_EPSILON, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Local medium properties at `p`, plus the outcome of a distance
/// sampling step. `sigma_t == sigma_a + sigma_s` holds for every record a
/// medium fills in.
pub struct MediumQueryRecord<'a> {
    pub p: Vector3f,
    pub t: Float,
    pub sigma_a: RGBSpectrum,
    pub sigma_s: RGBSpectrum,
    pub sigma_t: RGBSpectrum,
    pub le: RGBSpectrum,
    pub phase_function: Option<&'a dyn PhaseFunction>,
    pub pdf: Float,
    pub transmittance: RGBSpectrum,
}

impl<'a> MediumQueryRecord<'a> {
    pub fn new(p: Vector3f) -> Self {
        Self {
            p,
            t: 0.0,
            sigma_a: RGBSpectrum::zero(),
            sigma_s: RGBSpectrum::zero(),
            sigma_t: RGBSpectrum::zero(),
            le: RGBSpectrum::zero(),
            phase_function: None,
            pdf: 0.0,
            transmittance: RGBSpectrum::one(),
        }
    }

    /// Monte Carlo weight of the last distance sample.
    pub fn weight(&self) -> RGBSpectrum {
        if self.pdf <= PDF_EPSILON {
            return RGBSpectrum::zero();
        }
        self.transmittance / self.pdf
    }
}

pub trait Medium: ComputationNode + Send + Sync {
    /// Fills the coefficients, emission and phase function at `rec.p`.
    fn sample<'a>(&'a self, rec: &mut MediumQueryRecord<'a>, sampler: &mut dyn Sampler);

    /// Samples the next interaction along `ray` within `[0, ray.max_t]`.
    /// Returns true with `rec` describing a real interaction, or false
    /// when the ray leaves the segment, in which case `rec.weight()` is the
    /// pass-through weight.
    fn sample_distance<'a>(&'a self, ray: &Ray3f, rec: &mut MediumQueryRecord<'a>,
                           sampler: &mut dyn Sampler) -> bool;

    /// Transmittance between `ray.origin()` and `ray.at(ray.max_t)`.
    fn eval_transmittance(&self, ray: &Ray3f, sampler: &mut dyn Sampler) -> RGBSpectrum;

    fn phase_function(&self) -> Option<&dyn PhaseFunction>;

    fn add_child(&mut self, child: SceneNode) -> Result<()>;

    /// Instantiates defaults for children the scene did not provide.
    fn activate(&mut self, registry: &Registry) -> Result<()>;
}
