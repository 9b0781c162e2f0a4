// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::{sample_direct, surface_emission};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Direct illumination by emitter sampling only. Specular surfaces show
/// nothing but their own emission.
#[derive(Debug, Default)]
pub struct DirectEmsIntegrator;

impl DirectEmsIntegrator {
    pub fn new() -> Self {
        Self
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Self::new())
    }
}

impl ComputationNode for DirectEmsIntegrator {
    fn to_string(&self) -> String {
        String::from("DirectEmsIntegrator[]")
    }
}

impl Integrator for DirectEmsIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return scene.background(ray),
        };

        let mut li = surface_emission(scene, ray, &its)
            .map_or(RGBSpectrum::zero(), |emission| emission.radiance);

        if scene.surface_bsdf(&its).is_diffuse() {
            let wi = its.to_local(&-ray.dir());
            if let Some(direct) = sample_direct(scene, sampler, &its, &wi) {
                li += direct.radiance;
            }
        }
        li
    }
}
