// Copyright @yucwang 2026

use crate::core::bsdf::BSDFQueryRecord;
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::surface_emission;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Direct illumination by BSDF sampling only: one scattered ray, counting
/// whatever emission it finds.
#[derive(Debug, Default)]
pub struct DirectMatsIntegrator;

impl DirectMatsIntegrator {
    pub fn new() -> Self {
        Self
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Self::new())
    }
}

impl ComputationNode for DirectMatsIntegrator {
    fn to_string(&self) -> String {
        String::from("DirectMatsIntegrator[]")
    }
}

impl Integrator for DirectMatsIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return scene.background(ray),
        };

        let mut li = surface_emission(scene, ray, &its)
            .map_or(RGBSpectrum::zero(), |emission| emission.radiance);

        let mut rec = BSDFQueryRecord::new(its.to_local(&-ray.dir())).with_uv(its.uv);
        let weight = scene.surface_bsdf(&its).sample(&mut rec, &sampler.next_2d());
        if weight.is_black() {
            return li;
        }

        let scattered = Ray3f::new(its.p, its.to_world(&rec.wo), None, None);
        li += match scene.ray_intersect(&scattered) {
            Some(next) => surface_emission(scene, &scattered, &next)
                .map_or(RGBSpectrum::zero(), |emission| weight * emission.radiance),
            None => weight * scene.background(&scattered),
        };
        li
    }
}
