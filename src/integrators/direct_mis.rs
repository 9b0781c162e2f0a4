// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::{background_emission, balance_heuristic, sample_direct, surface_emission};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Direct illumination combining one emitter sample and one BSDF sample
/// with the balance heuristic.
#[derive(Debug, Default)]
pub struct DirectMisIntegrator;

impl DirectMisIntegrator {
    pub fn new() -> Self {
        Self
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Self::new())
    }
}

impl ComputationNode for DirectMisIntegrator {
    fn to_string(&self) -> String {
        String::from("DirectMisIntegrator[]")
    }
}

impl Integrator for DirectMisIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return scene.background(ray),
        };

        let mut li = surface_emission(scene, ray, &its)
            .map_or(RGBSpectrum::zero(), |emission| emission.radiance);

        let bsdf = scene.surface_bsdf(&its);
        let wi = its.to_local(&-ray.dir());
        let light_sampling = bsdf.is_diffuse();

        if light_sampling {
            if let Some(direct) = sample_direct(scene, sampler, &its, &wi) {
                li += direct.radiance * balance_heuristic(direct.pdf_emitter, direct.pdf_bsdf);
            }
        }

        let mut rec = BSDFQueryRecord::new(wi).with_uv(its.uv);
        let weight = bsdf.sample(&mut rec, &sampler.next_2d());
        if weight.is_black() {
            return li;
        }
        // Directions light sampling cannot produce keep their full weight.
        let pdf_bsdf = if light_sampling && rec.measure == EMeasure::SolidAngle {
            bsdf.pdf(&rec)
        } else {
            0.0
        };

        let scattered = Ray3f::new(its.p, its.to_world(&rec.wo), None, None);
        let emission = match scene.ray_intersect(&scattered) {
            Some(next) => surface_emission(scene, &scattered, &next),
            None => Some(background_emission(scene, &scattered)),
        };
        if let Some(emission) = emission {
            let mis = if pdf_bsdf > 0.0 {
                balance_heuristic(pdf_bsdf, emission.pdf_emitter)
            } else {
                1.0
            };
            li += weight * emission.radiance * mis;
        }
        li
    }
}
