// Copyright @yucwang 2026

use crate::core::bsdf::BSDFQueryRecord;
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::surface_emission;
use crate::integrators::PathSettings;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Unidirectional path tracer that only samples the BSDF. Emission is
/// found by hitting emitters.
#[derive(Debug, Default)]
pub struct PathIntegrator {
    settings: PathSettings,
}

impl PathIntegrator {
    pub fn new(settings: PathSettings) -> Self {
        Self { settings }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(PathSettings::from_properties(props)?))
    }
}

impl ComputationNode for PathIntegrator {
    fn to_string(&self) -> String {
        format!("PathIntegrator[{}]", self.settings.describe())
    }
}

impl Integrator for PathIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut li = RGBSpectrum::zero();
        let mut throughput = RGBSpectrum::one();
        let mut ray = *ray;
        let mut bounces = 0usize;

        loop {
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => {
                    li += throughput * scene.background(&ray);
                    break;
                }
            };

            if let Some(emission) = surface_emission(scene, &ray, &its) {
                li += throughput * emission.radiance;
                break;
            }
            if self.settings.depth_reached(bounces) {
                break;
            }

            let mut rec = BSDFQueryRecord::new(its.to_local(&-ray.dir())).with_uv(its.uv);
            let weight = scene.surface_bsdf(&its).sample(&mut rec, &sampler.next_2d());
            if weight.is_black() || !weight.is_valid() {
                break;
            }
            throughput *= weight;
            bounces += 1;
            ray = Ray3f::new(its.p, its.to_world(&rec.wo), None, None);

            if !self.settings.survives(bounces, sampler, &mut throughput) {
                break;
            }
        }

        li
    }
}
