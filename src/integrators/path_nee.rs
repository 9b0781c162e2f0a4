// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::{background_emission, sample_direct, surface_emission};
use crate::integrators::PathSettings;
use crate::math::constants::{Float, PDF_EPSILON};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Path tracer with next event estimation. Light samples and BSDF hits
/// that could both have produced a path share it half and half.
#[derive(Debug, Default)]
pub struct PathNeeIntegrator {
    settings: PathSettings,
}

impl PathNeeIntegrator {
    pub fn new(settings: PathSettings) -> Self {
        Self { settings }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(PathSettings::from_properties(props)?))
    }
}

impl ComputationNode for PathNeeIntegrator {
    fn to_string(&self) -> String {
        format!("PathNeeIntegrator[{}]", self.settings.describe())
    }
}

/// Weight of a strategy when the other one might produce the same path.
fn shared_weight(other_pdf: Float) -> Float {
    if other_pdf > PDF_EPSILON { 0.5 } else { 1.0 }
}

impl Integrator for PathNeeIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut li = RGBSpectrum::zero();
        let mut throughput = RGBSpectrum::one();
        let mut ray = *ray;
        let mut bounces = 0usize;
        // The camera ray and specular bounces are never light sampled.
        let mut light_sampled = false;

        loop {
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => {
                    let emission = background_emission(scene, &ray);
                    let weight = if light_sampled { shared_weight(emission.pdf_emitter) } else { 1.0 };
                    li += throughput * emission.radiance * weight;
                    break;
                }
            };

            if let Some(emission) = surface_emission(scene, &ray, &its) {
                let weight = if light_sampled { shared_weight(emission.pdf_emitter) } else { 1.0 };
                li += throughput * emission.radiance * weight;
                break;
            }
            if self.settings.depth_reached(bounces) {
                break;
            }

            let bsdf = scene.surface_bsdf(&its);
            let wi = its.to_local(&-ray.dir());
            if bsdf.is_diffuse() {
                if let Some(direct) = sample_direct(scene, sampler, &its, &wi) {
                    li += throughput * direct.radiance * shared_weight(direct.pdf_bsdf);
                }
            }

            let mut rec = BSDFQueryRecord::new(wi).with_uv(its.uv);
            let weight = bsdf.sample(&mut rec, &sampler.next_2d());
            if weight.is_black() || !weight.is_valid() {
                break;
            }
            light_sampled = bsdf.is_diffuse() && rec.measure == EMeasure::SolidAngle;
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
