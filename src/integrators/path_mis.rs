// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::lighting::{background_emission, balance_heuristic, sample_direct, surface_emission};
use crate::integrators::PathSettings;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Path tracer combining emitter and BSDF sampling at every vertex with
/// the balance heuristic.
#[derive(Debug, Default)]
pub struct PathMisIntegrator {
    settings: PathSettings,
}

impl PathMisIntegrator {
    pub fn new(settings: PathSettings) -> Self {
        Self { settings }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(PathSettings::from_properties(props)?))
    }
}

impl ComputationNode for PathMisIntegrator {
    fn to_string(&self) -> String {
        format!("PathMisIntegrator[{}]", self.settings.describe())
    }
}

/// MIS weight of emission found by a BSDF sample with density `pdf_bsdf`.
fn hit_weight(pdf_bsdf: Float, pdf_emitter: Float) -> Float {
    if pdf_bsdf > 0.0 {
        balance_heuristic(pdf_bsdf, pdf_emitter)
    } else {
        1.0
    }
}

impl Integrator for PathMisIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut li = RGBSpectrum::zero();
        let mut throughput = RGBSpectrum::one();
        let mut ray = *ray;
        let mut bounces = 0usize;
        // Density of the BSDF sample that produced `ray`, zero when light
        // sampling could not have produced it.
        let mut pdf_bsdf = 0.0;

        loop {
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => {
                    let emission = background_emission(scene, &ray);
                    li += throughput * emission.radiance * hit_weight(pdf_bsdf, emission.pdf_emitter);
                    break;
                }
            };

            if let Some(emission) = surface_emission(scene, &ray, &its) {
                li += throughput * emission.radiance * hit_weight(pdf_bsdf, emission.pdf_emitter);
                break;
            }
            if self.settings.depth_reached(bounces) {
                break;
            }

            let bsdf = scene.surface_bsdf(&its);
            let wi = its.to_local(&-ray.dir());
            if bsdf.is_diffuse() {
                if let Some(direct) = sample_direct(scene, sampler, &its, &wi) {
                    let mis = balance_heuristic(direct.pdf_emitter, direct.pdf_bsdf);
                    li += throughput * direct.radiance * mis;
                }
            }

            let mut rec = BSDFQueryRecord::new(wi).with_uv(its.uv);
            let weight = bsdf.sample(&mut rec, &sampler.next_2d());
            if weight.is_black() || !weight.is_valid() {
                break;
            }
            pdf_bsdf = if bsdf.is_diffuse() && rec.measure == EMeasure::SolidAngle {
                bsdf.pdf(&rec)
            } else {
                0.0
            };
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
