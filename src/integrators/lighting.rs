// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure};
use crate::core::emitter::EmitterQueryRecord;
use crate::core::interaction::Intersection;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::math::constants::{Float, PDF_EPSILON, Vector3f};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// One light-sampling estimate at a surface point.
#[derive(Debug, Clone, Copy)]
pub struct DirectSample {
    /// Le * f * |cos| / pdf_emitter, already shadow tested.
    pub radiance: RGBSpectrum,
    /// Solid-angle density of the emitter strategy, selection included.
    pub pdf_emitter: Float,
    /// Density the BSDF would have produced the same direction with.
    pub pdf_bsdf: Float,
}

/// Emission picked up by a ray, with the density light sampling would
/// have generated it with from the ray origin.
#[derive(Debug, Clone, Copy)]
pub struct EmissionSample {
    pub radiance: RGBSpectrum,
    pub pdf_emitter: Float,
}

/// Balance heuristic weight of strategy `a` against `b`.
pub fn balance_heuristic(pdf_a: Float, pdf_b: Float) -> Float {
    let sum = pdf_a + pdf_b;
    if sum <= 0.0 {
        return 0.0;
    }
    pdf_a / sum
}

/// Picks an emitter, samples a point on it and connects the shading point
/// to it. `wi` is the local direction towards the previous vertex.
pub fn sample_direct(scene: &Scene, sampler: &mut dyn Sampler,
                     its: &Intersection, wi: &Vector3f) -> Option<DirectSample> {
    let (id, selection_pdf) = scene.sample_emitter(sampler.next_1d())?;
    let emitter = scene.emitter(id);

    let mut rec = EmitterQueryRecord::new(its.p);
    let le = emitter.sample(scene, &mut rec, &sampler.next_2d(), sampler.next_1d());
    let pdf_emitter = rec.pdf * selection_pdf;
    if le.is_black() || pdf_emitter <= PDF_EPSILON {
        return None;
    }
    if scene.ray_occluded(&rec.shadow_ray()) {
        return None;
    }

    let bsdf = scene.surface_bsdf(its);
    let query = BSDFQueryRecord::with_directions(*wi, its.to_local(&rec.wi), EMeasure::SolidAngle)
        .with_uv(its.uv);
    let f = bsdf.eval(&query);
    if f.is_black() {
        return None;
    }

    Some(DirectSample {
        radiance: le * f * Frame::cos_theta(&query.wo).abs() / pdf_emitter,
        pdf_emitter,
        pdf_bsdf: bsdf.pdf(&query),
    })
}

/// Radiance emitted by the surface at `its` back along `ray`. None when the
/// surface is not an emitter.
pub fn surface_emission(scene: &Scene, ray: &Ray3f, its: &Intersection) -> Option<EmissionSample> {
    let id = scene.surface_emitter(its)?;
    let emitter = scene.emitter(id);
    let rec = EmitterQueryRecord::from_hit(ray.origin(), its.p, its.sh_frame.n, its.uv);
    Some(EmissionSample {
        radiance: emitter.eval(&rec),
        pdf_emitter: scene.pdf_emitter(id) * emitter.pdf(scene, &rec),
    })
}

/// Radiance arriving along a ray that escapes the scene. The density is
/// zero when the background cannot be sampled.
pub fn background_emission(scene: &Scene, ray: &Ray3f) -> EmissionSample {
    let pdf_emitter = match scene.environment() {
        Some(id) => {
            let rec = EmitterQueryRecord::from_direction(ray.origin(), ray.dir());
            scene.pdf_emitter(id) * scene.emitter(id).pdf(scene, &rec)
        }
        None => 0.0,
    };
    EmissionSample { radiance: scene.background(ray), pdf_emitter }
}
