// Copyright @yucwang 2026

//! Small analytic scenes shared by the estimator tests.

use crate::core::computation_node::SceneNode;
use crate::core::integrator::Integrator;
use crate::core::registry::Registry;
use crate::core::sampler::IndependentSampler;
use crate::core::scene::{Scene, SceneBuilder};
use crate::emitters::area::AreaEmitter;
use crate::emitters::environment::EnvironmentEmitter;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::materials::mirror::Mirror;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::triangle_mesh::Mesh;

/// Radiance leaving the floor point under the light in `lit_floor`: the
/// albedo times the form factor of a 2x2 square one unit above its centre.
pub const LIT_FLOOR_RADIANCE: Float = 0.27706;

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 20x20 floor (albedo 0.5) lit by a unit-radiance 2x2 quad at height
/// one facing down. Black background.
pub fn lit_floor() -> Scene {
    init_logging();
    let mut builder = SceneBuilder::new();
    // Off-centre so the probe point is not on a triangle edge.
    let floor = builder.add_mesh(Mesh::rectangle("floor",
                                                 Vector3f::new(3.0, -2.0, 0.0),
                                                 Vector3f::new(10.0, 0.0, 0.0),
                                                 Vector3f::new(0.0, 10.0, 0.0)));
    let light = builder.add_mesh(Mesh::rectangle("light",
                                                 Vector3f::new(0.0, 0.0, 1.0),
                                                 Vector3f::new(0.0, 1.0, 0.0),
                                                 Vector3f::new(1.0, 0.0, 0.0)));
    builder.add_child(floor, SceneNode::BSDF(Box::new(LambertianDiffuse::new(RGBSpectrum::splat(0.5)))))
        .expect("floor bsdf");
    builder.add_child(light, SceneNode::Emitter(Box::new(AreaEmitter::new(RGBSpectrum::one()))))
        .expect("light emitter");
    builder.activate(&Registry::with_defaults()).expect("scene activation")
}

/// Camera ray hitting the `lit_floor` floor at the origin, passing below
/// the light.
pub fn floor_ray() -> Ray3f {
    let origin = Vector3f::new(-3.0, 0.0, 0.5);
    Ray3f::new(origin, -origin, None, None)
}

/// Only a constant environment.
pub fn sky(radiance: RGBSpectrum) -> Scene {
    init_logging();
    let mut builder = SceneBuilder::new();
    builder.add_environment(Box::new(EnvironmentEmitter::new(radiance))).expect("environment");
    builder.activate(&Registry::with_defaults()).expect("scene activation")
}

/// Closed box [-1, 1]^3 (albedo 0.7, normals inward) with a small light
/// hanging below the ceiling.
pub fn closed_box() -> Scene {
    init_logging();
    let mut builder = SceneBuilder::new();
    let walls = builder.add_mesh(Mesh::cube("walls",
                                            Vector3f::new(-1.0, -1.0, -1.0),
                                            Vector3f::new(1.0, 1.0, 1.0),
                                            true));
    let light = builder.add_mesh(Mesh::rectangle("light",
                                                 Vector3f::new(0.0, 0.0, 0.9),
                                                 Vector3f::new(0.0, 0.4, 0.0),
                                                 Vector3f::new(0.4, 0.0, 0.0)));
    builder.add_child(walls, SceneNode::BSDF(Box::new(LambertianDiffuse::new(RGBSpectrum::splat(0.7)))))
        .expect("wall bsdf");
    builder.add_child(light, SceneNode::Emitter(Box::new(AreaEmitter::new(RGBSpectrum::splat(4.0)))))
        .expect("light emitter");
    builder.activate(&Registry::with_defaults()).expect("scene activation")
}

pub fn box_ray() -> Ray3f {
    Ray3f::new(Vector3f::zeros(), Vector3f::new(0.3, 0.2, -1.0), None, None)
}

/// Radiance of the light in `mirror_under_light`.
pub const MIRROR_LIGHT_RADIANCE: Float = 2.0;

/// A mirror floor reflecting a small downward-facing light. Only BSDF
/// sampling can find the light along `mirror_ray`.
pub fn mirror_under_light() -> Scene {
    init_logging();
    let mut builder = SceneBuilder::new();
    let floor = builder.add_mesh(Mesh::rectangle("mirror",
                                                 Vector3f::new(0.3, 0.2, 0.0),
                                                 Vector3f::new(5.0, 0.0, 0.0),
                                                 Vector3f::new(0.0, 5.0, 0.0)));
    let light = builder.add_mesh(Mesh::rectangle("light",
                                                 Vector3f::new(2.1, 0.0, 1.0),
                                                 Vector3f::new(0.0, 0.5, 0.0),
                                                 Vector3f::new(0.5, 0.0, 0.0)));
    builder.add_child(floor, SceneNode::BSDF(Box::new(Mirror::new()))).expect("mirror bsdf");
    builder.add_child(light, SceneNode::Emitter(Box::new(AreaEmitter::new(RGBSpectrum::splat(MIRROR_LIGHT_RADIANCE)))))
        .expect("light emitter");
    builder.activate(&Registry::with_defaults()).expect("scene activation")
}

/// Hits the mirror at (0, 0.1, 0) and reflects into the light.
pub fn mirror_ray() -> Ray3f {
    Ray3f::new(Vector3f::new(-2.0, 0.1, 1.0), Vector3f::new(1.0, 0.0, -0.5), None, None)
}

/// Mean and standard error of `n` estimates along `ray`.
pub fn estimate(integrator: &dyn Integrator, scene: &Scene, ray: &Ray3f, n: usize, seed: u64) -> (Float, Float) {
    let mut sampler = IndependentSampler::new(seed);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for _ in 0..n {
        let li = integrator.li(scene, &mut sampler, ray);
        assert!(li.is_valid(), "invalid estimate {:?}", li);
        let v = li.average() as f64;
        sum += v;
        sum_sq += v * v;
    }
    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean as Float, (variance / n as f64).sqrt() as Float)
}
