// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::properties::PropertyList;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Debug estimator: inverse distance to the first hit as grey, the
/// background on a miss.
#[derive(Debug, Default)]
pub struct DepthIntegrator;

impl DepthIntegrator {
    pub fn new() -> Self {
        Self
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Self::new())
    }
}

impl ComputationNode for DepthIntegrator {
    fn to_string(&self) -> String {
        String::from("DepthIntegrator[]")
    }
}

impl Integrator for DepthIntegrator {
    fn li(&self, scene: &Scene, _sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        match scene.ray_intersect(ray) {
            Some(its) if its.t > 0.0 => RGBSpectrum::splat(1.0 / its.t),
            _ => scene.background(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Registry;
    use crate::core::sampler::IndependentSampler;
    use crate::core::scene::SceneBuilder;
    use crate::math::constants::Vector3f;
    use crate::shapes::triangle_mesh::Mesh;

    #[test]
    fn test_inverse_distance() {
        let mut builder = SceneBuilder::new();
        builder.add_mesh(Mesh::rectangle("wall",
                                         Vector3f::new(0.0, 0.0, 2.0),
                                         Vector3f::new(1.0, 0.0, 0.0),
                                         Vector3f::new(0.0, 1.0, 0.0)));
        let scene = builder.activate(&Registry::with_defaults()).unwrap();
        let mut sampler = IndependentSampler::new(0);

        let hit = Ray3f::new(Vector3f::new(0.1, 0.3, 0.0), Vector3f::z(), None, None);
        let li = DepthIntegrator::new().li(&scene, &mut sampler, &hit);
        assert!((li[0] - 0.5).abs() < 1e-5);
        assert_eq!(li[0], li[2]);

        let miss = Ray3f::new(Vector3f::zeros(), -Vector3f::z(), None, None);
        assert!(DepthIntegrator::new().li(&scene, &mut sampler, &miss).is_black());
    }

    #[test]
    fn test_miss_returns_background() {
        let mut builder = SceneBuilder::new();
        builder.set_background(RGBSpectrum::new(0.1, 0.2, 0.3));
        let scene = builder.activate(&Registry::with_defaults()).unwrap();
        let mut sampler = IndependentSampler::new(0);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::x(), None, None);
        let li = DepthIntegrator::new().li(&scene, &mut sampler, &ray);
        assert_eq!(li, RGBSpectrum::new(0.1, 0.2, 0.3));
    }
}
