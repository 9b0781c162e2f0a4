// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, SceneNode};
use crate::core::error::{RenderError, Result};
use crate::core::medium::{Medium, MediumQueryRecord};
use crate::core::phase::PhaseFunction;
use crate::core::properties::PropertyList;
use crate::core::registry::Registry;
use crate::core::sampler::Sampler;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Medium with constant absorption and scattering coefficients.
pub struct HomogeneousMedium {
    sigma_a: RGBSpectrum,
    sigma_s: RGBSpectrum,
    phase: Option<Box<dyn PhaseFunction>>,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: RGBSpectrum, sigma_s: RGBSpectrum) -> Self {
        Self { sigma_a, sigma_s, phase: None }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_color("sigmaA", RGBSpectrum::zero())?,
                     props.get_color("sigmaS", RGBSpectrum::zero())?))
    }

    pub fn sigma_t(&self) -> RGBSpectrum {
        self.sigma_a + self.sigma_s
    }
}

impl ComputationNode for HomogeneousMedium {
    fn to_string(&self) -> String {
        format!("HomogeneousMedium[sigmaA = {:?}, sigmaS = {:?}, phaseFunction = {}]",
                self.sigma_a, self.sigma_s,
                self.phase.as_ref().map_or(String::from("null"), |p| p.to_string()))
    }
}

impl Medium for HomogeneousMedium {
    fn sample<'a>(&'a self, rec: &mut MediumQueryRecord<'a>, _sampler: &mut dyn Sampler) {
        rec.sigma_a = self.sigma_a;
        rec.sigma_s = self.sigma_s;
        rec.sigma_t = self.sigma_t();
        rec.le = RGBSpectrum::zero();
        rec.phase_function = self.phase_function();
    }

    fn sample_distance<'a>(&'a self, ray: &Ray3f, rec: &mut MediumQueryRecord<'a>,
                           sampler: &mut dyn Sampler) -> bool {
        let sigma_t = self.sigma_t();
        let sigma_bar = sigma_t.luminance();
        let t_max = ray.max_t;

        if sigma_bar <= 0.0 {
            rec.t = t_max;
            rec.p = ray.at(t_max);
            rec.transmittance = RGBSpectrum::one();
            rec.pdf = 1.0;
            return false;
        }

        let t = -(1.0 - sampler.next_1d()).ln() / sigma_bar;
        if t < t_max {
            rec.t = t;
            rec.p = ray.at(t);
            self.sample(rec, sampler);
            rec.transmittance = (sigma_t * -t).exp();
            rec.pdf = sigma_bar * (-sigma_bar * t).exp();
            true
        } else {
            rec.t = t_max;
            rec.p = ray.at(t_max);
            rec.transmittance = (sigma_t * -t_max).exp();
            rec.pdf = (-sigma_bar * t_max).exp();
            false
        }
    }

    fn eval_transmittance(&self, ray: &Ray3f, _sampler: &mut dyn Sampler) -> RGBSpectrum {
        (self.sigma_t() * -ray.max_t).exp()
    }

    fn phase_function(&self) -> Option<&dyn PhaseFunction> {
        self.phase.as_deref()
    }

    fn add_child(&mut self, child: SceneNode) -> Result<()> {
        match child {
            SceneNode::PhaseFunction(phase) => {
                if self.phase.is_some() {
                    return Err(RenderError::Configuration(String::from(
                        "HomogeneousMedium: a phase function has already been specified")));
                }
                self.phase = Some(phase);
                Ok(())
            }
            other => Err(RenderError::Configuration(format!(
                "HomogeneousMedium: expected a phase function, got a {}", other.class_name()))),
        }
    }

    fn activate(&mut self, registry: &Registry) -> Result<()> {
        if self.phase.is_none() {
            self.phase = Some(registry.create_phase_function("isotropic", &PropertyList::new())?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::IndependentSampler;
    use crate::materials::mirror::Mirror;
    use crate::math::constants::{Float, FLOAT_MAX, Vector3f};
    use crate::phase_functions::isotropic::Isotropic;

    fn ray_along_x(max_t: Float) -> Ray3f {
        Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Some(0.0), Some(max_t))
    }

    #[test]
    fn test_free_flight_histogram() {
        let mut medium = HomogeneousMedium::new(RGBSpectrum::zero(), RGBSpectrum::splat(2.0));
        medium.activate(&Registry::with_defaults()).unwrap();
        let mut sampler = IndependentSampler::new(12);
        let ray = ray_along_x(FLOAT_MAX);

        let n = 100_000;
        let mut bins = [0usize; 4];
        let mut sum_t = 0.0f64;
        for _ in 0..n {
            let mut rec = MediumQueryRecord::new(ray.origin());
            assert!(medium.sample_distance(&ray, &mut rec, &mut sampler));
            assert!(rec.phase_function.is_some());
            // Real interactions carry weight 1 / sigma_t, so weight * sigma_s is the albedo.
            assert!(((rec.weight() * rec.sigma_s)[0] - 1.0).abs() < 1e-3);
            sum_t += rec.t as f64;
            bins[((rec.t / 0.25) as usize).min(3)] += 1;
        }

        assert!((sum_t / n as f64 - 0.5).abs() < 0.01);
        // Expected mass of [0, .25), [.25, .5), [.5, .75), [.75, inf).
        let e = |x: f64| (-2.0 * x).exp();
        let expected = [1.0 - e(0.25), e(0.25) - e(0.5), e(0.5) - e(0.75), e(0.75)];
        for (count, p) in bins.iter().zip(expected.iter()) {
            assert!((*count as f64 / n as f64 - p).abs() < 0.01);
        }
    }

    #[test]
    fn test_absorbing_slab_transmittance() {
        let medium = HomogeneousMedium::new(RGBSpectrum::splat(1.5), RGBSpectrum::zero());
        let mut sampler = IndependentSampler::new(3);
        let ray = ray_along_x(2.0);

        let expected = (-3.0f32).exp();
        assert!((medium.eval_transmittance(&ray, &mut sampler)[1] - expected).abs() < 1e-6);

        let n = 100_000;
        let mut estimate = 0.0f64;
        for _ in 0..n {
            let mut rec = MediumQueryRecord::new(ray.origin());
            if !medium.sample_distance(&ray, &mut rec, &mut sampler) {
                assert!((rec.t - 2.0).abs() < 1e-6);
                estimate += rec.weight()[0] as f64;
            }
        }
        assert!((estimate / n as f64 - expected as f64).abs() < 0.003);
    }

    #[test]
    fn test_empty_medium_is_transparent() {
        let medium = HomogeneousMedium::from_properties(&PropertyList::new()).unwrap();
        let mut sampler = IndependentSampler::new(1);
        let mut rec = MediumQueryRecord::new(Vector3f::zeros());
        assert!(!medium.sample_distance(&ray_along_x(5.0), &mut rec, &mut sampler));
        assert_eq!(rec.weight(), RGBSpectrum::one());
        assert_eq!(medium.eval_transmittance(&ray_along_x(5.0), &mut sampler), RGBSpectrum::one());
    }

    #[test]
    fn test_children() {
        let mut medium = HomogeneousMedium::new(RGBSpectrum::one(), RGBSpectrum::one());
        assert!(medium.phase_function().is_none());
        medium.add_child(SceneNode::PhaseFunction(Box::new(Isotropic::new()))).unwrap();
        assert!(medium.add_child(SceneNode::PhaseFunction(Box::new(Isotropic::new()))).is_err());
        assert!(matches!(medium.add_child(SceneNode::BSDF(Box::new(Mirror::new()))),
                         Err(RenderError::Configuration(_))));
        medium.activate(&Registry::with_defaults()).unwrap();
        assert!(medium.phase_function().is_some());
    }
}
