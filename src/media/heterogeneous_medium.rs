// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, SceneNode};
use crate::core::density::DensityFunction;
use crate::core::error::{RenderError, Result};
use crate::core::medium::{Medium, MediumQueryRecord};
use crate::core::phase::PhaseFunction;
use crate::core::properties::PropertyList;
use crate::core::registry::Registry;
use crate::core::sampler::Sampler;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Upper bound on tracking steps along one segment. Only reached by
/// unbounded segments through a nearly empty medium.
const MAX_TRACKING_STEPS: usize = 100_000;

/// Medium whose extinction follows a density field:
/// `sigma_t(x) = scale * density(x)`, `sigma_s = sigma_t * albedo`,
/// `Le(x) = emission * color(x)`.
pub struct HeterogeneousMedium {
    albedo: RGBSpectrum,
    scale: Float,
    emission: RGBSpectrum,
    phase: Option<Box<dyn PhaseFunction>>,
    density: Option<Box<dyn DensityFunction>>,
}

impl HeterogeneousMedium {
    pub fn new(albedo: RGBSpectrum, scale: Float, emission: RGBSpectrum) -> Self {
        Self { albedo, scale: scale.max(0.0), emission, phase: None, density: None }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_color("albedo", RGBSpectrum::splat(0.5))?,
                     props.get_float("scale", 1.0)?,
                     props.get_color("emission", RGBSpectrum::zero())?))
    }

    fn majorant(&self) -> Float {
        self.density.as_ref().map_or(0.0, |d| self.scale * d.max_density())
    }

    fn sigma_t_at(&self, p: &Vector3f) -> Float {
        self.density.as_ref().map_or(0.0, |d| self.scale * d.eval(p).density)
    }
}

impl ComputationNode for HeterogeneousMedium {
    fn to_string(&self) -> String {
        format!("HeterogeneousMedium[albedo = {:?}, scale = {}, emission = {:?}, phaseFunction = {}, density = {}]",
                self.albedo, self.scale, self.emission,
                self.phase.as_ref().map_or(String::from("null"), |p| p.to_string()),
                self.density.as_ref().map_or(String::from("null"), |d| d.to_string()))
    }
}

impl Medium for HeterogeneousMedium {
    fn sample<'a>(&'a self, rec: &mut MediumQueryRecord<'a>, _sampler: &mut dyn Sampler) {
        rec.phase_function = self.phase_function();
        let local = match &self.density {
            Some(density) => density.eval(&rec.p),
            None => {
                rec.sigma_a = RGBSpectrum::zero();
                rec.sigma_s = RGBSpectrum::zero();
                rec.sigma_t = RGBSpectrum::zero();
                rec.le = RGBSpectrum::zero();
                return;
            }
        };

        let sigma_t = RGBSpectrum::splat(self.scale * local.density.max(0.0));
        rec.sigma_t = sigma_t;
        rec.sigma_s = sigma_t * self.albedo;
        rec.sigma_a = sigma_t - rec.sigma_s;
        rec.le = self.emission * local.color;
    }

    /// Delta tracking. A real collision at `x` is reported with
    /// transmittance 1 and pdf `sigma_t(x)`.
    fn sample_distance<'a>(&'a self, ray: &Ray3f, rec: &mut MediumQueryRecord<'a>,
                           sampler: &mut dyn Sampler) -> bool {
        let majorant = self.majorant();
        let t_max = ray.max_t;
        rec.transmittance = RGBSpectrum::one();
        rec.pdf = 1.0;

        if majorant > 0.0 {
            let mut t = 0.0;
            for _ in 0..MAX_TRACKING_STEPS {
                t -= (1.0 - sampler.next_1d()).ln() / majorant;
                if t >= t_max {
                    rec.t = t_max;
                    rec.p = ray.at(t_max);
                    return false;
                }

                let p = ray.at(t);
                let sigma_t = self.sigma_t_at(&p);
                if sampler.next_1d() * majorant < sigma_t {
                    rec.t = t;
                    rec.p = p;
                    self.sample(rec, sampler);
                    rec.pdf = sigma_t;
                    return true;
                }
            }
            log::debug!("Delta tracking gave up after {} steps", MAX_TRACKING_STEPS);
            rec.transmittance = RGBSpectrum::zero();
        }

        rec.t = t_max;
        rec.p = ray.at(t_max);
        false
    }

    /// Ratio tracking.
    fn eval_transmittance(&self, ray: &Ray3f, sampler: &mut dyn Sampler) -> RGBSpectrum {
        let majorant = self.majorant();
        if majorant <= 0.0 {
            return RGBSpectrum::one();
        }

        let mut transmittance = 1.0;
        let mut t = 0.0;
        for _ in 0..MAX_TRACKING_STEPS {
            t -= (1.0 - sampler.next_1d()).ln() / majorant;
            if t >= ray.max_t {
                return RGBSpectrum::splat(transmittance);
            }
            transmittance *= (1.0 - self.sigma_t_at(&ray.at(t)) / majorant).max(0.0);
            if transmittance <= 0.0 {
                break;
            }
        }
        RGBSpectrum::zero()
    }

    fn phase_function(&self) -> Option<&dyn PhaseFunction> {
        self.phase.as_deref()
    }

    fn add_child(&mut self, child: SceneNode) -> Result<()> {
        match child {
            SceneNode::PhaseFunction(phase) => {
                if self.phase.is_some() {
                    return Err(RenderError::Configuration(String::from(
                        "HeterogeneousMedium: a phase function has already been specified")));
                }
                self.phase = Some(phase);
            }
            SceneNode::Density(density) => {
                if self.density.is_some() {
                    return Err(RenderError::Configuration(String::from(
                        "HeterogeneousMedium: a density function has already been specified")));
                }
                self.density = Some(density);
            }
            other => {
                return Err(RenderError::Configuration(format!(
                    "HeterogeneousMedium: expected a phase or density function, got a {}", other.class_name())));
            }
        }
        Ok(())
    }

    fn activate(&mut self, registry: &Registry) -> Result<()> {
        if self.phase.is_none() {
            self.phase = Some(registry.create_phase_function("henyey_greenstein", &PropertyList::new())?);
        }
        if self.density.is_none() {
            let props = PropertyList::new()
                .with("frequency", 27.0 as Float)
                .with("octaves", 3i64)
                .with("persistence", 0.6 as Float)
                .with("seed", 0i64);
            self.density = Some(registry.create_density("perlin", &props)?);
        }
        log::debug!("Activated {}", self.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::density::DensitySample;
    use crate::core::sampler::IndependentSampler;
    use crate::densities::constant::ConstantDensity;
    use crate::emitters::environment::EnvironmentEmitter;

    /// Constant field with a loose upper bound, so tracking sees null collisions.
    struct LooseDensity;

    impl ComputationNode for LooseDensity {
        fn to_string(&self) -> String {
            String::from("LooseDensity")
        }
    }

    impl DensityFunction for LooseDensity {
        fn eval(&self, _p: &Vector3f) -> DensitySample {
            DensitySample { density: 0.5, color: RGBSpectrum::new(1.0, 0.5, 0.0) }
        }

        fn max_density(&self) -> Float {
            1.0
        }
    }

    fn loose_medium() -> HeterogeneousMedium {
        let mut medium = HeterogeneousMedium::new(RGBSpectrum::new(0.8, 0.6, 0.4), 2.0, RGBSpectrum::splat(3.0));
        medium.add_child(SceneNode::Density(Box::new(LooseDensity))).unwrap();
        medium.activate(&Registry::with_defaults()).unwrap();
        medium
    }

    fn ray_along_z(max_t: Float) -> Ray3f {
        Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), Some(max_t))
    }

    #[test]
    fn test_ratio_tracking_matches_beer_lambert() {
        let medium = loose_medium();
        let mut sampler = IndependentSampler::new(31);
        let ray = ray_along_z(1.5);

        let n = 50_000;
        let mean = (0..n).map(|_| medium.eval_transmittance(&ray, &mut sampler)[0] as f64).sum::<f64>() / n as f64;
        // sigma_t = 2 * 0.5 = 1 along the whole segment.
        assert!((mean - (-1.5f64).exp()).abs() < 0.01, "transmittance {}", mean);
    }

    #[test]
    fn test_delta_tracking_collisions() {
        let medium = loose_medium();
        let mut sampler = IndependentSampler::new(17);
        let ray = ray_along_z(2.0);

        let n = 50_000;
        let mut collisions = 0usize;
        for _ in 0..n {
            let mut rec = MediumQueryRecord::new(ray.origin());
            if medium.sample_distance(&ray, &mut rec, &mut sampler) {
                collisions += 1;
                assert!(rec.t < 2.0);
                let scattered = rec.weight() * rec.sigma_s;
                assert!((scattered - RGBSpectrum::new(0.8, 0.6, 0.4)).max_coeff().abs() < 1e-4);
                let emitted = rec.weight() * rec.sigma_a * rec.le;
                assert!((emitted[0] - 0.2 * 3.0).abs() < 1e-4);
                assert!(emitted[2].abs() < 1e-6);
            } else {
                assert_eq!(rec.weight(), RGBSpectrum::one());
            }
        }
        let expected = 1.0 - (-2.0f64).exp();
        assert!((collisions as f64 / n as f64 - expected).abs() < 0.01);
    }

    #[test]
    fn test_activation_defaults_and_children() {
        let mut medium = HeterogeneousMedium::from_properties(&PropertyList::new()).unwrap();
        assert!(medium.phase_function().is_none());
        medium.activate(&Registry::with_defaults()).unwrap();
        assert!(medium.phase_function().is_some());
        assert!(medium.to_string().contains("PerlinDensity"));

        let duplicate = medium.add_child(SceneNode::Density(Box::new(ConstantDensity::new(1.0, RGBSpectrum::one()))));
        assert!(matches!(duplicate, Err(RenderError::Configuration(_))));
        let wrong = medium.add_child(SceneNode::Emitter(Box::new(EnvironmentEmitter::new(RGBSpectrum::one()))));
        assert!(matches!(wrong, Err(RenderError::Configuration(_))));
    }

    #[test]
    fn test_empty_medium_passes_through() {
        let mut medium = HeterogeneousMedium::new(RGBSpectrum::one(), 0.0, RGBSpectrum::zero());
        medium.activate(&Registry::with_defaults()).unwrap();
        let mut sampler = IndependentSampler::new(2);
        let mut rec = MediumQueryRecord::new(Vector3f::zeros());
        assert!(!medium.sample_distance(&ray_along_z(4.0), &mut rec, &mut sampler));
        assert_eq!(rec.weight(), RGBSpectrum::one());
        assert_eq!(medium.eval_transmittance(&ray_along_z(4.0), &mut sampler), RGBSpectrum::one());
    }
}
