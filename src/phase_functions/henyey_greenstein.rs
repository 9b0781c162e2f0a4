// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::phase::{PhaseFunction, PhaseFunctionQueryRecord};
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, INV_FOURPI, PI, Vector2f, Vector3f};
use crate::math::frame::Frame;

/// Below this asymmetry the lobe is sampled as isotropic.
const ISOTROPIC_G: Float = 1e-3;

/// Henyey-Greenstein lobe around the propagation direction `wi`. Positive
/// `g` favours forward scattering.
pub struct HenyeyGreenstein {
    g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        Self { g: g.max(-0.999).min(0.999) }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_float("g", 0.0)?))
    }

    pub fn g(&self) -> Float {
        self.g
    }

    fn lobe(&self, cos_theta: Float) -> Float {
        if self.g.abs() < ISOTROPIC_G {
            return INV_FOURPI;
        }
        let g2 = self.g * self.g;
        let denom = (1.0 + g2 - 2.0 * self.g * cos_theta).max(1e-8);
        INV_FOURPI * (1.0 - g2) / (denom * denom.sqrt())
    }
}

impl ComputationNode for HenyeyGreenstein {
    fn to_string(&self) -> String {
        format!("HenyeyGreenstein[g = {}]", self.g)
    }
}

impl PhaseFunction for HenyeyGreenstein {
    fn sample(&self, rec: &mut PhaseFunctionQueryRecord, sample: &Vector2f) -> Float {
        let g = self.g;
        let cos_theta = if g.abs() < ISOTROPIC_G {
            1.0 - 2.0 * sample.x
        } else {
            let sqr_term = (1.0 - g * g) / (1.0 - g + 2.0 * g * sample.x);
            (1.0 + g * g - sqr_term * sqr_term) / (2.0 * g)
        };
        let cos_theta = cos_theta.max(-1.0).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * sample.y;

        let frame = Frame::from_normal(&rec.wi);
        rec.wo = frame.to_world(&Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta));

        // Sampling is exact: eval / pdf.
        1.0
    }

    fn eval(&self, rec: &PhaseFunctionQueryRecord) -> Float {
        self.lobe(rec.wi.dot(&rec.wo))
    }

    fn pdf(&self, rec: &PhaseFunctionQueryRecord) -> Float {
        self.lobe(rec.wi.dot(&rec.wo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::warp::square_to_uniform_sphere;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_mean_cosine_equals_g() {
        let wi = Vector3f::new(0.3, -0.4, 0.5).normalize();
        for &g in [-0.7, -0.2, 0.0, 0.5, 0.9].iter() {
            let phase = HenyeyGreenstein::new(g);
            let mut rng = StdRng::seed_from_u64(99);
            let n = 100_000;
            let mut sum = 0.0f64;
            for _ in 0..n {
                let mut rec = PhaseFunctionQueryRecord::new(wi);
                assert_eq!(phase.sample(&mut rec, &Vector2f::new(rng.gen(), rng.gen())), 1.0);
                sum += wi.dot(&rec.wo) as f64;
            }
            let mean = sum / n as f64;
            assert!((mean - g as f64).abs() < 0.01, "g = {}, mean cosine {}", g, mean);
        }
    }

    #[test]
    fn test_pdf_integrates_to_one() {
        let phase = HenyeyGreenstein::from_properties(&PropertyList::new().with("g", 0.4f32)).unwrap();
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(4);
        let n = 200_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let wo = square_to_uniform_sphere(&Vector2f::new(rng.gen(), rng.gen()));
            sum += (phase.pdf(&PhaseFunctionQueryRecord::with_directions(wi, wo)) * 4.0 * PI) as f64;
        }
        assert!((sum / n as f64 - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_forward_peak_and_isotropic_limit() {
        let phase = HenyeyGreenstein::new(0.8);
        let wi = Vector3f::new(1.0, 0.0, 0.0);
        let forward = PhaseFunctionQueryRecord::with_directions(wi, wi);
        let backward = PhaseFunctionQueryRecord::with_directions(wi, -wi);
        assert!(phase.eval(&forward) > phase.eval(&backward));

        let flat = HenyeyGreenstein::new(1e-4);
        assert_eq!(flat.eval(&forward), INV_FOURPI);
        assert_eq!(flat.pdf(&backward), INV_FOURPI);
    }
}
