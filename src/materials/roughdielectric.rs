// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure, BSDF};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, ONE_MINUS_EPSILON, PDF_EPSILON, Vector2f, Vector3f};
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::materials::microfacet::{beckmann_d, beckmann_g, fresnel_dielectric, reflect, refract, sample_beckmann};

/// Rough glass interface (Walter et al. 2007) with a Beckmann
/// distribution. `ka` tints transmitted light.
pub struct RoughDielectric {
    alpha: Float,
    int_ior: Float,
    ext_ior: Float,
    ka: RGBSpectrum,
}

impl ComputationNode for RoughDielectric {
    fn to_string(&self) -> String {
        format!("RoughDielectric[alpha = {}, intIOR = {}, extIOR = {}, ka = {:?}]",
                self.alpha, self.int_ior, self.ext_ior, self.ka)
    }
}

/// Query mirrored so that `wi` lies in the upper hemisphere, with the
/// indices of refraction on the side of `wi` and the opposite side.
struct Oriented {
    wi: Vector3f,
    wo: Vector3f,
    eta_i: Float,
    eta_t: Float,
}

impl RoughDielectric {
    pub fn new(alpha: Float, int_ior: Float, ext_ior: Float, ka: RGBSpectrum) -> Self {
        Self { alpha: alpha.max(1e-4), int_ior, ext_ior, ka }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_float("alpha", 0.1)?,
                     props.get_float("intIOR", 1.5046)?,
                     props.get_float("extIOR", 1.000277)?,
                     props.get_color("ka", RGBSpectrum::one())?))
    }

    fn orient(&self, wi: &Vector3f, wo: &Vector3f) -> Oriented {
        if Frame::cos_theta(wi) >= 0.0 {
            Oriented { wi: *wi, wo: *wo, eta_i: self.ext_ior, eta_t: self.int_ior }
        } else {
            Oriented { wi: -wi, wo: -wo, eta_i: self.int_ior, eta_t: self.ext_ior }
        }
    }

    /// Probability of choosing reflection, the macro-surface Fresnel term.
    fn reflect_probability(q: &Oriented) -> Float {
        fresnel_dielectric(Frame::cos_theta(&q.wi), q.eta_i, q.eta_t)
    }

    /// Half vector of a refraction pair, pointing into the upper hemisphere.
    fn refraction_half_vector(q: &Oriented) -> Option<Vector3f> {
        let eta = q.eta_t / q.eta_i;
        let h = q.wi + eta * q.wo;
        if h.norm_squared() <= 0.0 {
            return None;
        }
        let h = h.normalize();
        Some(if h.z < 0.0 { -h } else { h })
    }
}

impl BSDF for RoughDielectric {
    fn sample(&self, rec: &mut BSDFQueryRecord, sample: &Vector2f) -> RGBSpectrum {
        if Frame::cos_theta(&rec.wi) == 0.0 {
            return RGBSpectrum::zero();
        }

        let q = self.orient(&rec.wi, &Vector3f::zeros());
        let p_reflect = Self::reflect_probability(&q);
        let choose_reflection = sample.x < p_reflect;
        let reused = if choose_reflection {
            sample.x / p_reflect
        } else {
            (sample.x - p_reflect) / (1.0 - p_reflect)
        };
        let wh = sample_beckmann(&Vector2f::new(reused.min(ONE_MINUS_EPSILON), sample.y), self.alpha);

        let wo = if choose_reflection {
            let wo = reflect(&q.wi, &wh);
            if wo.z <= 0.0 {
                return RGBSpectrum::zero();
            }
            rec.eta = 1.0;
            wo
        } else {
            let wo = match refract(&q.wi, &wh, q.eta_i / q.eta_t) {
                Some(wo) if wo.z < 0.0 => wo,
                _ => return RGBSpectrum::zero(),
            };
            rec.eta = q.eta_t / q.eta_i;
            wo
        };

        rec.wo = if Frame::cos_theta(&rec.wi) < 0.0 { -wo } else { wo };
        rec.measure = EMeasure::SolidAngle;

        let pdf = self.pdf(rec);
        if pdf <= PDF_EPSILON {
            return RGBSpectrum::zero();
        }
        self.eval(rec) * Frame::cos_theta(&rec.wo).abs() / pdf
    }

    fn eval(&self, rec: &BSDFQueryRecord) -> RGBSpectrum {
        if rec.measure != EMeasure::SolidAngle || Frame::cos_theta(&rec.wi) == 0.0 {
            return RGBSpectrum::zero();
        }

        let q = self.orient(&rec.wi, &rec.wo);
        let cos_i = Frame::cos_theta(&q.wi);
        let cos_o = Frame::cos_theta(&q.wo);
        if cos_o == 0.0 {
            return RGBSpectrum::zero();
        }

        if cos_o > 0.0 {
            let wh = (q.wi + q.wo).normalize();
            let f = fresnel_dielectric(q.wi.dot(&wh), q.eta_i, q.eta_t);
            let d = beckmann_d(&wh, self.alpha);
            let g = beckmann_g(&q.wi, &q.wo, &wh, self.alpha);
            return RGBSpectrum::splat(f * d * g / (4.0 * cos_i * cos_o));
        }

        let wh = match Self::refraction_half_vector(&q) {
            Some(wh) => wh,
            None => return RGBSpectrum::zero(),
        };
        let wi_h = q.wi.dot(&wh);
        let wo_h = q.wo.dot(&wh);
        if wi_h * cos_i <= 0.0 || wo_h * cos_o <= 0.0 {
            return RGBSpectrum::zero();
        }

        let eta = q.eta_t / q.eta_i;
        let sqrt_denom = wi_h + eta * wo_h;
        if sqrt_denom.abs() <= PDF_EPSILON {
            return RGBSpectrum::zero();
        }

        let f = fresnel_dielectric(wi_h, q.eta_i, q.eta_t);
        let d = beckmann_d(&wh, self.alpha);
        let g = beckmann_g(&q.wi, &q.wo, &wh, self.alpha);
        let value = (1.0 - f) * d * g * (wi_h * wo_h).abs()
            / ((cos_i * cos_o).abs() * sqrt_denom * sqrt_denom);

        self.ka * value
    }

    fn pdf(&self, rec: &BSDFQueryRecord) -> Float {
        if rec.measure != EMeasure::SolidAngle || Frame::cos_theta(&rec.wi) == 0.0 {
            return 0.0;
        }

        let q = self.orient(&rec.wi, &rec.wo);
        let cos_i = Frame::cos_theta(&q.wi);
        let cos_o = Frame::cos_theta(&q.wo);
        if cos_o == 0.0 {
            return 0.0;
        }
        let p_reflect = Self::reflect_probability(&q);

        if cos_o > 0.0 {
            let wh = (q.wi + q.wo).normalize();
            let jacobian = 4.0 * q.wo.dot(&wh).abs();
            if jacobian <= PDF_EPSILON {
                return 0.0;
            }
            return p_reflect * beckmann_d(&wh, self.alpha) * wh.z / jacobian;
        }

        let wh = match Self::refraction_half_vector(&q) {
            Some(wh) => wh,
            None => return 0.0,
        };
        let wi_h = q.wi.dot(&wh);
        let wo_h = q.wo.dot(&wh);
        if wi_h * cos_i <= 0.0 || wo_h * cos_o <= 0.0 {
            return 0.0;
        }

        let eta = q.eta_t / q.eta_i;
        let sqrt_denom = wi_h + eta * wo_h;
        if sqrt_denom.abs() <= PDF_EPSILON {
            return 0.0;
        }
        let jacobian = eta * eta * wo_h.abs() / (sqrt_denom * sqrt_denom);

        (1.0 - p_reflect) * beckmann_d(&wh, self.alpha) * wh.z * jacobian
    }

    fn is_diffuse(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn glass() -> RoughDielectric {
        RoughDielectric::new(0.1, 1.5046, 1.000277, RGBSpectrum::one())
    }

    #[test]
    fn test_reflection_fraction_follows_fresnel() {
        let bsdf = glass();
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let expected = fresnel_dielectric(0.8, 1.000277, 1.5046);
        let mut rng = StdRng::seed_from_u64(42);

        let mut reflected = 0usize;
        let mut valid = 0usize;
        for _ in 0..20000 {
            let mut rec = BSDFQueryRecord::new(wi);
            let weight = bsdf.sample(&mut rec, &Vector2f::new(rng.gen(), rng.gen()));
            if weight.is_black() {
                continue;
            }
            valid += 1;
            if rec.wo.z > 0.0 {
                assert_eq!(rec.eta, 1.0);
                reflected += 1;
            } else {
                assert!((rec.eta - 1.5046 / 1.000277).abs() < 1e-5);
            }
        }
        assert!(valid > 19000);
        assert!((reflected as Float / valid as Float - expected).abs() < 0.01);
    }

    #[test]
    fn test_sample_weight_matches_eval_and_pdf() {
        let bsdf = RoughDielectric::new(0.3, 1.5, 1.0, RGBSpectrum::new(0.9, 0.8, 0.7));
        let mut rng = StdRng::seed_from_u64(7);
        for &wi in [Vector3f::new(0.3, 0.2, 0.93), Vector3f::new(-0.2, 0.4, -0.89)].iter() {
            let wi = wi.normalize();
            for _ in 0..500 {
                let mut rec = BSDFQueryRecord::new(wi);
                let weight = bsdf.sample(&mut rec, &Vector2f::new(rng.gen(), rng.gen()));
                if weight.is_black() {
                    continue;
                }
                assert!(weight.is_valid());
                assert_eq!(rec.measure, EMeasure::SolidAngle);
                let pdf = bsdf.pdf(&rec);
                assert!(pdf > 0.0);
                let expected = bsdf.eval(&rec) * Frame::cos_theta(&rec.wo).abs() / pdf;
                for c in 0..3 {
                    assert!((weight[c] - expected[c]).abs() <= 1e-3 * expected[c].max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_refraction_crosses_the_interface() {
        let bsdf = glass();
        let mut rng = StdRng::seed_from_u64(13);
        for &wi in [Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.1, 0.0, -0.995)].iter() {
            let wi = wi.normalize();
            for _ in 0..2000 {
                let mut rec = BSDFQueryRecord::new(wi);
                if bsdf.sample(&mut rec, &Vector2f::new(rng.gen(), rng.gen())).is_black() {
                    continue;
                }
                let same_side = rec.wo.z * wi.z > 0.0;
                assert_eq!(same_side, rec.eta == 1.0);
            }
        }
    }

    #[test]
    fn test_non_solid_angle_queries_are_zero() {
        let bsdf = glass();
        let rec = BSDFQueryRecord::with_directions(Vector3f::z(), -Vector3f::z(), EMeasure::Discrete);
        assert!(bsdf.eval(&rec).is_black());
        assert_eq!(bsdf.pdf(&rec), 0.0);
    }
}
