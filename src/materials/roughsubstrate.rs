// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure, BSDF};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, INV_PI, ONE_MINUS_EPSILON, PDF_EPSILON, PI, Vector2f, Vector3f};
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::square_to_cosine_hemisphere;
use crate::materials::microfacet::{beckmann_d, beckmann_g, fresnel_dielectric, reflect, sample_beckmann};

/// Diffuse base under a rough dielectric coating (Ashikhmin-Shirley).
pub struct RoughSubstrate {
    alpha: Float,
    int_ior: Float,
    ext_ior: Float,
    kd: RGBSpectrum,
}

impl ComputationNode for RoughSubstrate {
    fn to_string(&self) -> String {
        format!("RoughSubstrate[alpha = {}, intIOR = {}, extIOR = {}, kd = {:?}]",
                self.alpha, self.int_ior, self.ext_ior, self.kd)
    }
}

impl RoughSubstrate {
    pub fn new(alpha: Float, int_ior: Float, ext_ior: Float, kd: RGBSpectrum) -> Self {
        Self { alpha: alpha.max(1e-4), int_ior, ext_ior, kd }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_float("alpha", 0.1)?,
                     props.get_float("intIOR", 1.5046)?,
                     props.get_float("extIOR", 1.000277)?,
                     props.get_color("kd", RGBSpectrum::splat(0.5))?))
    }

    fn valid_pair(rec: &BSDFQueryRecord) -> bool {
        rec.measure == EMeasure::SolidAngle
            && Frame::cos_theta(&rec.wi) > 0.0
            && Frame::cos_theta(&rec.wo) > 0.0
    }

    /// Probability of sampling the specular lobe, the coating's Fresnel
    /// reflectance seen from `wi`.
    fn specular_probability(&self, wi: &Vector3f) -> Float {
        fresnel_dielectric(Frame::cos_theta(wi), self.ext_ior, self.int_ior)
    }
}

impl BSDF for RoughSubstrate {
    fn sample(&self, rec: &mut BSDFQueryRecord, sample: &Vector2f) -> RGBSpectrum {
        if Frame::cos_theta(&rec.wi) <= 0.0 {
            return RGBSpectrum::zero();
        }

        let p_specular = self.specular_probability(&rec.wi);
        rec.wo = if sample.x < p_specular {
            let reused = Vector2f::new((sample.x / p_specular).min(ONE_MINUS_EPSILON), sample.y);
            let wh = sample_beckmann(&reused, self.alpha);
            reflect(&rec.wi, &wh)
        } else {
            let reused = Vector2f::new(((sample.x - p_specular) / (1.0 - p_specular)).min(ONE_MINUS_EPSILON), sample.y);
            square_to_cosine_hemisphere(&reused)
        };
        rec.measure = EMeasure::SolidAngle;
        rec.eta = 1.0;
        if Frame::cos_theta(&rec.wo) <= 0.0 {
            return RGBSpectrum::zero();
        }

        let pdf = self.pdf(rec);
        if pdf <= PDF_EPSILON {
            return RGBSpectrum::zero();
        }
        self.eval(rec) * Frame::cos_theta(&rec.wo) / pdf
    }

    fn eval(&self, rec: &BSDFQueryRecord) -> RGBSpectrum {
        if !Self::valid_pair(rec) {
            return RGBSpectrum::zero();
        }
        let cos_i = Frame::cos_theta(&rec.wi);
        let cos_o = Frame::cos_theta(&rec.wo);

        let r = (self.ext_ior - self.int_ior) / (self.ext_ior + self.int_ior);
        let diffuse = self.kd * (28.0 / (23.0 * PI))
            * (1.0 - r * r)
            * (1.0 - (1.0 - 0.5 * cos_i).powi(5))
            * (1.0 - (1.0 - 0.5 * cos_o).powi(5));

        let wh = (rec.wi + rec.wo).normalize();
        let d = beckmann_d(&wh, self.alpha);
        let g = beckmann_g(&rec.wi, &rec.wo, &wh, self.alpha);
        let f = fresnel_dielectric(rec.wi.dot(&wh), self.ext_ior, self.int_ior);
        let specular = f * d * g / (4.0 * cos_i * cos_o);

        diffuse + RGBSpectrum::splat(specular)
    }

    fn pdf(&self, rec: &BSDFQueryRecord) -> Float {
        if !Self::valid_pair(rec) {
            return 0.0;
        }

        let p_specular = self.specular_probability(&rec.wi);
        let wh = (rec.wi + rec.wo).normalize();
        let jacobian = 4.0 * rec.wo.dot(&wh).abs();
        let specular = if jacobian > PDF_EPSILON {
            beckmann_d(&wh, self.alpha) * Frame::cos_theta(&wh) / jacobian
        } else {
            0.0
        };
        let diffuse = Frame::cos_theta(&rec.wo) * INV_PI;

        p_specular * specular + (1.0 - p_specular) * diffuse
    }

    fn is_diffuse(&self) -> bool {
        true
    }
}
