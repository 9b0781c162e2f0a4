// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure, BSDF};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, PDF_EPSILON, Vector2f};
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::materials::microfacet::{beckmann_d, beckmann_g, fresnel_schlick, reflect, sample_beckmann};

/// Beckmann microfacet conductor with a Schlick Fresnel term driven by the
/// reflectance at normal incidence.
pub struct RoughConductor {
    alpha: Float,
    r0: RGBSpectrum,
}

impl ComputationNode for RoughConductor {
    fn to_string(&self) -> String {
        format!("RoughConductor[alpha = {}, R0 = {:?}]", self.alpha, self.r0)
    }
}

impl RoughConductor {
    pub fn new(alpha: Float, r0: RGBSpectrum) -> Self {
        Self { alpha: alpha.max(1e-4), r0 }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_float("alpha", 0.1)?,
                     props.get_color("R0", RGBSpectrum::splat(0.5))?))
    }

    fn valid_pair(rec: &BSDFQueryRecord) -> bool {
        rec.measure == EMeasure::SolidAngle
            && Frame::cos_theta(&rec.wi) > 0.0
            && Frame::cos_theta(&rec.wo) > 0.0
    }
}

impl BSDF for RoughConductor {
    fn sample(&self, rec: &mut BSDFQueryRecord, sample: &Vector2f) -> RGBSpectrum {
        if Frame::cos_theta(&rec.wi) <= 0.0 {
            return RGBSpectrum::zero();
        }

        let wh = sample_beckmann(sample, self.alpha);
        rec.wo = reflect(&rec.wi, &wh);
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

        let wh = (rec.wi + rec.wo).normalize();
        let d = beckmann_d(&wh, self.alpha);
        let g = beckmann_g(&rec.wi, &rec.wo, &wh, self.alpha);
        let f = fresnel_schlick(self.r0, rec.wi.dot(&wh));

        f * (d * g / (4.0 * Frame::cos_theta(&rec.wi) * Frame::cos_theta(&rec.wo)))
    }

    fn pdf(&self, rec: &BSDFQueryRecord) -> Float {
        if !Self::valid_pair(rec) {
            return 0.0;
        }

        let wh = (rec.wi + rec.wo).normalize();
        let jacobian = 4.0 * rec.wo.dot(&wh).abs();
        if jacobian <= PDF_EPSILON {
            return 0.0;
        }
        beckmann_d(&wh, self.alpha) * Frame::cos_theta(&wh) / jacobian
    }

    fn is_diffuse(&self) -> bool {
        true
    }
}
