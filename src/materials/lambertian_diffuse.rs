// Copyright @yucwang 2023

use crate::core::bsdf::{BSDFQueryRecord, EMeasure, BSDF};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{ Float, INV_PI, Vector2f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf };

pub struct LambertianDiffuse {
    albedo: RGBSpectrum
}

impl ComputationNode for LambertianDiffuse {
    fn to_string(&self) -> String {
        format!("LambertianDiffuse[albedo = {:?}]", self.albedo)
    }
}

impl LambertianDiffuse {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_color("albedo", RGBSpectrum::splat(0.5))?))
    }

    fn same_hemisphere(rec: &BSDFQueryRecord) -> bool {
        rec.measure == EMeasure::SolidAngle
            && Frame::cos_theta(&rec.wi) > 0.0
            && Frame::cos_theta(&rec.wo) > 0.0
    }
}

impl BSDF for LambertianDiffuse {
    fn sample(&self, rec: &mut BSDFQueryRecord, sample: &Vector2f) -> RGBSpectrum {
        if Frame::cos_theta(&rec.wi) <= 0.0 {
            return RGBSpectrum::zero();
        }

        rec.measure = EMeasure::SolidAngle;
        rec.wo = square_to_cosine_hemisphere(sample);
        rec.eta = 1.0;

        // eval * cos / pdf collapses to the albedo.
        self.albedo
    }

    fn eval(&self, rec: &BSDFQueryRecord) -> RGBSpectrum {
        if !Self::same_hemisphere(rec) {
            return RGBSpectrum::zero();
        }
        self.albedo * INV_PI
    }

    fn pdf(&self, rec: &BSDFQueryRecord) -> Float {
        if !Self::same_hemisphere(rec) {
            return 0.0;
        }
        square_to_cosine_hemisphere_pdf(&rec.wo)
    }

    fn is_diffuse(&self) -> bool {
        true
    }
}
