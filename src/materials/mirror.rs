// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, EMeasure, BSDF};
use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;

/// Ideal specular reflector. Its only lobe is a Dirac delta, so `eval` and
/// `pdf` are zero for every solid-angle query.
#[derive(Default)]
pub struct Mirror;

impl ComputationNode for Mirror {
    fn to_string(&self) -> String {
        String::from("Mirror[]")
    }
}

impl Mirror {
    pub fn new() -> Self {
        Mirror
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Mirror)
    }
}

impl BSDF for Mirror {
    fn sample(&self, rec: &mut BSDFQueryRecord, _sample: &Vector2f) -> RGBSpectrum {
        if Frame::cos_theta(&rec.wi) <= 0.0 {
            return RGBSpectrum::zero();
        }

        rec.wo = Vector3f::new(-rec.wi.x, -rec.wi.y, rec.wi.z);
        rec.measure = EMeasure::Discrete;
        rec.eta = 1.0;

        RGBSpectrum::one()
    }

    fn eval(&self, _rec: &BSDFQueryRecord) -> RGBSpectrum {
        RGBSpectrum::zero()
    }

    fn pdf(&self, _rec: &BSDFQueryRecord) -> Float {
        0.0
    }
}
