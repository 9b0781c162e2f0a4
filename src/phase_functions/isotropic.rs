// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::Result;
use crate::core::phase::{PhaseFunction, PhaseFunctionQueryRecord};
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, INV_FOURPI, Vector2f};
use crate::math::warp::square_to_uniform_sphere;

#[derive(Default)]
pub struct Isotropic;

impl Isotropic {
    pub fn new() -> Self {
        Isotropic
    }

    pub fn from_properties(_props: &PropertyList) -> Result<Self> {
        Ok(Isotropic)
    }
}

impl ComputationNode for Isotropic {
    fn to_string(&self) -> String {
        String::from("Isotropic[]")
    }
}

impl PhaseFunction for Isotropic {
    fn sample(&self, rec: &mut PhaseFunctionQueryRecord, sample: &Vector2f) -> Float {
        rec.wo = square_to_uniform_sphere(sample);
        1.0
    }

    fn eval(&self, _rec: &PhaseFunctionQueryRecord) -> Float {
        INV_FOURPI
    }

    fn pdf(&self, _rec: &PhaseFunctionQueryRecord) -> Float {
        INV_FOURPI
    }
}
