// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::density::{DensityFunction, DensitySample};
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct ConstantDensity {
    density: Float,
    color: RGBSpectrum,
}

impl ConstantDensity {
    pub fn new(density: Float, color: RGBSpectrum) -> Self {
        Self { density: density.max(0.0), color }
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        Ok(Self::new(props.get_float("density", 1.0)?,
                     props.get_color("color", RGBSpectrum::one())?))
    }
}

impl ComputationNode for ConstantDensity {
    fn to_string(&self) -> String {
        format!("ConstantDensity[density = {}, color = {:?}]", self.density, self.color)
    }
}

impl DensityFunction for ConstantDensity {
    fn eval(&self, _p: &Vector3f) -> DensitySample {
        DensitySample { density: self.density, color: self.color }
    }

    fn max_density(&self) -> Float {
        self.density
    }
}
