// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensitySample {
    pub density: Float,
    pub color: RGBSpectrum,
}

/// Scalar field driving a heterogeneous medium.
pub trait DensityFunction: ComputationNode + Send + Sync {
    fn eval(&self, p: &Vector3f) -> DensitySample;

    /// Upper bound of `eval(p).density` over the whole domain.
    fn max_density(&self) -> Float;
}
