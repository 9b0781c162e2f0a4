// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, Vector2f, Vector3f};

/// World-space directions. `wi` is the direction the arriving light
/// travels in, `wo` the scattered direction, so forward scattering means
/// `wi.dot(wo)` close to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseFunctionQueryRecord {
    pub wi: Vector3f,
    pub wo: Vector3f,
}

impl PhaseFunctionQueryRecord {
    pub fn new(wi: Vector3f) -> Self {
        Self { wi, wo: Vector3f::zeros() }
    }

    pub fn with_directions(wi: Vector3f, wo: Vector3f) -> Self {
        Self { wi, wo }
    }
}

pub trait PhaseFunction: ComputationNode + Send + Sync {
    /// Samples `rec.wo` and returns `eval / pdf`.
    fn sample(&self, rec: &mut PhaseFunctionQueryRecord, sample: &Vector2f) -> Float;

    fn eval(&self, rec: &PhaseFunctionQueryRecord) -> Float;

    fn pdf(&self, rec: &PhaseFunctionQueryRecord) -> Float;
}
