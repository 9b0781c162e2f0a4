// Copyright @yucwang 2021

use crate::core::bsdf::BSDF;
use crate::core::density::DensityFunction;
use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::medium::Medium;
use crate::core::phase::PhaseFunction;

pub trait ComputationNode {
    // Output string for a single computation node.
    fn to_string(&self) -> String;
}

/// Any object the registry can produce, tagged with the role it plays.
pub enum SceneNode {
    BSDF(Box<dyn BSDF>),
    Emitter(Box<dyn Emitter>),
    Medium(Box<dyn Medium>),
    PhaseFunction(Box<dyn PhaseFunction>),
    Density(Box<dyn DensityFunction>),
    Integrator(Box<dyn Integrator>),
}

impl SceneNode {
    pub fn class_name(&self) -> &'static str {
        match self {
            SceneNode::BSDF(_) => "bsdf",
            SceneNode::Emitter(_) => "emitter",
            SceneNode::Medium(_) => "medium",
            SceneNode::PhaseFunction(_) => "phase function",
            SceneNode::Density(_) => "density function",
            SceneNode::Integrator(_) => "integrator",
        }
    }
}

impl ComputationNode for SceneNode {
    fn to_string(&self) -> String {
        match self {
            SceneNode::BSDF(node) => node.to_string(),
            SceneNode::Emitter(node) => node.to_string(),
            SceneNode::Medium(node) => node.to_string(),
            SceneNode::PhaseFunction(node) => node.to_string(),
            SceneNode::Density(node) => node.to_string(),
            SceneNode::Integrator(node) => node.to_string(),
        }
    }
}
