// Copyright @yucwang 2021

pub mod bsdf;
pub mod computation_node;
pub mod density;
pub mod emitter;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod medium;
pub mod phase;
pub mod properties;
pub mod registry;
pub mod sampler;
pub mod scene;
pub mod sensor;
