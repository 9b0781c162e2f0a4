// Copyright @yucwang 2021

pub mod core;
pub mod densities;
pub mod emitters;
pub mod integrators;
pub mod materials;
pub mod math;
pub mod media;
pub mod phase_functions;
pub mod renderers;
pub mod shapes;
