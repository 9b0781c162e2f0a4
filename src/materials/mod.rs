// Copyright @yucwang 2023

pub mod lambertian_diffuse;
pub mod microfacet;
pub mod mirror;
pub mod roughconductor;
pub mod roughdielectric;
pub mod roughsubstrate;
