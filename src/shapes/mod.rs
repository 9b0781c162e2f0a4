// Copyright @yucwang 2023

pub mod cube;
pub mod rectangle;
pub mod triangle;
pub mod triangle_mesh;
