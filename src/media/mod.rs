// Copyright @yucwang 2026

pub mod heterogeneous_medium;
pub mod homogeneous_medium;
