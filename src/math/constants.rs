/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;
pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
// Densities below this are treated as "cannot be sampled".
pub const PDF_EPSILON: Float = 1e-7;
pub const ONE_MINUS_EPSILON: Float = 1.0 - Float::EPSILON;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = std::f32::consts::FRAC_1_PI;
pub const INV_TWOPI: Float = 0.5 * std::f32::consts::FRAC_1_PI;
pub const INV_FOURPI: Float = 0.25 * std::f32::consts::FRAC_1_PI;

pub const FLOAT_MAX: Float = Float::MAX;
pub const FLOAT_MIN: Float = Float::MIN;
