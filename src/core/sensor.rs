// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

/// Camera contract consumed by the renderer. Concrete camera models live
/// outside this crate.
pub trait Sensor: Sync {
    /// Image size in pixels as (width, height).
    fn resolution(&self) -> (usize, usize);

    /// Primary ray through raster position `pixel_sample` (pixel units,
    /// origin at the top-left corner).
    fn sample_ray(&self, pixel_sample: &Vector2f, aperture_sample: &Vector2f) -> Ray3f;

    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
