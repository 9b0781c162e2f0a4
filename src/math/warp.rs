// Copyright @yucwang 2023

//! Mappings from the unit square to canonical domains together with the
//! density of each mapping. Densities are with respect to area for planar
//! domains and solid angle for directions, and are zero off the support.

use super::constants::{ Float, Vector2f, Vector3f, INV_FOURPI, INV_PI, INV_TWOPI, PI };

fn clamp_unit(v: Float) -> Float {
    v.max(-1.0).min(1.0)
}

fn spherical_direction(cos_theta: Float, phi: Float) -> Vector3f {
    let cos_theta = clamp_unit(cos_theta);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector3f::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

pub fn square_to_uniform_square(sample: &Vector2f) -> Vector2f {
    *sample
}

pub fn square_to_uniform_square_pdf(p: &Vector2f) -> Float {
    if p.x >= 0.0 && p.x <= 1.0 && p.y >= 0.0 && p.y <= 1.0 {
        1.0
    } else {
        0.0
    }
}

/// Folds the upper half of the square onto the lower-left right triangle.
/// The result doubles as the barycentric weights of vertices 1 and 2.
pub fn square_to_uniform_triangle(sample: &Vector2f) -> Vector2f {
    if sample.x + sample.y > 1.0 {
        Vector2f::new(1.0 - sample.x, 1.0 - sample.y)
    } else {
        *sample
    }
}

pub fn square_to_uniform_triangle_pdf(p: &Vector2f) -> Float {
    if p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 {
        2.0
    } else {
        0.0
    }
}

pub fn square_to_uniform_disk(sample: &Vector2f) -> Vector2f {
    let r = sample.x.max(0.0).sqrt();
    let (sin_theta, cos_theta) = (2.0 * PI * sample.y).sin_cos();

    Vector2f::new(r * cos_theta, r * sin_theta)
}

pub fn square_to_uniform_disk_pdf(p: &Vector2f) -> Float {
    if p.norm_squared() <= 1.0 {
        INV_PI
    } else {
        0.0
    }
}

pub fn square_to_uniform_sphere(sample: &Vector2f) -> Vector3f {
    spherical_direction(1.0 - 2.0 * sample.x, 2.0 * PI * sample.y)
}

pub fn square_to_uniform_sphere_pdf(_v: &Vector3f) -> Float {
    INV_FOURPI
}

pub fn square_to_uniform_hemisphere(sample: &Vector2f) -> Vector3f {
    spherical_direction((1.0 - 2.0 * sample.x).abs(), 2.0 * PI * sample.y)
}

pub fn square_to_uniform_hemisphere_pdf(v: &Vector3f) -> Float {
    if v.z >= 0.0 {
        INV_TWOPI
    } else {
        0.0
    }
}

/// Malley's method: sin(theta) = sqrt(u).
pub fn square_to_cosine_hemisphere(sample: &Vector2f) -> Vector3f {
    let cos_theta = (1.0 - sample.x).max(0.0).sqrt();
    spherical_direction(cos_theta, 2.0 * PI * sample.y)
}

pub fn square_to_cosine_hemisphere_pdf(v: &Vector3f) -> Float {
    if v.z >= 0.0 {
        v.z * INV_PI
    } else {
        0.0
    }
}

/// Beckmann distribution of microfacet normals, D(m), for a normal with
/// `cos_theta` against the macro surface normal.
pub fn beckmann_ndf(cos_theta: Float, alpha: Float) -> Float {
    if cos_theta <= 1e-6 {
        return 0.0;
    }
    let alpha2 = alpha * alpha;
    let cos2 = cos_theta * cos_theta;
    let tan2 = (1.0 - cos2).max(0.0) / cos2;

    (-tan2 / alpha2).exp() / (PI * alpha2 * cos2 * cos2)
}

pub fn square_to_beckmann(sample: &Vector2f, alpha: Float) -> Vector3f {
    let log_term = (1.0 - sample.x).max(Float::MIN_POSITIVE).ln();
    let tan2 = -alpha * alpha * log_term;
    let cos_theta = 1.0 / (1.0 + tan2).sqrt();

    spherical_direction(cos_theta, 2.0 * PI * sample.y)
}

/// Solid-angle density of `square_to_beckmann`: D(m) cos(theta_m).
pub fn square_to_beckmann_pdf(m: &Vector3f, alpha: Float) -> Float {
    if m.z <= 0.0 {
        return 0.0;
    }
    beckmann_ndf(m.z, alpha) * m.z
}
