// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{beckmann_ndf, square_to_beckmann};

/// Beckmann distribution of microfacet normals. `m` is in the local frame.
pub fn beckmann_d(m: &Vector3f, alpha: Float) -> Float {
    beckmann_ndf(m.z, alpha)
}

/// Smith shadowing for one direction, rational approximation of the
/// Beckmann masking term. Zero when `wv` sees the back of `wh`.
pub fn beckmann_g1(wv: &Vector3f, wh: &Vector3f, alpha: Float) -> Float {
    if wv.z == 0.0 {
        return 0.0;
    }
    let c = wv.dot(wh) / wv.z;
    if c <= 0.0 {
        return 0.0;
    }

    let tan_theta = Frame::tan_theta(wv).abs();
    if tan_theta == 0.0 {
        return 1.0;
    }
    let b = 1.0 / (alpha * tan_theta);
    if b >= 1.6 {
        return 1.0;
    }
    let b2 = b * b;
    (3.535 * b + 2.181 * b2) / (1.0 + 2.276 * b + 2.577 * b2)
}

pub fn beckmann_g(wi: &Vector3f, wo: &Vector3f, wh: &Vector3f, alpha: Float) -> Float {
    beckmann_g1(wi, wh, alpha) * beckmann_g1(wo, wh, alpha)
}

pub fn sample_beckmann(u: &Vector2f, alpha: Float) -> Vector3f {
    square_to_beckmann(u, alpha)
}

/// Density of the half vector, D(m) cos(theta_m).
pub fn beckmann_pdf(m: &Vector3f, alpha: Float) -> Float {
    beckmann_d(m, alpha) * m.z
}

pub fn reflect(wi: &Vector3f, m: &Vector3f) -> Vector3f {
    2.0 * wi.dot(m) * m - wi
}

/// Refraction of `wi` through a facet with normal `m`, on the side `wi`
/// lies on. `eta` is eta_i / eta_t. None on total internal reflection.
pub fn refract(wi: &Vector3f, m: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = wi.dot(m).max(-1.0).min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let wt = -eta * wi + (eta * cos_i - cos_t.copysign(cos_i)) * m;
    Some(wt)
}

pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_i = cos_i.max(-1.0).min(1.0);
    let entering = cos_i > 0.0;
    let (eta_i, eta_t) = if entering { (eta_i, eta_t) } else { (eta_t, eta_i) };
    cos_i = cos_i.abs();

    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

pub fn fresnel_schlick(f0: RGBSpectrum, cos_theta: Float) -> RGBSpectrum {
    let cos_theta = cos_theta.max(0.0).min(1.0);
    let one_minus = (1.0 - cos_theta).powi(5);
    f0 + (RGBSpectrum::one() - f0) * one_minus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresnel_limits() {
        // Normal incidence on glass: ((1 - 1.5) / (1 + 1.5))^2.
        assert!((fresnel_dielectric(1.0, 1.0, 1.5) - 0.04).abs() < 1e-4);
        assert!((fresnel_dielectric(-1.0, 1.0, 1.5) - 0.04).abs() < 1e-4);
        // Grazing from inside the denser medium is totally reflected.
        assert_eq!(fresnel_dielectric(-0.1, 1.0, 1.5), 1.0);
        assert!((fresnel_dielectric(1e-4, 1.0, 1.5) - 1.0).abs() < 1e-2);

        let f0 = RGBSpectrum::splat(0.5);
        assert_eq!(fresnel_schlick(f0, 1.0), f0);
        assert_eq!(fresnel_schlick(f0, 0.0), RGBSpectrum::one());
    }

    #[test]
    fn test_reflect_and_refract() {
        let m = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        assert!((reflect(&wi, &m) - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);

        // Snell: sin_t = sin_i * eta.
        let eta = 1.0 / 1.5;
        let wt = refract(&wi, &m, eta).unwrap();
        assert!((wt.norm() - 1.0).abs() < 1e-5);
        assert!(wt.z < 0.0);
        assert!((wt.x.abs() - 0.6 * eta).abs() < 1e-5);

        // Leaving glass at a steep angle.
        let inside = Vector3f::new(0.9, 0.0, -(1.0f32 - 0.81).sqrt());
        assert!(refract(&inside, &m, 1.5).is_none());
        let exit = refract(&Vector3f::new(0.3, 0.0, -(1.0f32 - 0.09).sqrt()), &m, 1.5).unwrap();
        assert!(exit.z > 0.0);
    }

    #[test]
    fn test_shadowing_bounds() {
        let alpha = 0.3;
        let up = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(beckmann_g1(&up, &up, alpha), 1.0);

        let grazing = Vector3f::new(0.999, 0.0, (1.0f32 - 0.998).sqrt()).normalize();
        let g = beckmann_g1(&grazing, &up, alpha);
        assert!(g > 0.0 && g < 0.5);

        // Facet turned away from the viewing direction.
        let wv = Vector3f::new(0.6, 0.0, 0.8);
        let back_facet = Vector3f::new(-0.96, 0.0, 0.28);
        assert_eq!(beckmann_g1(&wv, &back_facet, alpha), 0.0);
    }
}
