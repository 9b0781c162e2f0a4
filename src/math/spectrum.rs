// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };

use std::ops;

/// Linear RGB triple used for radiance, throughput and reflectance alike.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::splat(1.0)
    }

    pub fn from_vector(v: &Vector3f) -> Self {
        Self { rgb: *v }
    }

    pub fn to_vector(&self) -> Vector3f {
        self.rgb
    }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|&c| c == 0.0)
    }

    pub fn has_nan(&self) -> bool {
        self.rgb.iter().any(|c| c.is_nan())
    }

    /// Finite and non-negative in every channel.
    pub fn is_valid(&self) -> bool {
        self.rgb.iter().all(|&c| c.is_finite() && c >= 0.0)
    }

    pub fn max_coeff(&self) -> Float {
        self.rgb.x.max(self.rgb.y).max(self.rgb.z)
    }

    pub fn average(&self) -> Float {
        (self.rgb.x + self.rgb.y + self.rgb.z) / 3.0
    }

    pub fn luminance(&self) -> Float {
        0.212671 * self.rgb.x + 0.715160 * self.rgb.y + 0.072169 * self.rgb.z
    }

    pub fn exp(&self) -> Self {
        Self::new(self.rgb.x.exp(), self.rgb.y.exp(), self.rgb.z.exp())
    }

    pub fn clamp(&self, lo: Float, hi: Float) -> Self {
        Self::new(self.rgb.x.clamp(lo, hi), self.rgb.y.clamp(lo, hi), self.rgb.z.clamp(lo, hi))
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, idx: usize) -> &Float {
        &self.rgb[idx]
    }
}

impl ops::IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, idx: usize) -> &mut Float {
        &mut self.rgb[idx]
    }
}

impl ops::Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb + rhs.rgb }
    }
}

impl ops::AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb += rhs.rgb;
    }
}

impl ops::Sub for RGBSpectrum {
    type Output = RGBSpectrum;

    fn sub(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb - rhs.rgb }
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb.component_mul(&rhs.rgb) }
    }
}

impl ops::MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb.component_mul_assign(&rhs.rgb);
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb * rhs }
    }
}

impl ops::Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: rhs.rgb * self }
    }
}

impl ops::MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        self.rgb *= rhs;
    }
}

impl ops::Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn div(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb / rhs }
    }
}

impl ops::DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, rhs: Float) {
        self.rgb /= rhs;
    }
}

impl ops::Div for RGBSpectrum {
    type Output = RGBSpectrum;

    fn div(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb.component_div(&rhs.rgb) }
    }
}

impl ops::Neg for RGBSpectrum {
    type Output = RGBSpectrum;

    fn neg(self) -> RGBSpectrum {
        RGBSpectrum { rgb: -self.rgb }
    }
}

impl std::iter::Sum for RGBSpectrum {
    fn sum<I: Iterator<Item = RGBSpectrum>>(iter: I) -> RGBSpectrum {
        iter.fold(RGBSpectrum::zero(), |acc, s| acc + s)
    }
}

/* Tests for RGBSpectrum */
