// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::density::{DensityFunction, DensitySample};
use crate::core::error::Result;
use crate::core::properties::PropertyList;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Fractal value noise. Each octave doubles the frequency and scales the
/// amplitude by `persistence`; the sum is normalized back to [0, 1].
pub struct PerlinDensity {
    frequency: Float,
    octaves: u32,
    persistence: Float,
    seed: i64,
    color_a: RGBSpectrum,
    color_b: RGBSpectrum,
}

fn hermite(t: Float) -> Float {
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: Float, b: Float, t: Float) -> Float {
    a * (1.0 - t) + b * t
}

/// Pseudo-random value in [0, 1) attached to a lattice point.
fn lattice_value(x: Float, y: Float, z: Float) -> Float {
    let h = (x * 12.9898 + y * 78.233 + z * 45.543).sin() * 43758.5453;
    (h - h.floor()).max(0.0).min(1.0)
}

impl PerlinDensity {
    pub fn new(frequency: Float, octaves: u32, persistence: Float, seed: i64) -> Self {
        Self {
            frequency,
            octaves: octaves.max(1),
            persistence,
            seed,
            color_a: RGBSpectrum::one(),
            color_b: RGBSpectrum::one(),
        }
    }

    pub fn with_colors(mut self, color_a: RGBSpectrum, color_b: RGBSpectrum) -> Self {
        self.color_a = color_a;
        self.color_b = color_b;
        self
    }

    pub fn from_properties(props: &PropertyList) -> Result<Self> {
        let octaves = props.get_integer("octaves", 1)?.max(1) as u32;
        Ok(Self::new(props.get_float("frequency", 1.0)?,
                     octaves,
                     props.get_float("persistence", 1.0)?,
                     props.get_integer("seed", 0)?)
           .with_colors(props.get_color("colorA", RGBSpectrum::one())?,
                        props.get_color("colorB", RGBSpectrum::one())?))
    }

    fn noise(&self, p: &Vector3f, frequency: Float) -> Float {
        let offset = self.seed as Float * 113.0;
        let v = p * frequency + Vector3f::repeat(offset);

        let (x0, y0, z0) = (v.x.floor(), v.y.floor(), v.z.floor());
        let fx = hermite(v.x - x0);
        let fy = hermite(v.y - y0);
        let fz = hermite(v.z - z0);

        let c = |dx: Float, dy: Float, dz: Float| lattice_value(x0 + dx, y0 + dy, z0 + dz);
        let x00 = mix(c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), fx);
        let x10 = mix(c(0.0, 1.0, 0.0), c(1.0, 1.0, 0.0), fx);
        let x01 = mix(c(0.0, 0.0, 1.0), c(1.0, 0.0, 1.0), fx);
        let x11 = mix(c(0.0, 1.0, 1.0), c(1.0, 1.0, 1.0), fx);

        mix(mix(x00, x10, fy), mix(x01, x11, fy), fz)
    }

    pub fn fractal_noise(&self, p: &Vector3f) -> Float {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut frequency = self.frequency;
        for _ in 0..self.octaves {
            total += amplitude;
            value += self.noise(p, frequency) * amplitude;
            frequency *= 2.0;
            amplitude *= self.persistence;
        }
        if total <= 0.0 {
            return 0.0;
        }
        (value / total).max(0.0).min(1.0)
    }
}

impl ComputationNode for PerlinDensity {
    fn to_string(&self) -> String {
        format!("PerlinDensity[frequency = {}, octaves = {}, persistence = {}, seed = {}]",
                self.frequency, self.octaves, self.persistence, self.seed)
    }
}

impl DensityFunction for PerlinDensity {
    fn eval(&self, p: &Vector3f) -> DensitySample {
        let density = self.fractal_noise(p);
        DensitySample {
            density,
            color: self.color_a * (1.0 - density) + self.color_b * density,
        }
    }

    fn max_density(&self) -> Float {
        1.0
    }
}
