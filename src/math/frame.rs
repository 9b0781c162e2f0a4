// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

/// Orthonormal basis; `n` is the local +z axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub s: Vector3f,
    pub t: Vector3f,
    pub n: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            s: Vector3f::new(1.0, 0.0, 0.0),
            t: Vector3f::new(0.0, 1.0, 0.0),
            n: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn new(s: Vector3f, t: Vector3f, n: Vector3f) -> Frame {
        Frame { s, t, n }
    }

    /// Builds a right-handed frame around a unit normal.
    pub fn from_normal(n: &Vector3f) -> Frame {
        let up = if n.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let s = n.cross(&up).normalize();
        let t = n.cross(&s);

        Frame { s, t, n: *n }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.s), v.dot(&self.t), v.dot(&self.n))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        v.x * self.s + v.y * self.t + v.z * self.n
    }

    pub fn cos_theta(v: &Vector3f) -> Float {
        v.z
    }

    pub fn sin_theta2(v: &Vector3f) -> Float {
        (1.0 - v.z * v.z).max(0.0)
    }

    pub fn tan_theta(v: &Vector3f) -> Float {
        let sin_theta = Frame::sin_theta2(v).sqrt();
        if v.z == 0.0 {
            return 0.0;
        }
        sin_theta / v.z
    }
}
