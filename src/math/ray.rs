// Copyright 2020 @TwoCookingMice

use super::constants::{ EPSILON, FLOAT_MAX, Float, Vector3f };

/// A ray segment. Never mutated after construction: every bounce and
/// shadow test builds a fresh one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(EPSILON),
               max_t: max_t.unwrap_or(FLOAT_MAX) }
    }

    /// Shadow segment from `from` towards `to`, stopping short of both ends.
    pub fn segment(from: &Vector3f, to: &Vector3f) -> Self {
        let d = to - from;
        let dist = d.norm();
        Self::new(*from, d, Some(EPSILON), Some((dist - EPSILON).max(EPSILON)))
    }

    pub fn with_max_t(&self, max_t: Float) -> Self {
        Self { max_t, ..*self }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

/* Tests for Ray */
