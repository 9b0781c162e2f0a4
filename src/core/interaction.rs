// Copyright @yucwang 2023

use crate::core::scene::{MediumId, MeshId};
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::frame::Frame;

/// Result of a closest-hit query. Produced fresh per query and read-only
/// afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub p: Vector3f,
    pub t: Float,
    pub uv: Vector2f,
    /// Frame around the interpolated vertex normal.
    pub sh_frame: Frame,
    /// Frame around the true face normal.
    pub geo_frame: Frame,
    pub mesh: MeshId,
    pub face: usize,
    pub medium: Option<MediumId>,
}

impl Intersection {
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        self.sh_frame.to_local(v)
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.sh_frame.to_world(v)
    }
}
