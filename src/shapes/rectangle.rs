// Copyright @yucwang 2026

use super::triangle_mesh::Mesh;

use crate::math::constants::{Vector2f, Vector3f};

impl Mesh {
    /// Parallelogram centred at `center` spanning `center +- half_u +- half_v`.
    /// The face normal is `half_u x half_v`.
    pub fn rectangle(name: &str, center: Vector3f, half_u: Vector3f, half_v: Vector3f) -> Mesh {
        let positions = vec![
            center - half_u - half_v,
            center + half_u - half_v,
            center + half_u + half_v,
            center - half_u + half_v,
        ];
        let uvs = vec![
            Vector2f::new(0.0, 0.0),
            Vector2f::new(1.0, 0.0),
            Vector2f::new(1.0, 1.0),
            Vector2f::new(0.0, 1.0),
        ];

        Mesh::new(name, positions, vec![[0, 1, 2], [0, 2, 3]]).with_uvs(uvs)
    }
}
