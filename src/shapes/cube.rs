// Copyright @yucwang 2026

use super::triangle_mesh::Mesh;

use crate::math::constants::Vector3f;

impl Mesh {
    /// Axis-aligned box made of twelve triangles. Face normals point out of
    /// the box, or into it when `inward` is set (a closed room).
    pub fn cube(name: &str, p_min: Vector3f, p_max: Vector3f, inward: bool) -> Mesh {
        let corner = |i: usize| Vector3f::new(
            if i & 1 == 0 { p_min.x } else { p_max.x },
            if i & 2 == 0 { p_min.y } else { p_max.y },
            if i & 4 == 0 { p_min.z } else { p_max.z },
        );
        let positions: Vec<Vector3f> = (0..8).map(corner).collect();

        // Quads wound counter-clockwise seen from outside.
        let quads: [[usize; 4]; 6] = [
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
        ];

        let mut faces = Vec::with_capacity(12);
        for q in quads.iter() {
            if inward {
                faces.push([q[0], q[2], q[1]]);
                faces.push([q[0], q[3], q[2]]);
            } else {
                faces.push([q[0], q[1], q[2]]);
                faces.push([q[0], q[2], q[3]]);
            }
        }

        Mesh::new(name, positions, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_normals() {
        let p_min = Vector3f::new(-1.0, -1.0, -1.0);
        let p_max = Vector3f::new(1.0, 1.0, 1.0);

        for &inward in &[false, true] {
            let mut cube = Mesh::cube("box", p_min, p_max, inward);
            cube.activate().unwrap();
            assert_eq!(cube.face_count(), 12);
            assert!((cube.total_area() - 24.0).abs() < 1e-4);

            for face in 0..cube.face_count() {
                let n = cube.triangle(face).geometric_normal();
                let outward = n.dot(&cube.centroid(face)) > 0.0;
                assert_eq!(outward, !inward);
            }
        }
    }
}
