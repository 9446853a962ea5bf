use super::{Mesh, MeshError};

/// Builds a flat grid in the XZ plane, centered at the origin, facing +Y.
///
/// `xsize`/`zsize` are the full extents; `xdivs`/`zdivs` the number of cells
/// along each axis. Produces `(xdivs+1)(zdivs+1)` vertices and
/// `2 · xdivs · zdivs` triangles, counter-clockwise seen from above.
pub fn plane(xsize: f32, zsize: f32, xdivs: u32, zdivs: u32) -> Result<Mesh, MeshError> {
    check_extent("plane width", xsize)?;
    check_extent("plane depth", zsize)?;
    if xdivs == 0 {
        return Err(MeshError::ZeroDivisions { what: "plane x subdivisions" });
    }
    if zdivs == 0 {
        return Err(MeshError::ZeroDivisions { what: "plane z subdivisions" });
    }

    let cols = xdivs as usize + 1;
    let rows = zdivs as usize + 1;
    let vertex_count = cols
        .checked_mul(rows)
        .ok_or(MeshError::TooManyVertices(usize::MAX))?;
    if u32::try_from(vertex_count).is_err() {
        return Err(MeshError::TooManyVertices(vertex_count));
    }

    let x2 = xsize / 2.0;
    let z2 = zsize / 2.0;
    let dx = xsize / xdivs as f32;
    let dz = zsize / zdivs as f32;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);

    for i in 0..rows {
        let z = dz * i as f32 - z2;
        for j in 0..cols {
            let x = dx * j as f32 - x2;
            positions.push([x, 0.0, z]);
            tex_coords.push([j as f32 / xdivs as f32, i as f32 / zdivs as f32]);
        }
    }

    let normals = vec![[0.0, 1.0, 0.0]; vertex_count];

    let mut indices = Vec::with_capacity(xdivs as usize * zdivs as usize * 6);
    for i in 0..zdivs {
        let row = i * (xdivs + 1);
        let next = (i + 1) * (xdivs + 1);
        for j in 0..xdivs {
            indices.extend_from_slice(&[
                row + j,
                next + j,
                next + j + 1,
                row + j,
                next + j + 1,
                row + j + 1,
            ]);
        }
    }

    Mesh::from_parts(positions, normals, tex_coords, indices)
}

fn check_extent(what: &'static str, value: f32) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidExtent { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn single_cell_has_four_vertices_two_triangles() {
        let m = plane(100.0, 100.0, 1, 1).unwrap();
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangle_count(), 2);
        assert_eq!(m.indices().len(), 6);
        assert!(m.indices().iter().all(|&i| i <= 3));
    }

    #[test]
    fn single_cell_counts_independent_of_extent() {
        for (w, h) in [(1.0, 1.0), (3.5, 0.25), (1000.0, 2.0)] {
            let m = plane(w, h, 1, 1).unwrap();
            assert_eq!(m.vertex_count(), 4);
            assert_eq!(m.indices().len(), 6);
        }
    }

    #[test]
    fn grid_counts_scale_with_divisions() {
        let m = plane(10.0, 4.0, 5, 3).unwrap();
        assert_eq!(m.vertex_count(), 6 * 4);
        assert_eq!(m.triangle_count(), 2 * 5 * 3);
        assert_eq!(m.normals().len(), m.vertex_count());
        assert_eq!(m.tex_coords().len(), m.vertex_count());
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn corners_span_the_requested_extent() {
        let m = plane(100.0, 40.0, 1, 1).unwrap();
        assert_eq!(m.positions()[0], [-50.0, 0.0, -20.0]);
        assert_eq!(m.positions()[3], [50.0, 0.0, 20.0]);
        assert_eq!(m.tex_coords()[0], [0.0, 0.0]);
        assert_eq!(m.tex_coords()[3], [1.0, 1.0]);
    }

    #[test]
    fn triangles_face_up() {
        let m = plane(2.0, 2.0, 2, 2).unwrap();
        let p = m.positions();
        for t in m.indices().chunks_exact(3) {
            let (a, b, c) = (p[t[0] as usize], p[t[1] as usize], p[t[2] as usize]);
            let n = cross(sub(b, a), sub(c, a));
            assert!(n[1] > 0.0, "triangle {t:?} faces down");
        }
        assert!(m.normals().iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    // ── invalid parameters ────────────────────────────────────────────────

    #[test]
    fn rejects_zero_divisions() {
        assert!(matches!(plane(1.0, 1.0, 0, 1), Err(MeshError::ZeroDivisions { .. })));
        assert!(matches!(plane(1.0, 1.0, 1, 0), Err(MeshError::ZeroDivisions { .. })));
    }

    #[test]
    fn rejects_negative_or_nan_extent() {
        assert!(matches!(plane(-1.0, 1.0, 1, 1), Err(MeshError::InvalidExtent { .. })));
        assert!(matches!(plane(1.0, f32::NAN, 1, 1), Err(MeshError::InvalidExtent { .. })));
        assert!(matches!(plane(0.0, 1.0, 1, 1), Err(MeshError::InvalidExtent { .. })));
    }
}
