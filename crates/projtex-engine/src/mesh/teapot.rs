use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use super::teapot_data::{CONTROL_POINTS, MIRRORED_XY, PATCHES};
use super::{Mesh, MeshError};

/// Number of Bézier patches in the assembled teapot.
pub const TEAPOT_PATCH_COUNT: usize = MIRRORED_XY * 4 + (PATCHES.len() - MIRRORED_XY) * 2;

/// Parameter offset used when a patch pole makes the surface derivative vanish.
const POLE_NUDGE: f32 = 1.0e-3;

/// Tessellates the Newell teapot.
///
/// Each of the [`TEAPOT_PATCH_COUNT`] patches is sampled on a
/// `(grid+1) × (grid+1)` parameter grid, giving `32·(grid+1)²` vertices and
/// `64·grid²` triangles. The teapot is Z-up and about 3.15 units tall.
///
/// `transform` is applied to positions; normals use its inverse transpose.
pub fn teapot(grid: u32, transform: &Matrix4<f32>) -> Result<Mesh, MeshError> {
    if grid == 0 {
        return Err(MeshError::ZeroDivisions { what: "teapot grid" });
    }

    let side = grid as usize + 1;
    let per_patch = side * side;
    let vertex_count = per_patch
        .checked_mul(TEAPOT_PATCH_COUNT)
        .ok_or(MeshError::TooManyVertices(usize::MAX))?;
    if u32::try_from(vertex_count).is_err() {
        return Err(MeshError::TooManyVertices(vertex_count));
    }

    let normal_matrix = transform
        .fixed_view::<3, 3>(0, 0)
        .into_owned()
        .try_inverse()
        .map(|m| m.transpose())
        .unwrap_or_else(Matrix3::identity);

    let mut builder = PatchBuilder {
        grid,
        transform,
        normal_matrix,
        positions:  Vec::with_capacity(vertex_count),
        normals:    Vec::with_capacity(vertex_count),
        tex_coords: Vec::with_capacity(vertex_count),
        indices:    Vec::with_capacity(TEAPOT_PATCH_COUNT * grid as usize * grid as usize * 6),
    };

    for (i, patch) in PATCHES.iter().enumerate() {
        let base = control_points(patch);

        builder.push(&base, Mirror::None);
        builder.push(&base, Mirror::Y);
        if i < MIRRORED_XY {
            builder.push(&base, Mirror::X);
            builder.push(&base, Mirror::XY);
        }
    }

    let PatchBuilder { positions, normals, tex_coords, indices, .. } = builder;
    Mesh::from_parts(positions, normals, tex_coords, indices)
}

type Patch = [[Vector3<f32>; 4]; 4];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mirror {
    None,
    X,
    Y,
    XY,
}

impl Mirror {
    fn scale(self) -> Vector3<f32> {
        match self {
            Mirror::None => Vector3::new(1.0, 1.0, 1.0),
            Mirror::X => Vector3::new(-1.0, 1.0, 1.0),
            Mirror::Y => Vector3::new(1.0, -1.0, 1.0),
            Mirror::XY => Vector3::new(-1.0, -1.0, 1.0),
        }
    }

    /// A single reflection reverses orientation.
    fn flips_orientation(self) -> bool {
        matches!(self, Mirror::X | Mirror::Y)
    }
}

fn control_points(patch: &[usize; 16]) -> Patch {
    let mut p = [[Vector3::zeros(); 4]; 4];
    for (k, &idx) in patch.iter().enumerate() {
        let [x, y, z] = CONTROL_POINTS[idx];
        p[k / 4][k % 4] = Vector3::new(x, y, z);
    }
    p
}

struct PatchBuilder<'a> {
    grid:          u32,
    transform:     &'a Matrix4<f32>,
    normal_matrix: Matrix3<f32>,

    positions:  Vec<[f32; 3]>,
    normals:    Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    indices:    Vec<u32>,
}

impl PatchBuilder<'_> {
    fn push(&mut self, base: &Patch, mirror: Mirror) {
        let scale = mirror.scale();
        let mut patch = *base;
        for row in patch.iter_mut() {
            for p in row.iter_mut() {
                *p = p.component_mul(&scale);
            }
        }

        let flip = mirror.flips_orientation();
        // Bounded by the u32 check in `teapot`.
        let first = self.positions.len() as u32;
        let g = self.grid;
        let step = 1.0 / g as f32;

        for i in 0..=g {
            let u = i as f32 * step;
            for j in 0..=g {
                let v = j as f32 * step;

                let pos = eval(&patch, u, v);
                let mut n = surface_normal(&patch, u, v);
                if flip {
                    n = -n;
                }

                let pos = self.transform.transform_point(&Point3::from(pos));
                let n = (self.normal_matrix * n)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::z);

                self.positions.push([pos.x, pos.y, pos.z]);
                self.normals.push([n.x, n.y, n.z]);
                self.tex_coords.push([u, v]);
            }
        }

        let side = g + 1;
        for i in 0..g {
            for j in 0..g {
                let a = first + i * side + j;
                let b = first + (i + 1) * side + j;
                let c = b + 1;
                let d = a + 1;
                if flip {
                    self.indices.extend_from_slice(&[a, c, b, a, d, c]);
                } else {
                    self.indices.extend_from_slice(&[a, b, c, a, c, d]);
                }
            }
        }
    }
}

/// Cubic Bernstein basis and its derivative at `t`.
fn bernstein(t: f32) -> ([f32; 4], [f32; 4]) {
    let s = 1.0 - t;
    let b = [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t];
    let d = [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * t * s,
        6.0 * t * s - 3.0 * t * t,
        3.0 * t * t,
    ];
    (b, d)
}

/// Rows are the `v` direction, columns the `u` direction.
fn eval(patch: &Patch, u: f32, v: f32) -> Vector3<f32> {
    let (bu, _) = bernstein(u);
    let (bv, _) = bernstein(v);
    let mut p = Vector3::zeros();
    for r in 0..4 {
        for c in 0..4 {
            p += patch[r][c] * (bv[r] * bu[c]);
        }
    }
    p
}

fn partials(patch: &Patch, u: f32, v: f32) -> (Vector3<f32>, Vector3<f32>) {
    let (bu, du) = bernstein(u);
    let (bv, dv) = bernstein(v);
    let mut pu = Vector3::zeros();
    let mut pv = Vector3::zeros();
    for r in 0..4 {
        for c in 0..4 {
            pu += patch[r][c] * (bv[r] * du[c]);
            pv += patch[r][c] * (dv[r] * bu[c]);
        }
    }
    (pu, pv)
}

/// Outward unit normal (`∂u × ∂v`) of an unmirrored patch.
fn surface_normal(patch: &Patch, u: f32, v: f32) -> Vector3<f32> {
    let (pu, pv) = partials(patch, u, v);
    if let Some(n) = pu.cross(&pv).try_normalize(1.0e-6) {
        return n;
    }

    // Collapsed edge (lid apex, bottom center): sample just inside the patch.
    let u = u.clamp(POLE_NUDGE, 1.0 - POLE_NUDGE);
    let v = v.clamp(POLE_NUDGE, 1.0 - POLE_NUDGE);
    let (pu, pv) = partials(patch, u, v);
    pu.cross(&pv)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn patch_count_is_thirty_two() {
        assert_eq!(TEAPOT_PATCH_COUNT, 32);
    }

    #[test]
    fn attribute_arrays_agree_and_indices_in_bounds() {
        let m = teapot(14, &identity()).unwrap();
        let n = m.vertex_count();
        assert_eq!(n, 32 * 15 * 15);
        assert_eq!(m.normals().len(), n);
        assert_eq!(m.tex_coords().len(), n);
        assert_eq!(m.triangle_count(), 32 * 14 * 14 * 2);
        assert!(m.indices().iter().all(|&i| (i as usize) < n));
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(teapot(4, &identity()).unwrap(), teapot(4, &identity()).unwrap());
    }

    #[test]
    fn rejects_zero_grid() {
        assert!(matches!(teapot(0, &identity()), Err(MeshError::ZeroDivisions { .. })));
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn normals_are_unit_length() {
        let m = teapot(6, &identity()).unwrap();
        for n in m.normals() {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1.0e-4);
        }
    }

    #[test]
    fn bounds_match_newell_teapot() {
        let m = teapot(8, &identity()).unwrap();
        let (mut zmin, mut zmax) = (f32::MAX, f32::MIN);
        for p in m.positions() {
            zmin = zmin.min(p[2]);
            zmax = zmax.max(p[2]);
        }
        assert_relative_eq!(zmin, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(zmax, 3.15, epsilon = 1.0e-5);
    }

    #[test]
    fn lid_apex_normal_points_up() {
        let m = teapot(4, &identity()).unwrap();
        let apex = m
            .positions()
            .iter()
            .position(|p| (p[2] - 3.15).abs() < 1.0e-6 && p[0].abs() < 1.0e-6 && p[1].abs() < 1.0e-6)
            .unwrap();
        assert!(m.normals()[apex][2] > 0.99);
    }

    #[test]
    fn body_normals_point_away_from_axis() {
        let m = teapot(8, &identity()).unwrap();
        // Widest band of the body, away from handle and spout.
        for (p, n) in m.positions().iter().zip(m.normals()) {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            if (p[2] - 1.2).abs() < 0.2 && r > 1.9 && p[1].abs() > 1.0 {
                assert!(p[0] * n[0] + p[1] * n[1] > 0.0, "inward normal at {p:?}");
            }
        }
    }

    #[test]
    fn transform_moves_positions() {
        let t = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -1.0));
        let a = teapot(2, &identity()).unwrap();
        let b = teapot(2, &t).unwrap();
        for (pa, pb) in a.positions().iter().zip(b.positions()) {
            assert_relative_eq!(pb[2], pa[2] - 1.0, epsilon = 1.0e-5);
        }
        assert_eq!(a.normals(), b.normals());
    }
}
