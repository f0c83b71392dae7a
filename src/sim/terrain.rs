//! Terrain height field
//!
//! A square grid of displaced vertices centred on the origin, triangulated
//! the same way as the rendered mesh: each cell is split along the diagonal
//! from (x0, z1) to (x1, z0). Height queries interpolate inside the triangle
//! that contains the point, which is exactly where a downward ray would hit
//! the rendered surface.

use glam::Vec3;

use super::noise::PerlinNoise;

/// Surface point returned by a terrain query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub height: f32,
    /// Unit face normal, always pointing up (+Y)
    pub normal: Vec3,
}

/// Immutable terrain heightmap
#[derive(Debug, Clone)]
pub struct HeightField {
    size: f32,
    /// Segments per side (vertices per side = resolution + 1)
    resolution: u32,
    /// Row-major heights, `heights[iz * (resolution + 1) + ix]`
    heights: Vec<f32>,
}

impl HeightField {
    /// Build a field by evaluating `f(x, z)` at every grid vertex
    pub fn from_fn<F>(size: f32, resolution: u32, f: F) -> Self
    where
        F: Fn(f32, f32) -> f32,
    {
        let resolution = resolution.max(1);
        let verts = (resolution + 1) as usize;
        let half = size * 0.5;
        let seg = size / resolution as f32;

        let mut heights = Vec::with_capacity(verts * verts);
        for iz in 0..verts {
            let z = iz as f32 * seg - half;
            for ix in 0..verts {
                let x = ix as f32 * seg - half;
                heights.push(f(x, z));
            }
        }

        Self {
            size,
            resolution,
            heights,
        }
    }

    /// Generate the island terrain: two noise octaves scaled by `max_height`
    pub fn generate(noise: &PerlinNoise, size: f32, resolution: u32, max_height: f32) -> Self {
        let field = Self::from_fn(size, resolution, |x, z| {
            let (x, z) = (x as f64, z as f64);
            let h = noise.sample(x * 0.02, z * 0.02) * 0.12 + noise.sample(x * 0.05, z * 0.05) * 0.05;
            h as f32 * max_height
        });
        log::info!(
            "Terrain generated: {}x{} segments over {} units",
            field.resolution,
            field.resolution,
            field.size
        );
        field
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Vertex heights, row-major in Z
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at a grid vertex (clamped to the grid)
    pub fn vertex_height(&self, ix: u32, iz: u32) -> f32 {
        let verts = self.resolution + 1;
        let ix = ix.min(self.resolution);
        let iz = iz.min(self.resolution);
        self.heights[(iz * verts + ix) as usize]
    }

    /// Whether (x, z) lies over the generated mesh
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let half = self.size * 0.5;
        x.is_finite() && z.is_finite() && x.abs() <= half && z.abs() <= half
    }

    /// Surface elevation at (x, z); 0 outside the mesh
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.surface_at(x, z).map(|s| s.height).unwrap_or(0.0)
    }

    /// Elevation and face normal at (x, z), or `None` outside the mesh
    pub fn surface_at(&self, x: f32, z: f32) -> Option<SurfaceSample> {
        if !self.contains(x, z) {
            return None;
        }

        let half = self.size * 0.5;
        let seg = self.size / self.resolution as f32;
        let gx = (x + half) / seg;
        let gz = (z + half) / seg;

        let max_cell = self.resolution - 1;
        let ix = (gx.floor() as u32).min(max_cell);
        let iz = (gz.floor() as u32).min(max_cell);
        let u = (gx - ix as f32).clamp(0.0, 1.0);
        let v = (gz - iz as f32).clamp(0.0, 1.0);

        let h00 = self.vertex_height(ix, iz);
        let h10 = self.vertex_height(ix + 1, iz);
        let h01 = self.vertex_height(ix, iz + 1);
        let h11 = self.vertex_height(ix + 1, iz + 1);

        // Slopes per grid unit within the containing triangle
        let (height, dh_du, dh_dv) = if u + v <= 1.0 {
            let du = h10 - h00;
            let dv = h01 - h00;
            (h00 + u * du + v * dv, du, dv)
        } else {
            let du = h11 - h01;
            let dv = h11 - h10;
            (h11 - (1.0 - u) * du - (1.0 - v) * dv, du, dv)
        };

        let normal = Vec3::new(-dh_du / seg, 1.0, -dh_dv / seg).normalize();
        Some(SurfaceSample { height, normal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn island() -> HeightField {
        HeightField::generate(&PerlinNoise::new(TERRAIN_SEED), SIZE, TERRAIN_RESOLUTION, TERRAIN_MAX_HEIGHT)
    }

    #[test]
    fn test_height_query_is_repeatable() {
        let field = island();
        let a = field.height_at(0.0, 0.0);
        let b = field.height_at(0.0, 0.0);
        assert_eq!(a.to_bits(), b.to_bits());

        let rebuilt = island();
        assert_eq!(a.to_bits(), rebuilt.height_at(0.0, 0.0).to_bits());
    }

    #[test]
    fn test_matches_displacement_at_vertices() {
        let noise = PerlinNoise::new(TERRAIN_SEED);
        let field = island();
        let seg = SIZE / TERRAIN_RESOLUTION as f32;
        for &(ix, iz) in &[(0u32, 0u32), (17, 200), (128, 128), (255, 3)] {
            let x = ix as f32 * seg - SIZE * 0.5;
            let z = iz as f32 * seg - SIZE * 0.5;
            let expected = (noise.sample(x as f64 * 0.02, z as f64 * 0.02) * 0.12
                + noise.sample(x as f64 * 0.05, z as f64 * 0.05) * 0.05) as f32
                * TERRAIN_MAX_HEIGHT;
            assert!((field.height_at(x, z) - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_heights_within_scaled_range() {
        let field = island();
        let bound = (0.12 + 0.05) * 2.0 * TERRAIN_MAX_HEIGHT;
        for i in -60..60 {
            let h = field.height_at(i as f32, (i * 7 % 60) as f32);
            assert!(h.abs() <= bound);
        }
    }

    #[test]
    fn test_outside_extent_returns_zero() {
        let field = island();
        assert_eq!(field.height_at(1000.0, 0.0), 0.0);
        assert_eq!(field.height_at(0.0, -65.5), 0.0);
        assert_eq!(field.height_at(f32::NAN, 0.0), 0.0);
        assert!(field.surface_at(70.0, 70.0).is_none());
    }

    #[test]
    fn test_triangle_interpolation_on_plane() {
        // A tilted plane is reproduced exactly by either triangle
        let field = HeightField::from_fn(10.0, 10, |x, z| 0.5 * x + 0.25 * z);
        for &(x, z) in &[(0.3, 0.2), (0.8, 0.9), (-3.7, 2.2), (4.99, -4.99)] {
            let s = field.surface_at(x, z).unwrap();
            assert!((s.height - (0.5 * x + 0.25 * z)).abs() < 1e-4);
            let expected = Vec3::new(-0.5, 1.0, -0.25).normalize();
            assert!((s.normal - expected).length() < 1e-4);
        }
    }

    #[test]
    fn test_flat_normal_points_up() {
        let field = HeightField::from_fn(20.0, 4, |_, _| 2.0);
        let s = field.surface_at(1.0, -3.0).unwrap();
        assert_eq!(s.height, 2.0);
        assert!((s.normal - Vec3::Y).length() < 1e-6);
    }
}
