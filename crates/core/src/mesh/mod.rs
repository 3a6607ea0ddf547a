use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Result, TrackError};

const UP_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// Two triangles per quad, as offsets into the quad's four vertices.
const QUAD_INDICES: [u32; 6] = [0, 3, 1, 1, 3, 2];

/// Interleaved vertex as uploaded to the GPU: position, texture coordinate
/// and normal, tightly packed.
#[repr(C)]
#[derive(
    Debug, Copy, Clone, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct TrackVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// How the sideways offset of each centerline edge is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerpendicularRule {
    /// `atan2` of the edge, then +90° for `dx >= 0` and -90° for `dx < 0`.
    /// Reproduces the geometry of tracks sketched with earlier releases,
    /// including the side flip on edges that run towards -x.
    #[default]
    Quadrant,
    /// Left-hand normal `(-dy, dx)` of every edge, independent of direction.
    Symmetric,
}

/// Ribbon mesh of a closed track: four fresh vertices and two triangles per
/// centerline edge. Built once and never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackMesh {
    vertices: Vec<TrackVertex>,
    indices: Vec<u32>,
}

impl TrackMesh {
    pub fn vertices(&self) -> &[TrackVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .collect()
    }

    pub fn uvs(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| Vec2::from_array(v.uv)).collect()
    }

    pub fn normals(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.normal))
            .collect()
    }

    /// Raw vertex buffer contents, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Remaps the mesh from the sketch convention (height in z) to the
    /// viewer convention (height in y) by swapping the second and third
    /// components of every position and normal.
    pub fn swap_yz(&self) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| TrackVertex {
                position: [v.position[0], v.position[2], v.position[1]],
                uv: v.uv,
                normal: [v.normal[0], v.normal[2], v.normal[1]],
            })
            .collect();
        Self {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

/// Swaps the y and z components of a point.
pub fn swap_yz(point: Vec3) -> Vec3 {
    Vec3::new(point.x, point.z, point.y)
}

/// Extrudes a closed centerline into a ribbon of the given width using the
/// [`PerpendicularRule::Quadrant`] offset.
pub fn extrude(center: &[Vec3], width: f32) -> Result<TrackMesh> {
    extrude_with(center, width, PerpendicularRule::Quadrant)
}

/// Extrudes a closed centerline into a ribbon of the given width.
///
/// Each point is pushed sideways by half the width in the sketch plane; the
/// height component is carried over untouched. Edge `i -> i + 1` wraps from
/// the last point back to the first. Fewer than two points yield an empty
/// mesh.
pub fn extrude_with(center: &[Vec3], width: f32, rule: PerpendicularRule) -> Result<TrackMesh> {
    if !width.is_finite() || width <= 0.0 {
        return Err(TrackError::invalid(format!(
            "track width must be positive, got {width}"
        )));
    }
    let n = center.len();
    if n < 2 {
        return Ok(TrackMesh::default());
    }
    if u32::try_from(n * 4).is_err() {
        return Err(TrackError::invalid(format!(
            "{n} centerline points overflow a 32-bit index buffer"
        )));
    }

    let half_width = width * 0.5;
    let mut inner = Vec::with_capacity(n);
    let mut outer = Vec::with_capacity(n);
    let mut previous_offset = None;
    for (i, &a) in center.iter().enumerate() {
        let b = center[(i + 1) % n];
        let offset = match rule {
            PerpendicularRule::Quadrant => quadrant_offset(a, b, half_width),
            PerpendicularRule::Symmetric => symmetric_offset(a, b, half_width)
                .or(previous_offset)
                .unwrap_or_else(|| {
                    tracing::warn!(index = i, "zero-length centerline edge, no offset");
                    Vec3::ZERO
                }),
        };
        previous_offset = Some(offset);
        inner.push(a + offset);
        outer.push(a - offset);
    }

    let mut vertices = Vec::with_capacity(n * 4);
    let mut indices = Vec::with_capacity(n * 6);
    for i in 0..n {
        let next = (i + 1) % n;
        let base = vertices.len() as u32;
        let corners = [inner[i], outer[i], outer[next], inner[next]];
        for (corner, uv) in corners.iter().zip(QUAD_UVS) {
            vertices.push(TrackVertex {
                position: corner.to_array(),
                uv,
                normal: UP_NORMAL,
            });
        }
        indices.extend(QUAD_INDICES.iter().map(|offset| base + offset));
    }

    tracing::debug!(
        centerline = n,
        vertices = vertices.len(),
        triangles = indices.len() / 3,
        "extruded track"
    );
    Ok(TrackMesh { vertices, indices })
}

fn quadrant_offset(a: Vec3, b: Vec3, half_width: f32) -> Vec3 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let theta = dy.atan2(dx);
    let alpha = if dx < 0.0 {
        theta - FRAC_PI_2
    } else {
        theta + FRAC_PI_2
    };
    Vec3::new(alpha.cos() * half_width, alpha.sin() * half_width, 0.0)
}

fn symmetric_offset(a: Vec3, b: Vec3, half_width: f32) -> Option<Vec3> {
    let side = Vec2::new(-(b.y - a.y), b.x - a.x).try_normalize()?;
    Some((side * half_width).extend(0.0))
}
