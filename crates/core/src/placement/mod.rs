use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Result, TrackError};

/// Up axis of the viewer convention the path is expressed in.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Shortest closed path a frame can be computed on.
pub const MIN_PATH_POINTS: usize = 3;

/// Squared length below which a direction is treated as degenerate.
const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// Position and orientation of an object riding the track.
///
/// `forward` follows the path tangent, `right` is horizontal and `up` banks
/// with the slope. `right x forward == up`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationFrame {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl OrientationFrame {
    /// Axis-aligned frame at the origin, used when no tangent was ever valid.
    /// Same handedness as computed frames: `X x -Z == Y`.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        forward: Vec3::NEG_Z,
        right: Vec3::X,
        up: Vec3::Y,
    };

    pub fn at(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    /// Rotation whose columns are `right`, `up` and `forward`.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_cols(self.right, self.up, self.forward)
    }

    /// Model matrix `T * R * S`: scale first, then rotate, then move.
    pub fn model_matrix(&self, scale: Vec3) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_mat3(self.rotation())
            * Mat4::from_scale(scale)
    }
}

impl Default for OrientationFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Places an object on a closed path without any history. Degenerate
/// tangents fall back to an arbitrary perpendicular or the identity basis.
pub fn place(path: &[Vec3], index: usize) -> Result<OrientationFrame> {
    VehiclePlacer::new().place(path, index)
}

/// Computes the frame of an object following a closed path, one tick at a
/// time. The last valid frame is kept so that degenerate tangents can keep
/// the previous orientation instead of producing NaNs.
#[derive(Debug, Default, Clone)]
pub struct VehiclePlacer {
    last: Option<OrientationFrame>,
}

impl VehiclePlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous frame. Call when the path is replaced.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Frame at `path[index mod N]`, with the tangent approximated by the
    /// central difference of the neighbouring points.
    pub fn place(&mut self, path: &[Vec3], index: usize) -> Result<OrientationFrame> {
        let n = path.len();
        if n < MIN_PATH_POINTS {
            return Err(TrackError::invalid(format!(
                "placement needs a closed path of at least 3 points, got {n}"
            )));
        }

        let idx = index % n;
        let prev = (idx + n - 1) % n;
        let next = (idx + 1) % n;
        let position = path[idx];

        let frame = match normalized(path[next] - path[prev]) {
            Some(forward) => self.frame_along(position, forward),
            None => {
                tracing::warn!(index = idx, "zero-length tangent, keeping previous orientation");
                self.last
                    .unwrap_or(OrientationFrame::IDENTITY)
                    .at(position)
            }
        };
        self.last = Some(frame);
        Ok(frame)
    }

    fn frame_along(&self, position: Vec3, forward: Vec3) -> OrientationFrame {
        let right = normalized(forward.cross(WORLD_UP)).unwrap_or_else(|| {
            tracing::warn!("tangent parallel to world up, reusing previous right axis");
            self.last
                .and_then(|last| normalized(last.right - forward * forward.dot(last.right)))
                .unwrap_or_else(|| forward.any_orthonormal_vector())
        });
        let up = right.cross(forward);
        OrientationFrame {
            position,
            forward,
            right,
            up,
        }
    }
}

fn normalized(v: Vec3) -> Option<Vec3> {
    (v.length_squared() > DEGENERATE_LENGTH_SQUARED).then(|| v.normalize())
}
