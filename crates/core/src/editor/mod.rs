use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{EditorConfig, Result, TrackError};

/// A clicked point of the sketch plus the height the user tagged it with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

impl ControlPoint {
    pub fn new(x: f32, y: f32, height: f32) -> Self {
        Self { x, y, height }
    }

    /// Sketch-plane position with the height in the third component.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.height)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Editing state of the 2D sketch: the ordered control points and the
/// height newly placed points receive.
#[derive(Debug, Clone)]
pub struct SketchSession {
    config: EditorConfig,
    points: Vec<ControlPoint>,
    current_height: f32,
}

impl Default for SketchSession {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            current_height: config.initial_height.clamp(0.0, config.max_height),
            config,
            points: Vec::new(),
        }
    }
}

impl SketchSession {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            current_height: config.initial_height.clamp(0.0, config.max_height),
            config,
            points: Vec::new(),
        })
    }

    /// Session preloaded with points from a file. Heights are clamped to
    /// `[0, max_height]` like interactively placed points; non-finite
    /// coordinates are rejected.
    pub fn with_points(
        config: EditorConfig,
        points: impl IntoIterator<Item = ControlPoint>,
    ) -> Result<Self> {
        let mut session = Self::new(config)?;
        let mut clamped = 0usize;
        for (index, point) in points.into_iter().enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.height.is_finite()) {
                return Err(TrackError::invalid(format!(
                    "control point {index} is not finite: {point:?}"
                )));
            }
            let height = point.height.clamp(0.0, session.config.max_height);
            if height != point.height {
                clamped += 1;
            }
            session.points.push(ControlPoint { height, ..point });
        }
        if clamped > 0 {
            tracing::warn!(
                clamped,
                max_height = session.config.max_height,
                "control point heights outside the editable range were clamped"
            );
        }
        Ok(session)
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn current_height(&self) -> f32 {
        self.current_height
    }

    /// Appends a point at the current height.
    pub fn add_point(&mut self, position: Vec2) -> ControlPoint {
        let point = ControlPoint::new(position.x, position.y, self.current_height);
        self.points.push(point);
        point
    }

    pub fn raise_height(&mut self) -> f32 {
        self.set_height(self.current_height + self.config.height_step)
    }

    pub fn lower_height(&mut self) -> f32 {
        self.set_height(self.current_height - self.config.height_step)
    }

    /// Updates the current height and retags the most recent point with it.
    fn set_height(&mut self, height: f32) -> f32 {
        self.current_height = height.clamp(0.0, self.config.max_height);
        if let Some(last) = self.points.last_mut() {
            last.height = self.current_height;
        }
        self.current_height
    }

    pub fn undo_last(&mut self) -> Option<ControlPoint> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Control points in curve order, ready for spline evaluation.
    pub fn to_curve_input(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.to_vec3()).collect()
    }

    /// Marker intensity for a point at `height`: 0.2 at ground level up to
    /// 1.0 at the maximum height.
    pub fn height_brightness(&self, height: f32) -> f32 {
        let t = if self.config.max_height > 0.0 {
            (height / self.config.max_height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        0.2 + 0.8 * t
    }
}

/// Casts a ray through the cursor and intersects it with the sketch plane
/// `z = 0`.
///
/// `cursor` is in pixels with the origin at the top-left corner of a
/// viewport of size `viewport`. Returns `None` if the ray runs parallel to
/// the plane or hits it behind the camera.
pub fn pick_sketch_point(
    cursor: Vec2,
    viewport: Vec2,
    view: Mat4,
    projection: Mat4,
) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.x - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y,
    );
    let eye = projection.inverse() * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);

    let inverse_view = view.inverse();
    let direction = (inverse_view * eye).truncate().try_normalize()?;
    let origin = inverse_view.transform_point3(Vec3::ZERO);

    if direction.z.abs() <= f32::EPSILON {
        return None;
    }
    let t = -origin.z / direction.z;
    if t < 0.0 {
        return None;
    }
    Some((origin + direction * t).truncate())
}
