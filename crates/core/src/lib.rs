//! Core library for the Track Sketcher application.
//!
//! Turns a hand-drawn closed centerline into a drivable track: control
//! points are captured in the [`editor`], smoothed by a uniform cubic
//! B-spline in [`curve`], extruded into a ribbon mesh in [`mesh`], and a
//! vehicle is driven along the result by [`animation`] and [`placement`].
//! [`scene`] ties the stages together and swaps whole tracks at once.

pub mod animation;
pub mod config;
pub mod curve;
pub mod editor;
pub mod error;
pub mod export;
pub mod mesh;
pub mod placement;
pub mod scene;

pub use animation::{AnimationClock, AnimationState, STEP_TIME};
pub use config::{AppConfig, EditorConfig, ExportConfig, TrackConfig};
pub use curve::{evaluate, BSplineCurve};
pub use editor::{pick_sketch_point, ControlPoint, SketchSession};
pub use error::{Result, TrackError};
pub use export::{load_points, read_points, save_points, write_points};
pub use mesh::{extrude, extrude_with, PerpendicularRule, TrackMesh, TrackVertex};
pub use placement::{place, OrientationFrame, VehiclePlacer};
pub use scene::{GeneratedTrack, TrackScene};
